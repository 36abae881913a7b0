//! Observability sink for rendered feedback messages.
//!
//! Feedback is a side channel: a sink sees every rendered success/error
//! message, but nothing it does can change an invocation's outcome.

/// Receives rendered feedback messages, tagged with the function name.
pub trait FeedbackSink: Send + Sync {
    fn emit(&self, function: &str, message: &str);
}

/// Default sink: forwards feedback to the tracing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FeedbackSink for TracingSink {
    fn emit(&self, function: &str, message: &str) {
        tracing::info!(function, "{message}");
    }
}
