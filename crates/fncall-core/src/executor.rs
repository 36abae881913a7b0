use crate::error::{InvokeError, InvokeResult};
use crate::feedback::{FeedbackSink, TracingSink};
use crate::function::CallableFunction;
use crate::template::{interpolate, ValueMap};
use crate::transport::{HttpRequest, HttpTransport};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Drives [`CallableFunction`] invocations through an injected transport,
/// emitting rendered feedback to an observability sink.
///
/// Definitions are read-only and the per-call binding is local, so one
/// executor can serve any number of concurrent invocations.
pub struct FunctionExecutor<T> {
    transport: T,
    sink: Arc<dyn FeedbackSink>,
}

impl<T: HttpTransport> FunctionExecutor<T> {
    /// Create an executor that emits feedback through the tracing pipeline.
    pub fn new(transport: T) -> Self {
        Self { transport, sink: Arc::new(TracingSink) }
    }

    pub fn with_sink(transport: T, sink: Arc<dyn FeedbackSink>) -> Self {
        Self { transport, sink }
    }

    /// Invoke a function with positional argument values.
    ///
    /// Validation and interpolation are synchronous; only the dispatch
    /// awaits. Feedback for this call is emitted before the returned future
    /// settles, on both paths.
    pub async fn invoke(
        &self,
        function: &CallableFunction,
        values: Vec<JsonValue>,
    ) -> InvokeResult<JsonValue> {
        let bound = function.bind_arguments(values)?;
        let request = function.build_request(&bound);
        tracing::debug!(
            function = %function.name,
            method = %request.method,
            url = %request.url,
            "dispatching function request"
        );

        match self.dispatch(request).await {
            Ok(body) => {
                if let Some(template) = &function.template.success_feedback {
                    self.emit_feedback(function, template, &bound, body.clone());
                }
                Ok(body)
            }
            Err(err) => {
                if let Some(template) = &function.template.error_feedback {
                    self.emit_feedback(
                        function,
                        template,
                        &bound,
                        JsonValue::String(err.to_string()),
                    );
                }
                Err(err)
            }
        }
    }

    async fn dispatch(&self, request: HttpRequest) -> InvokeResult<JsonValue> {
        let response = self.transport.send(request).await?;
        if !response.ok() {
            return Err(InvokeError::RequestFailed {
                status: response.status,
                status_text: response.status_text,
            });
        }
        response.json_body()
    }

    /// Render a feedback template against `{response} + argument values` and
    /// emit it. Argument values shadow a colliding `response` binding.
    fn emit_feedback(
        &self,
        function: &CallableFunction,
        template: &str,
        bound: &ValueMap,
        response: JsonValue,
    ) {
        let mut scope = ValueMap::new();
        scope.insert("response".to_string(), response);
        for (name, value) in bound {
            scope.insert(name.clone(), value.clone());
        }
        self.sink.emit(&function.name, &interpolate(template, &scope));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{ArgKind, ArgumentSpec, RequestTemplate};
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Transport double: records requests, replays a scripted outcome.
    struct ScriptedTransport {
        outcome: Box<dyn Fn() -> InvokeResult<HttpResponse> + Send + Sync>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn respond(status: u16, status_text: &str, body: &str) -> Self {
            let (status_text, body) = (status_text.to_string(), body.to_string());
            Self {
                outcome: Box::new(move || {
                    Ok(HttpResponse {
                        status,
                        status_text: status_text.clone(),
                        body: body.clone(),
                    })
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn fail(message: &str) -> Self {
            let message = message.to_string();
            Self {
                outcome: Box::new(move || Err(InvokeError::Transport(message.clone()))),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> InvokeResult<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            (self.outcome)()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl FeedbackSink for RecordingSink {
        fn emit(&self, _function: &str, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn tweet_function() -> CallableFunction {
        let mut template =
            RequestTemplate::new("POST", "https://api.example.com/tweets/{{topic}}");
        template.payload.insert("text".to_string(), json!("{tweet}"));
        template.success_feedback = Some("posted: {{response}}".to_string());
        template.error_feedback = Some("failed to post {{tweet}}: {{response}}".to_string());
        CallableFunction::new(
            "post_tweet",
            "Post a tweet",
            vec![
                ArgumentSpec::new("topic", "Topic", ArgKind::String),
                ArgumentSpec::new("tweet", "Tweet text", ArgKind::String),
            ],
            template,
        )
    }

    #[tokio::test]
    async fn success_returns_decoded_body_and_emits_feedback() {
        let transport = Arc::new(ScriptedTransport::respond(200, "OK", r#"{"id": 7}"#));
        let sink = Arc::new(RecordingSink::default());
        let executor = FunctionExecutor::with_sink(transport.clone(), sink.clone());

        let result = executor
            .invoke(&tweet_function(), vec![json!("rust"), json!("hello")])
            .await
            .unwrap();

        assert_eq!(result, json!({"id": 7}));
        assert_eq!(transport.request_count(), 1);
        let sent = transport.requests.lock().unwrap().remove(0);
        assert_eq!(sent.url, "https://api.example.com/tweets/rust");
        assert_eq!(sent.body, json!({"text": "hello"}));
        assert_eq!(
            sink.messages.lock().unwrap().as_slice(),
            [r#"posted: {"id":7}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn arity_error_never_reaches_transport() {
        let transport = Arc::new(ScriptedTransport::respond(200, "OK", "{}"));
        let executor = FunctionExecutor::new(transport.clone());

        let err = executor.invoke(&tweet_function(), vec![json!("rust")]).await.unwrap_err();

        assert!(matches!(err, InvokeError::Arity { expected: 2, got: 1 }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn kind_mismatch_never_reaches_transport() {
        let transport = Arc::new(ScriptedTransport::respond(200, "OK", "{}"));
        let executor = FunctionExecutor::new(transport.clone());

        let err = executor
            .invoke(&tweet_function(), vec![json!(42), json!("hello")])
            .await
            .unwrap_err();

        match err {
            InvokeError::TypeMismatch { name, .. } => assert_eq!(name, "topic"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn non_success_status_surfaces_request_failed_after_feedback() {
        let transport = Arc::new(ScriptedTransport::respond(503, "Service Unavailable", "{}"));
        let sink = Arc::new(RecordingSink::default());
        let executor = FunctionExecutor::with_sink(transport.clone(), sink.clone());

        let err = executor
            .invoke(&tweet_function(), vec![json!("rust"), json!("hello")])
            .await
            .unwrap_err();

        match &err {
            InvokeError::RequestFailed { status, status_text } => {
                assert_eq!(*status, 503);
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            sink.messages.lock().unwrap().as_slice(),
            ["failed to post hello: request failed: Service Unavailable".to_string()]
        );
    }

    #[tokio::test]
    async fn transport_failure_propagates_original_error() {
        let transport = Arc::new(ScriptedTransport::fail("connection refused"));
        let sink = Arc::new(RecordingSink::default());
        let executor = FunctionExecutor::with_sink(transport.clone(), sink.clone());

        let err = executor
            .invoke(&tweet_function(), vec![json!("rust"), json!("hello")])
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::Transport(_)));
        // Feedback was emitted, and the caller still sees the transport error.
        assert_eq!(sink.messages.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_feedback_template_does_not_mask_result() {
        let transport = Arc::new(ScriptedTransport::respond(200, "OK", r#"{"ok": true}"#));
        let sink = Arc::new(RecordingSink::default());

        let mut function = tweet_function();
        function.template.success_feedback = Some("{{nosuch}} {{".to_string());
        let executor = FunctionExecutor::with_sink(transport.clone(), sink.clone());

        let result = executor
            .invoke(&function, vec![json!("rust"), json!("hello")])
            .await
            .unwrap();

        assert_eq!(result, json!({"ok": true}));
        assert_eq!(sink.messages.lock().unwrap().as_slice(), ["{{nosuch}} {{".to_string()]);
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let transport = Arc::new(ScriptedTransport::respond(200, "OK", "not json"));
        let executor = FunctionExecutor::new(transport.clone());

        let err = executor
            .invoke(&tweet_function(), vec![json!("rust"), json!("hello")])
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::Decode(_)));
    }
}
