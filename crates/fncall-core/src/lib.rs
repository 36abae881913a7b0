//! Templated callable-function engine.
//!
//! A [`CallableFunction`] pairs a declared argument schema with a request
//! template (method, URL template, headers, payload template) and optional
//! success/error feedback templates. A [`FunctionExecutor`] invokes it with
//! positional values: validation, placeholder interpolation, dispatch through
//! an injected [`HttpTransport`], and feedback emission to a [`FeedbackSink`].

pub mod error;
pub mod executor;
pub mod feedback;
pub mod function;
pub mod template;
pub mod transport;

pub use error::{InvokeError, InvokeResult};
pub use executor::FunctionExecutor;
pub use feedback::{FeedbackSink, TracingSink};
pub use function::{ArgKind, ArgumentSpec, CallableFunction, RequestTemplate};
pub use template::{interpolate, ValueMap};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
