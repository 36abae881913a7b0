//! The injected HTTP-request capability the engine depends on but does not
//! implement. Connection pooling, TLS, timeouts, and cancellation all belong
//! to the implementor; a cancelled or failed send surfaces as
//! [`InvokeError::Transport`] through the normal error path.

use crate::error::{InvokeError, InvokeResult};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// One fully-resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    /// JSON-encoded as the request body.
    pub body: JsonValue,
}

/// The response surface the engine needs: status line plus raw body text.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json_body(&self) -> InvokeResult<JsonValue> {
        serde_json::from_str(&self.body).map_err(InvokeError::from)
    }
}

/// HTTP-transport capability consumed by [`crate::FunctionExecutor`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> InvokeResult<HttpResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> InvokeResult<HttpResponse> {
        (**self).send(request).await
    }
}
