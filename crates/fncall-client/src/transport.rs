use async_trait::async_trait;
use fncall_core::{HttpRequest, HttpResponse, HttpTransport, InvokeError, InvokeResult};
use reqwest::Method;
use std::str::FromStr;

/// reqwest-backed implementation of the core transport capability.
///
/// Clones share the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, TLS).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> InvokeResult<HttpResponse> {
        let method = Method::from_str(&request.method.to_uppercase())
            .map_err(|_| InvokeError::Transport(format!("invalid HTTP method: {}", request.method)))?;

        let mut builder = self.client.request(method, request.url.as_str());
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .json(&request.body)
            .send()
            .await
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("unknown status").to_string();
        let body = response.text().await.map_err(|e| InvokeError::Transport(e.to_string()))?;

        Ok(HttpResponse { status: status.as_u16(), status_text, body })
    }
}
