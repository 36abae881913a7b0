use crate::error::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Production endpoint of the hosted orchestration service.
pub const DEFAULT_BASE_URL: &str = "https://game-api.virtuals.io/api";

/// Context payload for a simulation step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatePayload {
    pub session_id: String,
    pub goal: String,
    pub description: String,
    pub world: String,
    pub functions: Vec<String>,
    pub custom_functions: Vec<JsonValue>,
}

/// Context payload for a platform reaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactPayload {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet_id: Option<String>,
    pub goal: String,
    pub description: String,
    pub world: String,
    pub functions: Vec<String>,
    pub custom_functions: Vec<JsonValue>,
}

/// Context payload for a deployment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployPayload {
    pub goal: String,
    pub description: String,
    pub world: String,
    pub functions: Vec<String>,
    pub custom_functions: Vec<JsonValue>,
}

/// Every hosted-API response wraps its result in a `data` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct FunctionEntry {
    fn_name: String,
    fn_description: String,
}

/// Client for the hosted orchestration API. Pure data passing: every call
/// forwards a context payload and unwraps the response envelope.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint (staging, mock server).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// List the default functions the platform offers, as name → description.
    pub async fn functions(&self) -> ClientResult<HashMap<String, String>> {
        let response = self
            .client
            .get(format!("{}/functions", self.base_url))
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let entries: Vec<FunctionEntry> = unwrap_data(response).await?;
        Ok(entries.into_iter().map(|e| (e.fn_name, e.fn_description)).collect())
    }

    /// Run one simulation step for a session.
    pub async fn simulate(&self, payload: &SimulatePayload) -> ClientResult<JsonValue> {
        self.post("simulate", payload).await
    }

    /// React to a platform event.
    pub async fn react(&self, platform: &str, payload: &ReactPayload) -> ClientResult<JsonValue> {
        self.post(&format!("react/{platform}"), payload).await
    }

    /// Deploy the agent configuration.
    pub async fn deploy(&self, payload: &DeployPayload) -> ClientResult<JsonValue> {
        self.post("deploy", payload).await
    }

    async fn post<P: Serialize>(&self, path: &str, payload: &P) -> ClientResult<JsonValue> {
        tracing::debug!(path, "posting to hosted API");
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .header("x-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "data": payload }))
            .send()
            .await?;

        unwrap_data(response).await
    }
}

/// Unwrap the `{data}` envelope, surfacing non-success bodies stringified.
async fn unwrap_data<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    if !response.status().is_success() {
        let body: JsonValue = response.json().await?;
        return Err(ClientError::Api(body.to_string()));
    }
    let envelope: Envelope<T> = response.json().await?;
    Ok(envelope.data)
}
