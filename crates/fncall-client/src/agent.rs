use crate::api::{ApiClient, DeployPayload, ReactPayload, SimulatePayload};
use crate::error::ClientResult;
use fncall_core::CallableFunction;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

/// Inputs for a platform reaction.
#[derive(Debug, Clone, Default)]
pub struct ReactOptions {
    pub platform: String,
    pub session_id: String,
    pub tweet_id: Option<String>,
    pub event: Option<String>,
    pub task: Option<String>,
}

/// Agent façade: goal/description/world state plus the default and custom
/// functions forwarded with every hosted-API call.
#[derive(Debug, Clone)]
pub struct Agent {
    api: ApiClient,
    goal: String,
    description: String,
    world: String,
    enabled_functions: Vec<String>,
    custom_functions: Vec<CallableFunction>,
}

impl Agent {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(ApiClient::new(api_key))
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self {
            api,
            goal: String::new(),
            description: String::new(),
            world: String::new(),
            enabled_functions: Vec::new(),
            custom_functions: Vec::new(),
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.goal = goal.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn set_world(&mut self, world: impl Into<String>) {
        self.world = world.into();
    }

    /// Default functions the platform offers, as name → description.
    pub async fn available_functions(&self) -> ClientResult<HashMap<String, String>> {
        self.api.functions().await
    }

    /// Enable a set of platform default functions by name.
    pub fn use_default_functions(&mut self, functions: Vec<String>) {
        self.enabled_functions = functions;
    }

    /// Register a custom callable function.
    pub fn add_custom_function(&mut self, function: CallableFunction) {
        self.custom_functions.push(function);
    }

    /// Run one simulation step for the given session.
    pub async fn simulate(&self, session_id: impl Into<String>) -> ClientResult<JsonValue> {
        let payload = SimulatePayload {
            session_id: session_id.into(),
            goal: self.goal.clone(),
            description: self.description.clone(),
            world: self.world.clone(),
            functions: self.enabled_functions.clone(),
            custom_functions: self.serialized_custom_functions()?,
        };
        self.api.simulate(&payload).await
    }

    /// React to a platform event.
    pub async fn react(&self, options: ReactOptions) -> ClientResult<JsonValue> {
        let payload = ReactPayload {
            session_id: options.session_id,
            event: options.event,
            task: options.task,
            tweet_id: options.tweet_id,
            goal: self.goal.clone(),
            description: self.description.clone(),
            world: self.world.clone(),
            functions: self.enabled_functions.clone(),
            custom_functions: self.serialized_custom_functions()?,
        };
        self.api.react(&options.platform, &payload).await
    }

    /// Deploy the current agent configuration.
    pub async fn deploy(&self) -> ClientResult<JsonValue> {
        let payload = DeployPayload {
            goal: self.goal.clone(),
            description: self.description.clone(),
            world: self.world.clone(),
            functions: self.enabled_functions.clone(),
            custom_functions: self.serialized_custom_functions()?,
        };
        self.api.deploy(&payload).await
    }

    /// Pretty-printed JSON record of the agent configuration.
    pub fn export(&self) -> ClientResult<String> {
        let record = json!({
            "goal": self.goal,
            "description": self.description,
            "world": self.world,
            "functions": self.enabled_functions,
            "customFunctions": self.serialized_custom_functions()?,
        });
        Ok(serde_json::to_string_pretty(&record)?)
    }

    fn serialized_custom_functions(&self) -> ClientResult<Vec<JsonValue>> {
        self.custom_functions.iter().map(|f| Ok(f.to_json()?)).collect()
    }
}
