//! SDK surface around the `fncall-core` engine: a reqwest-backed transport,
//! the hosted orchestration API client, and the agent façade that aggregates
//! callable functions with goal/description/world state.

pub mod agent;
pub mod api;
pub mod error;
pub mod transport;

pub use agent::{Agent, ReactOptions};
pub use api::{ApiClient, DeployPayload, ReactPayload, SimulatePayload, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use transport::ReqwestTransport;

// Re-export the core types callers compose with.
pub use fncall_core::{
    ArgKind, ArgumentSpec, CallableFunction, FunctionExecutor, InvokeError, RequestTemplate,
};
