use crate::error::{InvokeError, InvokeResult};
use crate::executor::FunctionExecutor;
use crate::template::{interpolate, resolve_payload, ValueMap};
use crate::transport::{HttpRequest, HttpTransport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Declared kind of one call argument.
///
/// Closed set of checked kinds; any other tag found in serialized input is
/// preserved verbatim as [`ArgKind::Unchecked`] and accepts every value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    #[serde(untagged)]
    Unchecked(String),
}

impl ArgKind {
    /// Whether a supplied runtime value satisfies this kind.
    pub fn accepts(&self, value: &JsonValue) -> bool {
        match self {
            ArgKind::String => value.is_string(),
            ArgKind::Number => value.is_number(),
            ArgKind::Boolean => value.is_boolean(),
            ArgKind::Array => value.is_array(),
            ArgKind::Object => value.is_object(),
            ArgKind::Unchecked(_) => true,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ArgKind::String => "string",
            ArgKind::Number => "number",
            ArgKind::Boolean => "boolean",
            ArgKind::Array => "array",
            ArgKind::Object => "object",
            ArgKind::Unchecked(tag) => tag.as_str(),
        };
        f.write_str(tag)
    }
}

/// Declared name/kind/description for one positional call argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ArgKind,
    /// Stable identifier, generated once when absent.
    #[serde(default = "fresh_id")]
    pub id: String,
}

impl ArgumentSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ArgKind,
    ) -> Self {
        Self { name: name.into(), description: description.into(), kind, id: fresh_id() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Request template (wire name `config`): how to turn bound argument values
/// into one HTTP request, plus optional feedback templates.
///
/// Every field is populated at construction; deserialization fills the same
/// defaults, so a template is always a fully-populated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    #[serde(default = "default_method")]
    pub method: String,

    /// URL template; `{{name}}` placeholders resolve against argument values.
    #[serde(default)]
    pub url: String,

    /// Headers are copied onto the request verbatim, never interpolated.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Payload template; see [`crate::template::resolve_payload`].
    #[serde(default)]
    pub payload: Map<String, JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_feedback: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_feedback: Option<String>,

    /// Hosted-platform routing metadata, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, rename = "isMainLoop", skip_serializing_if = "Option::is_none")]
    pub is_main_loop: Option<bool>,

    #[serde(default, rename = "isReaction", skip_serializing_if = "Option::is_none")]
    pub is_reaction: Option<bool>,
}

impl RequestTemplate {
    /// Create a template with the given method and URL template; all other
    /// fields take their defaults.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into(), url: url.into(), ..Self::default() }
    }
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            method: default_method(),
            url: String::new(),
            headers: HashMap::new(),
            payload: Map::new(),
            success_feedback: None,
            error_feedback: None,
            platform: None,
            is_main_loop: None,
            is_reaction: None,
        }
    }
}

/// A named, schema-validated, template-driven HTTP action.
///
/// Immutable once constructed; the serialized form (`id`, `fn_name`,
/// `fn_description`, `args`, `hint`, `config`) is the wire contract and
/// deserializing it reproduces an equivalent function, ids included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallableFunction {
    #[serde(default = "fresh_id")]
    pub id: String,
    #[serde(rename = "fn_name")]
    pub name: String,
    #[serde(rename = "fn_description")]
    pub description: String,
    /// Declaration order defines positional-call order; names are unique.
    pub args: Vec<ArgumentSpec>,
    #[serde(default)]
    pub hint: String,
    #[serde(rename = "config")]
    pub template: RequestTemplate,
}

impl CallableFunction {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        args: Vec<ArgumentSpec>,
        template: RequestTemplate,
    ) -> Self {
        Self {
            id: fresh_id(),
            name: name.into(),
            description: description.into(),
            args,
            hint: String::new(),
            template,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Reuse a caller-supplied id, enabling round-trip reconstruction from
    /// serialized state.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Canonical JSON form for transport or persistence by an external
    /// system. Field names are the wire contract.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Zip positional values with declared args, checking arity and kinds.
    /// Fails on the first violation, in declaration order.
    pub fn bind_arguments(&self, values: Vec<JsonValue>) -> InvokeResult<ValueMap> {
        if values.len() != self.args.len() {
            return Err(InvokeError::Arity { expected: self.args.len(), got: values.len() });
        }

        let mut bound = ValueMap::new();
        for (spec, value) in self.args.iter().zip(values) {
            if !spec.kind.accepts(&value) {
                return Err(InvokeError::TypeMismatch {
                    name: spec.name.clone(),
                    expected: spec.kind.clone(),
                });
            }
            bound.insert(spec.name.clone(), value);
        }
        Ok(bound)
    }

    /// Resolve the request template against bound argument values.
    pub fn build_request(&self, bound: &ValueMap) -> HttpRequest {
        HttpRequest {
            method: self.template.method.clone(),
            url: interpolate(&self.template.url, bound),
            headers: self.template.headers.clone(),
            body: JsonValue::Object(resolve_payload(&self.template.payload, bound)),
        }
    }

    /// Invoke this function with positional argument values.
    pub async fn invoke<T: HttpTransport>(
        &self,
        executor: &FunctionExecutor<T>,
        values: Vec<JsonValue>,
    ) -> InvokeResult<JsonValue> {
        executor.invoke(self, values).await
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_method() -> String {
    "GET".to_string()
}
