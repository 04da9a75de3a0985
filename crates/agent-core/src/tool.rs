//! Tool System
//!
//! Named capabilities an agent can offer to the model. Each agent owns an
//! immutable [`ToolRegistry`]; the model requests a call by name and the
//! session looks it up by exact string match.

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the model
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: HashMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Build from a JSON object; anything else yields no arguments
    pub fn from_json(name: impl Into<String>, args: &Value) -> Self {
        let arguments = args
            .as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Self::new(name, arguments)
    }

    /// Non-blank string argument, trimmed
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Value produced by a tool; may be absent
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput(Option<Value>);

impl ToolOutput {
    pub fn value(value: impl Into<Value>) -> Self {
        Self(Some(value.into()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self(Some(Value::String(text.into())))
    }

    pub const fn empty() -> Self {
        Self(None)
    }

    /// Absent, JSON null, or blank text
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    pub const fn as_value(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    /// Render for display: strings verbatim, everything else as JSON
    pub fn render(&self) -> String {
        match &self.0 {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        Self(Some(value))
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

impl ParameterSchema {
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: true,
            enum_values: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }
}

/// Tool declaration sent to the model for function calling
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier; must match what the model calls
    pub name: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

impl ToolSchema {
    /// Parameters as a JSON-schema object
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut prop = serde_json::json!({
                "type": param.param_type,
                "description": param.description,
            });
            if let Some(values) = &param.enum_values {
                prop["enum"] = Value::Array(values.clone());
            }
            properties.insert(param.name.clone(), prop);
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        let mut schema = serde_json::json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        schema
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolOutput>;

    /// Validate arguments before execution
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Validate and run a tool, turning panics into `ToolExecution` errors
pub async fn invoke(tool: &dyn Tool, call: &ToolCall) -> Result<ToolOutput> {
    tool.validate(call)?;

    match AssertUnwindSafe(tool.execute(call)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            Err(AgentError::ToolExecution(format!(
                "{} panicked: {reason}",
                call.name
            )))
        }
    }
}

type ToolFn = dyn Fn(&ToolCall) -> Result<ToolOutput> + Send + Sync;

/// Tool backed by a plain closure
pub struct FnTool {
    schema: ToolSchema,
    func: Arc<ToolFn>,
}

impl FnTool {
    pub fn new<F>(schema: ToolSchema, func: F) -> Self
    where
        F: Fn(&ToolCall) -> Result<ToolOutput> + Send + Sync + 'static,
    {
        Self {
            schema,
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn schema(&self) -> ToolSchema {
        self.schema.clone()
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolOutput> {
        (self.func)(call)
    }
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub const fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!(tool = %name, "Tool registered twice, keeping the latest");
        }
    }

    /// Get a tool by exact name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// All tool schemas, ordered by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Tool names, ordered
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_schema() -> ToolSchema {
        ToolSchema {
            name: "echo".into(),
            description: "Echo the text argument".into(),
            parameters: vec![ParameterSchema::required("text", "string", "Text to echo")],
            has_side_effects: false,
        }
    }

    fn echo_tool() -> FnTool {
        FnTool::new(echo_schema(), |call| {
            Ok(ToolOutput::text(call.str_arg("text").unwrap_or_default()))
        })
    }

    #[test]
    fn test_tool_output_emptiness() {
        assert!(ToolOutput::empty().is_empty());
        assert!(ToolOutput::value(Value::Null).is_empty());
        assert!(ToolOutput::text("   ").is_empty());
        assert!(!ToolOutput::text("menu").is_empty());
        assert!(!ToolOutput::value(json!({"rooms": 0})).is_empty());
        assert_eq!(ToolOutput::value(json!([1, 2])).render(), "[1,2]");
    }

    #[test]
    fn test_json_schema() {
        let mut schema = echo_schema();
        schema.parameters.push(
            ParameterSchema::optional("mode", "string", "Echo mode")
                .with_enum(vec![json!("loud"), json!("quiet")]),
        );

        let rendered = schema.to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["properties"]["text"]["type"], "string");
        assert_eq!(rendered["properties"]["mode"]["enum"][1], "quiet");
        assert_eq!(rendered["required"], json!(["text"]));
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool());

        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("Echo").is_none());
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn test_invoke_validates_arguments() {
        let tool = echo_tool();

        let ok = invoke(&tool, &ToolCall::from_json("echo", &json!({"text": "hi"})))
            .await
            .unwrap();
        assert_eq!(ok.render(), "hi");

        let missing = invoke(&tool, &ToolCall::from_json("echo", &json!({}))).await;
        assert!(matches!(missing, Err(AgentError::ToolValidation(_))));
    }

    #[tokio::test]
    async fn test_invoke_captures_panics() {
        let tool = FnTool::new(
            ToolSchema {
                name: "explode".into(),
                description: "Always panics".into(),
                parameters: vec![],
                has_side_effects: false,
            },
            |_| panic!("database connection lost"),
        );

        let result = invoke(&tool, &ToolCall::from_json("explode", &Value::Null)).await;
        match result {
            Err(AgentError::ToolExecution(msg)) => {
                assert!(msg.contains("database connection lost"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
