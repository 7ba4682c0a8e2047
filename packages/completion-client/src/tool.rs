//! Tool calling traits and types for function-calling models.
//!
//! A tool has typed arguments (schema generated by `schemars`) and a
//! serializable output. The agent loop stores tools type-erased.
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct LookupArgs {
//!     question: String,
//! }
//!
//! struct FaqLookup;
//!
//! #[async_trait]
//! impl Tool for FaqLookup {
//!     const NAME: &'static str = "get_faq_answer";
//!     type Args = LookupArgs;
//!     type Output = String;
//!     type Error = std::convert::Infallible;
//!
//!     fn description(&self) -> &str {
//!         "Returns the FAQ answer for a question"
//!     }
//!
//!     async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
//!         Ok(lookup(&args.question))
//!     }
//! }
//! ```

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A tool that can be called by the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    const NAME: &'static str;

    /// Argument type (must derive `Deserialize` and `JsonSchema`).
    type Args: DeserializeOwned + JsonSchema + Send;

    /// Output type (must derive `Serialize`).
    type Output: Serialize + Send;

    type Error: std::error::Error + Send + Sync + 'static;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// Execute the tool with the given arguments.
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: self.description().to_string(),
            parameters: parameters_schema::<Self::Args>(),
        }
    }
}

/// Tool definition as advertised to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Convert to the chat-completions `tools` array entry format.
    pub fn to_function_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

/// Build a parameters schema for `T` with nested definitions inlined.
///
/// Function-calling endpoints do not reliably follow `$ref`, so every
/// reference is replaced by its definition and the `definitions` and
/// `$schema` keys are dropped.
pub fn parameters_schema<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schema_for!(T)).unwrap_or_default();

    let definitions = value.get("definitions").cloned();
    if let Some(defs) = definitions {
        inline_refs(&mut value, &defs);
    }

    if let Value::Object(map) = &mut value {
        map.remove("definitions");
        map.remove("$schema");
        map.remove("title");
    }

    value
}

fn inline_refs(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(|r| r.as_str())
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(def) = target {
                *value = def;
                inline_refs(value, definitions);
                return;
            }

            for (_, v) in map.iter_mut() {
                inline_refs(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Call ID, echoed back with the tool result.
    pub id: String,
    pub name: String,
    /// Arguments as a JSON string.
    pub arguments: String,
}

impl ToolCall {
    /// Parse a tool call from a chat-completions `tool_calls` entry.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: value.get("id")?.as_str()?.to_string(),
            name: value.get("function")?.get("name")?.as_str()?.to_string(),
            arguments: value.get("function")?.get("arguments")?.as_str()?.to_string(),
        })
    }
}

/// Type-erased tool for storing heterogeneous tools together.
#[async_trait]
pub trait ErasedTool: Send + Sync {
    fn name(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    /// Execute with JSON arguments, returning JSON output.
    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError>;
}

/// Error type for erased tool calls.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Failed to parse arguments: {0}")]
    ArgumentParse(String),

    #[error("Tool execution failed: {0}")]
    Execution(String),

    #[error("Failed to serialize output: {0}")]
    OutputSerialize(String),
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError> {
        // Models send "" for tools without parameters
        let arguments = if arguments.trim().is_empty() {
            "{}"
        } else {
            arguments
        };

        let args: T::Args = serde_json::from_str(arguments)
            .map_err(|e| ToolError::ArgumentParse(e.to_string()))?;

        let output = self
            .call(args)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        serde_json::to_string(&output).map_err(|e| ToolError::OutputSerialize(e.to_string()))
    }
}
