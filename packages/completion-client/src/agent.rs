//! Agent with an automatic tool-calling loop.
//!
//! # Example
//!
//! ```rust,ignore
//! let response = client
//!     .agent("gpt-4o")
//!     .system("You are a solution agent")
//!     .tool(InitiateRefund)
//!     .max_iterations(5)
//!     .build()
//!     .chat("I want a refund for order A1234")
//!     .await?;
//! ```

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::tool::{ErasedTool, Tool, ToolCall};
use crate::types::truncate_to_char_boundary;
use crate::{CompletionClient, CompletionError, Result};

/// Builder for creating an Agent.
pub struct AgentBuilder<'a> {
    client: &'a CompletionClient,
    model: String,
    system_prompt: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_iterations: usize,
}

impl<'a> AgentBuilder<'a> {
    pub(crate) fn new(client: &'a CompletionClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: None,
            tools: Vec::new(),
            max_iterations: 10,
        }
    }

    /// Set the system prompt.
    pub fn system(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Add a tool to the agent.
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Add an already boxed tool.
    pub fn boxed_tool(mut self, tool: Box<dyn ErasedTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the maximum number of model round-trips (default 10).
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn build(self) -> Agent<'a> {
        Agent {
            client: self.client,
            model: self.model,
            system_prompt: self.system_prompt,
            tools: self.tools,
            max_iterations: self.max_iterations,
        }
    }
}

/// A model-backed agent that can call tools.
pub struct Agent<'a> {
    client: &'a CompletionClient,
    model: String,
    system_prompt: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_iterations: usize,
}

/// One tool execution performed during a chat.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    /// Raw JSON arguments sent by the model.
    pub arguments: String,
    /// JSON output, or the error text returned to the model.
    pub output: String,
    pub succeeded: bool,
}

impl ToolInvocation {
    /// Output parsed as JSON, when it is valid JSON.
    pub fn output_json(&self) -> Option<Value> {
        if !self.succeeded {
            return None;
        }
        serde_json::from_str(&self.output).ok()
    }
}

/// Response from an agent chat.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final text response.
    pub content: String,

    /// Tool executions in the order they ran.
    pub tool_calls: Vec<ToolInvocation>,

    /// Number of model round-trips.
    pub iterations: usize,
}

impl AgentResponse {
    /// Names of the tools that were called, in order.
    pub fn tools_used(&self) -> Vec<&str> {
        self.tool_calls.iter().map(|t| t.name.as_str()).collect()
    }
}

impl<'a> Agent<'a> {
    /// Send one user message and run the tool loop to a final answer.
    pub async fn chat(&self, user_message: impl Into<String>) -> Result<AgentResponse> {
        let mut messages = Vec::new();

        if let Some(ref system) = self.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": user_message.into() }));

        self.run_tool_loop(messages).await
    }

    async fn run_tool_loop(&self, mut messages: Vec<Value>) -> Result<AgentResponse> {
        let mut tool_calls = Vec::new();
        let mut iterations = 0;

        let tool_defs: Vec<Value> = self
            .tools
            .iter()
            .map(|t| t.definition().to_function_format())
            .collect();

        loop {
            iterations += 1;

            if iterations > self.max_iterations {
                warn!(
                    max_iterations = self.max_iterations,
                    "Agent reached max iterations"
                );
                return Err(CompletionError::MaxIterations(self.max_iterations));
            }

            debug!(
                iteration = iterations,
                model = %self.model,
                message_count = messages.len(),
                tool_count = self.tools.len(),
                "Agent iteration starting"
            );

            let mut request = json!({
                "model": self.model,
                "messages": messages,
            });

            if !self.tools.is_empty() {
                request["tools"] = Value::Array(tool_defs.clone());
                request["tool_choice"] = json!("auto");
            }

            let response = self.client.post_chat(&request).await?;

            let message = response
                .get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("message"))
                .ok_or_else(|| CompletionError::Parse("No message in response".into()))?;

            let requested = message
                .get("tool_calls")
                .and_then(|tc| tc.as_array())
                .cloned()
                .unwrap_or_default();

            if requested.is_empty() {
                let content = message
                    .get("content")
                    .and_then(|c| c.as_str())
                    .unwrap_or("")
                    .to_string();

                info!(
                    iterations = iterations,
                    tool_calls_total = tool_calls.len(),
                    response_len = content.len(),
                    "Agent finished"
                );

                return Ok(AgentResponse {
                    content,
                    tool_calls,
                    iterations,
                });
            }

            messages.push(message.clone());

            for tc_value in &requested {
                let Some(tc) = ToolCall::from_value(tc_value) else {
                    warn!("Failed to parse tool call: {:?}", tc_value);
                    continue;
                };

                info!(tool = %tc.name, id = %tc.id, arguments = %tc.arguments, "Executing tool call");

                let invocation = self.execute_tool(&tc).await;

                debug!(
                    tool = %tc.name,
                    result_preview = %truncate_to_char_boundary(&invocation.output, 200),
                    "Tool execution complete"
                );

                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": tc.id,
                    "content": invocation.output
                }));
                tool_calls.push(invocation);
            }
        }
    }

    async fn execute_tool(&self, call: &ToolCall) -> ToolInvocation {
        let (output, succeeded) = match self.tools.iter().find(|t| t.name() == call.name) {
            None => {
                warn!(tool = %call.name, "Unknown tool requested");
                (format!("Error: Unknown tool '{}'", call.name), false)
            }
            Some(tool) => match tool.call_erased(&call.arguments).await {
                Ok(result) => (result, true),
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool execution failed");
                    (format!("Error executing tool: {}", e), false)
                }
            },
        };

        ToolInvocation {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            output,
            succeeded,
        }
    }
}
