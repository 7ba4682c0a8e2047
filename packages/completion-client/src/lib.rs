//! OpenAI-compatible chat completion client.
//!
//! The completion collaborator used by every support agent: plain chat
//! completions plus an agent builder that runs the tool-calling loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use completion_client::{ChatRequest, CompletionClient, Message};
//!
//! let client = CompletionClient::new(api_key).with_base_url(base_url);
//!
//! let response = client
//!     .chat_completion(ChatRequest::new("gpt-4o").message(Message::user("Hello!")))
//!     .await?;
//! ```

pub mod agent;
pub mod error;
pub mod tool;
pub mod types;

pub use agent::{Agent, AgentBuilder, AgentResponse, ToolInvocation};
pub use error::{CompletionError, Result};
pub use tool::{parameters_schema, ErasedTool, Tool, ToolCall, ToolDefinition, ToolError};
pub use types::*;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completion client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl CompletionClient {
    /// Create a new client with the given API key and the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (regional endpoint, proxy, test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an agent builder with the specified model.
    pub fn agent(&self, model: impl Into<String>) -> AgentBuilder<'_> {
        AgentBuilder::new(self, model)
    }

    /// Chat completion.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let body = serde_json::to_value(&request)
            .map_err(|e| CompletionError::Parse(format!("Failed to serialize request: {}", e)))?;
        let raw = self.post_chat(&body).await?;

        let chat_response: types::ChatResponseRaw =
            serde_json::from_value(raw).map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CompletionError::Api("No content in completion response".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }

    /// POST a raw body to `/chat/completions` and return the JSON response.
    pub(crate) async fn post_chat(&self, body: &Value) -> Result<Value> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Completion request failed");
                CompletionError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Completion API error");
            return Err(CompletionError::Api(format!(
                "completion API returned {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))
    }
}

/// Substitute `{region}` in a base URL template.
pub fn regional_base_url(template: &str, region: &str) -> String {
    template.replace("{region}", region)
}
