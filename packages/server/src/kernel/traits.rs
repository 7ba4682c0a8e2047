// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Orchestration and synthesis are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseCompletion, BaseAgentClient)

use agent_protocol::{AgentCard, AgentReply};
use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Completion Trait (Infrastructure - hosted language model)
// =============================================================================

#[async_trait]
pub trait BaseCompletion: Send + Sync {
    /// Complete a user prompt under a system prompt (returns raw text response)
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

// =============================================================================
// Agent Client Trait (Infrastructure - remote worker agents)
// =============================================================================

#[async_trait]
pub trait BaseAgentClient: Send + Sync {
    /// Send one text query to the agent and wait for its reply
    async fn send(&self, query: &str) -> Result<AgentReply>;

    /// Fetch the card the agent advertises
    async fn card(&self) -> Result<AgentCard>;
}
