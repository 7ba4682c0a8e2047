//! Server dependencies for the orchestrator (using traits for testability)
//!
//! All external services (worker agents, completion collaborator) sit behind
//! trait abstractions so tests can swap in mocks.

use agent_protocol::{AgentCard, AgentClient, AgentReply};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::kernel::{AgentRegistry, BaseAgentClient, BaseCompletion, ModelCompletion};

// =============================================================================
// AgentClient Adapter (implements BaseAgentClient trait)
// =============================================================================

/// Wrapper around AgentClient that implements BaseAgentClient trait
pub struct AgentClientAdapter(pub AgentClient);

impl AgentClientAdapter {
    pub fn new(client: AgentClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseAgentClient for AgentClientAdapter {
    async fn send(&self, query: &str) -> Result<AgentReply> {
        self.0
            .send_text(query)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn card(&self) -> Result<AgentCard> {
        self.0
            .fetch_card()
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies the orchestrator needs (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// Completion collaborator used for synthesis
    pub completion: Arc<dyn BaseCompletion>,
    /// The worker agents, in consultation order
    pub registry: Arc<AgentRegistry>,
}

impl ServerDeps {
    pub fn new(completion: Arc<dyn BaseCompletion>, registry: Arc<AgentRegistry>) -> Self {
        Self {
            completion,
            registry,
        }
    }

    /// Wire production dependencies from configuration. Performs no network I/O.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = AgentRegistry::from_addresses(&config.agent_urls)?;
        let completion = ModelCompletion::new(config.model.client(), &config.model.model_id);

        Ok(Self::new(Arc::new(completion), Arc::new(registry)))
    }
}
