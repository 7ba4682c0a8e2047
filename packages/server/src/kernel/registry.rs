//! Agent registry: the fixed set of worker agents the orchestrator consults.
//!
//! Built once at startup from descriptors. Construction never touches the
//! network; an unreachable worker surfaces on its first invocation.

use std::sync::Arc;

use agent_protocol::{AgentCard, AgentClient, AgentReply};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use super::deps::AgentClientAdapter;
use super::traits::BaseAgentClient;
use crate::domains::agents::AgentKind;

/// Static description of one worker agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    pub name: String,
    pub url: String,
    pub description: String,
}

impl AgentDescriptor {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: description.into(),
        }
    }

    pub fn for_kind(kind: AgentKind, url: impl Into<String>) -> Self {
        Self::new(kind.name(), url, kind.description())
    }
}

/// A descriptor bound to the client used to reach it.
pub struct RegisteredAgent {
    pub descriptor: AgentDescriptor,
    client: Arc<dyn BaseAgentClient>,
}

impl RegisteredAgent {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn client(&self) -> &Arc<dyn BaseAgentClient> {
        &self.client
    }
}

pub struct AgentRegistry {
    agents: Vec<RegisteredAgent>,
}

impl AgentRegistry {
    /// Build one client per descriptor, in the given order.
    pub fn new<F>(descriptors: Vec<AgentDescriptor>, client_factory: F) -> Self
    where
        F: Fn(&AgentDescriptor) -> Arc<dyn BaseAgentClient>,
    {
        let agents = descriptors
            .into_iter()
            .map(|descriptor| {
                let client = client_factory(&descriptor);
                RegisteredAgent { descriptor, client }
            })
            .collect();

        Self { agents }
    }

    /// Registry of the four default agents at the given base URLs, in
    /// intent, faq, review, solution order. Clients share one HTTP pool.
    pub fn from_addresses<S: AsRef<str>>(addresses: &[S]) -> Result<Self> {
        if addresses.len() != AgentKind::ALL.len() {
            anyhow::bail!(
                "expected {} agent addresses (intent, faq, review, solution), got {}",
                AgentKind::ALL.len(),
                addresses.len()
            );
        }

        let descriptors = AgentKind::ALL
            .iter()
            .zip(addresses)
            .map(|(kind, url)| AgentDescriptor::for_kind(*kind, url.as_ref()))
            .collect();

        let http_client = reqwest::Client::new();
        Ok(Self::new(descriptors, move |descriptor| {
            Arc::new(AgentClientAdapter::new(AgentClient::with_http_client(
                http_client.clone(),
                descriptor.url.clone(),
            )))
        }))
    }

    /// Agents in registry order.
    pub fn agents(&self) -> impl Iterator<Item = &RegisteredAgent> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredAgent> {
        self.agents.iter().find(|a| a.descriptor.name == name)
    }

    /// Call one agent by name.
    pub async fn invoke(&self, name: &str, query: &str) -> Result<AgentReply> {
        let agent = self
            .get(name)
            .with_context(|| format!("unknown agent: {}", name))?;

        debug!(agent = %name, url = %agent.descriptor.url, "Invoking agent");
        agent.client.send(query).await
    }

    /// Each agent advertised as a callable action.
    pub fn capabilities(&self) -> Vec<Value> {
        self.agents
            .iter()
            .map(|a| {
                json!({
                    "name": a.descriptor.name,
                    "description": a.descriptor.description,
                    "url": a.descriptor.url,
                })
            })
            .collect()
    }

    /// Fetch an agent's card on demand.
    pub async fn fetch_card(&self, name: &str) -> Result<AgentCard> {
        let agent = self
            .get(name)
            .with_context(|| format!("unknown agent: {}", name))?;
        agent.client.card().await
    }
}
