// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use agent_protocol::{AgentCard, AgentReply};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{AgentDescriptor, AgentRegistry, BaseAgentClient, BaseCompletion, ServerDeps};
use crate::domains::agents::AgentKind;
use crate::domains::support::{Orchestrator, OrchestratorFactory, OrchestratorPolicy};

// =============================================================================
// Mock Completion
// =============================================================================

/// Arguments captured from a completion call
#[derive(Debug, Clone)]
pub struct CompletionCallArgs {
    pub system_prompt: String,
    pub user_prompt: String,
}

pub struct MockCompletion {
    responses: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<CompletionCallArgs>>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response; queued responses are returned in order
    pub fn with_response(self, text: &str) -> Self {
        self.responses.lock().unwrap().push(text.to_string());
        self
    }

    /// Every call fails with this reason
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::new()
        }
    }

    /// Get all calls that were made
    pub fn calls(&self) -> Vec<CompletionCallArgs> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCompletion for MockCompletion {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(CompletionCallArgs {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        });

        if let Some(reason) = &self.failure {
            return Err(anyhow::anyhow!("{}", reason));
        }

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            Ok("Dear Valued Customer,\n\nThank you for reaching out.\n\nBest regards, Customer Support Team"
                .to_string())
        }
    }
}

// =============================================================================
// Mock Agent Client
// =============================================================================

pub struct MockAgentClient {
    name: String,
    reply: std::result::Result<AgentReply, String>,
    delay: Option<Duration>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockAgentClient {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            name: "mock_agent".to_string(),
            reply: Ok(AgentReply::text(text)),
            delay: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call fails with this reason
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
            ..Self::replying("")
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.reply = self.reply.map(|reply| reply.with_data(data));
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all queries that were sent
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseAgentClient for MockAgentClient {
    async fn send(&self, query: &str) -> Result<AgentReply> {
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply
            .clone()
            .map_err(|reason| anyhow::anyhow!("{}", reason))
    }

    async fn card(&self) -> Result<AgentCard> {
        Ok(AgentCard {
            name: self.name.clone(),
            description: "Mock agent".to_string(),
            url: format!("mock://{}", self.name),
            version: "1.0.0".to_string(),
            skills: vec![],
        })
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock dependencies for the four default agents
pub struct TestDependencies {
    pub completion: Arc<MockCompletion>,
    /// One mock per agent kind, in registry order
    pub agents: Vec<Arc<MockAgentClient>>,
}

impl TestDependencies {
    /// Every agent answers with a short canned analysis
    pub fn new() -> Self {
        let agents = AgentKind::ALL
            .iter()
            .map(|kind| {
                Arc::new(
                    MockAgentClient::replying(format!("{} analysis", kind.name()))
                        .named(kind.name()),
                )
            })
            .collect();

        Self {
            completion: Arc::new(MockCompletion::new()),
            agents,
        }
    }

    pub fn with_completion(mut self, completion: MockCompletion) -> Self {
        self.completion = Arc::new(completion);
        self
    }

    /// Replace the mock for one agent kind
    pub fn with_agent(mut self, kind: AgentKind, agent: MockAgentClient) -> Self {
        if let Some(index) = AgentKind::ALL.iter().position(|k| *k == kind) {
            self.agents[index] = Arc::new(agent.named(kind.name()));
        }
        self
    }

    pub fn mock(&self, kind: AgentKind) -> &Arc<MockAgentClient> {
        let index = AgentKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.agents[index]
    }

    pub fn server_deps(&self) -> ServerDeps {
        let descriptors = AgentKind::ALL
            .iter()
            .map(|kind| AgentDescriptor::for_kind(*kind, format!("mock://{}", kind.name())))
            .collect();

        let agents = self.agents.clone();
        let registry = AgentRegistry::new(descriptors, move |descriptor| {
            let index = AgentKind::ALL
                .iter()
                .position(|k| k.name() == descriptor.name)
                .unwrap_or_default();
            agents[index].clone() as Arc<dyn BaseAgentClient>
        });

        ServerDeps::new(self.completion.clone(), Arc::new(registry))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Mock Orchestrator Factory
// =============================================================================

/// Builds orchestrators over fixed dependencies, counting each build
pub struct MockOrchestratorFactory {
    deps: ServerDeps,
    policy: OrchestratorPolicy,
    failures_remaining: AtomicUsize,
    delay: Option<Duration>,
    builds: Arc<AtomicUsize>,
}

impl MockOrchestratorFactory {
    pub fn new(deps: ServerDeps) -> Self {
        Self {
            deps,
            policy: OrchestratorPolicy::default(),
            failures_remaining: AtomicUsize::new(0),
            delay: None,
            builds: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_policy(mut self, policy: OrchestratorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The first `n` builds fail
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Sleep inside each build
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared count of build attempts
    pub fn build_counter(&self) -> Arc<AtomicUsize> {
        self.builds.clone()
    }
}

#[async_trait]
impl OrchestratorFactory for MockOrchestratorFactory {
    async fn build(&self) -> Result<Orchestrator> {
        self.builds.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            anyhow::bail!("mock orchestrator build failure");
        }

        Ok(Orchestrator::new(self.deps.clone(), self.policy.clone()))
    }
}
