//! Orchestrator: consult every worker, then synthesize one customer reply.
//!
//! Consultation and synthesis are separate steps. `consult` always calls
//! every registered worker exactly once and records a result-or-error for
//! each; the quorum policy then decides whether synthesis may go ahead.

use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::models::{Consultation, ConsultationReport, SupportError};
use super::prompts::{build_synthesis_prompt, ORCHESTRATOR_SYSTEM_PROMPT};
use super::reply::finalize_reply;
use crate::kernel::{AgentRegistry, RegisteredAgent, ServerDeps};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorPolicy {
    /// Successful consultations needed before synthesizing.
    pub min_agent_responses: usize,
    /// Per-worker limit; `None` waits indefinitely.
    pub worker_timeout: Option<Duration>,
}

impl Default for OrchestratorPolicy {
    /// Every worker must answer, with no timeout.
    fn default() -> Self {
        Self {
            min_agent_responses: 4,
            worker_timeout: None,
        }
    }
}

pub struct Orchestrator {
    deps: ServerDeps,
    policy: OrchestratorPolicy,
}

impl Orchestrator {
    pub fn new(deps: ServerDeps, policy: OrchestratorPolicy) -> Self {
        Self { deps, policy }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.deps.registry
    }

    pub fn policy(&self) -> &OrchestratorPolicy {
        &self.policy
    }

    /// Answer one customer message end to end.
    pub async fn respond(&self, query: &str) -> Result<String, SupportError> {
        let report = self.consult(query).await;
        info!(
            consulted = report.len(),
            succeeded = report.succeeded_count(),
            "Agents consulted"
        );

        self.check_quorum(&report)?;
        self.synthesize(query, &report).await
    }

    /// Call every registered worker concurrently, in registry order.
    pub async fn consult(&self, query: &str) -> ConsultationReport {
        let calls = self
            .deps
            .registry
            .agents()
            .map(|agent| self.consult_one(agent, query));

        ConsultationReport::new(join_all(calls).await)
    }

    async fn consult_one(&self, agent: &RegisteredAgent, query: &str) -> Consultation {
        let started = Instant::now();
        let call = agent.client().send(query);

        let outcome = match self.policy.worker_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(|e| format!("{:#}", e)),
                Err(_) => Err(format!("no answer within {}s", limit.as_secs_f32())),
            },
            None => call.await.map_err(|e| format!("{:#}", e)),
        };

        let elapsed = started.elapsed();
        match &outcome {
            Ok(_) => debug!(
                agent = %agent.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Agent answered"
            ),
            Err(reason) => warn!(
                agent = %agent.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %reason,
                "Agent consultation failed"
            ),
        }

        Consultation {
            agent: agent.name().to_string(),
            outcome,
            elapsed,
        }
    }

    /// Fail when fewer workers answered than the policy requires.
    pub fn check_quorum(&self, report: &ConsultationReport) -> Result<(), SupportError> {
        let succeeded = report.succeeded_count();
        if succeeded < self.policy.min_agent_responses {
            return Err(SupportError::InsufficientAgents {
                succeeded,
                required: self.policy.min_agent_responses,
                failures: report.failure_summary(),
            });
        }
        Ok(())
    }

    /// One completion call over the findings, then the formatting contract.
    pub async fn synthesize(
        &self,
        query: &str,
        report: &ConsultationReport,
    ) -> Result<String, SupportError> {
        let prompt = build_synthesis_prompt(query, &report.by_precedence());

        let raw = self
            .deps
            .completion
            .complete(ORCHESTRATOR_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| SupportError::Synthesis(format!("{:#}", e)))?;

        let reply = finalize_reply(&raw);
        if reply.is_empty() {
            return Err(SupportError::EmptyReply);
        }

        debug!(raw_len = raw.len(), reply_len = reply.len(), "Reply synthesized");
        Ok(reply)
    }
}
