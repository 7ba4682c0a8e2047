//! Consultation records and support errors.

use std::time::Duration;

use agent_protocol::AgentReply;
use thiserror::Error;

use crate::domains::agents::AgentKind;

/// The result-or-error of calling one worker agent.
#[derive(Debug, Clone)]
pub struct Consultation {
    pub agent: String,
    pub outcome: Result<AgentReply, String>,
    pub elapsed: Duration,
}

impl Consultation {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Conflict rank of the agent that answered; unknown agents rank last.
    pub fn precedence(&self) -> u8 {
        AgentKind::from_agent_name(&self.agent)
            .map(AgentKind::precedence)
            .unwrap_or(u8::MAX)
    }
}

/// Every consultation of one orchestration, in registry order.
#[derive(Debug, Clone, Default)]
pub struct ConsultationReport {
    pub consultations: Vec<Consultation>,
}

impl ConsultationReport {
    pub fn new(consultations: Vec<Consultation>) -> Self {
        Self { consultations }
    }

    pub fn len(&self) -> usize {
        self.consultations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consultations.is_empty()
    }

    pub fn succeeded_count(&self) -> usize {
        self.consultations.iter().filter(|c| c.succeeded()).count()
    }

    pub fn failures(&self) -> Vec<&Consultation> {
        self.consultations.iter().filter(|c| !c.succeeded()).collect()
    }

    pub fn get(&self, agent: &str) -> Option<&Consultation> {
        self.consultations.iter().find(|c| c.agent == agent)
    }

    /// Consultations ordered by conflict precedence (stable).
    pub fn by_precedence(&self) -> Vec<&Consultation> {
        let mut ordered: Vec<&Consultation> = self.consultations.iter().collect();
        ordered.sort_by_key(|c| c.precedence());
        ordered
    }

    /// `agent: reason` for each failed consultation.
    pub fn failure_summary(&self) -> String {
        self.failures()
            .iter()
            .filter_map(|c| c.outcome.as_ref().err().map(|e| format!("{}: {}", c.agent, e)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Error)]
pub enum SupportError {
    #[error("only {succeeded} of {required} required agents answered ({failures})")]
    InsufficientAgents {
        succeeded: usize,
        required: usize,
        failures: String,
    },

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("synthesis produced an empty reply")]
    EmptyReply,

    #[error("orchestrator initialization failed: {0}")]
    Initialization(String),
}
