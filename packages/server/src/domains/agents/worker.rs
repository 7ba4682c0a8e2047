//! A worker agent: grounding tools, then the model with its action tools.

use agent_protocol::{AgentCard, AgentHandler, AgentReply, AgentSkill, HandlerError};
use async_trait::async_trait;
use completion_client::CompletionClient;
use tracing::{debug, error, info};

use super::models::AgentKind;
use super::prompts::{build_worker_prompt, system_prompt};
use super::tools;

pub const AGENT_VERSION: &str = "1.0.0";

/// Maximum model round-trips per query.
const MAX_ITERATIONS: usize = 5;

pub struct WorkerAgent {
    kind: AgentKind,
    client: CompletionClient,
    model: String,
    public_url: String,
}

impl WorkerAgent {
    pub fn new(
        kind: AgentKind,
        client: CompletionClient,
        model: impl Into<String>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            client,
            model: model.into(),
            public_url: public_url.into(),
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }
}

#[async_trait]
impl AgentHandler for WorkerAgent {
    fn card(&self) -> AgentCard {
        AgentCard {
            name: self.kind.name().to_string(),
            description: self.kind.description().to_string(),
            url: self.public_url.clone(),
            version: AGENT_VERSION.to_string(),
            skills: skills(self.kind),
        }
    }

    async fn handle(&self, text: &str) -> Result<AgentReply, HandlerError> {
        let grounding = tools::ground(self.kind, text);
        debug!(agent = %self.kind, grounding = %grounding, "Grounding tools ran");

        let mut builder = self
            .client
            .agent(&self.model)
            .system(system_prompt(self.kind))
            .max_iterations(MAX_ITERATIONS);
        for tool in tools::action_tools(self.kind) {
            builder = builder.boxed_tool(tool);
        }

        let response = builder
            .build()
            .chat(build_worker_prompt(text, &grounding))
            .await
            .map_err(|e| {
                error!(agent = %self.kind, error = %e, "Completion failed");
                HandlerError::Internal(format!("completion failed: {}", e))
            })?;

        let data = tools::structured_record(self.kind, &grounding, &response.tool_calls);

        info!(
            agent = %self.kind,
            iterations = response.iterations,
            tools_used = ?response.tools_used(),
            reply_len = response.content.len(),
            "Agent answered"
        );

        Ok(AgentReply::text(response.content).with_data(data))
    }
}

fn skill(id: &str, description: &str) -> AgentSkill {
    AgentSkill {
        id: id.to_string(),
        name: id.replace('_', " "),
        description: description.to_string(),
    }
}

/// Skills advertised on the agent card.
pub fn skills(kind: AgentKind) -> Vec<AgentSkill> {
    match kind {
        AgentKind::Intent => vec![
            skill("extract_order_id", "Finds the order number in a message"),
            skill("detect_urgency", "Rates urgency as Low, Medium or High"),
        ],
        AgentKind::Faq => vec![
            skill("get_faq_answer", "Answers return, shipping, cancellation, payment, warranty and tracking questions"),
            skill("get_promotions", "Lists the active promotions"),
        ],
        AgentKind::Review => vec![
            skill("detect_profanity_and_threats", "Flags profanity and legal threats"),
            skill("analyze_emotion_and_urgency", "Reads the dominant emotion and urgency"),
            skill("extract_key_quotes", "Quotes the most emotional sentences"),
        ],
        AgentKind::Solution => vec![
            skill("initiate_refund", "Refunds an order"),
            skill("generate_return_label", "Emails a prepaid return label"),
            skill("create_escalation_ticket", "Escalates to a senior agent"),
            skill("thank_customer", "Thanks a happy customer"),
        ],
    }
}
