//! Deterministic helpers the worker agents ground their answers on.
//!
//! Grounding tools run on every query before the model is called; action
//! tools are offered to the model through the tool-calling loop.

pub mod faq;
pub mod intent;
pub mod review;
pub mod solution;

use completion_client::{ErasedTool, ToolInvocation};
use serde_json::{json, Value};

use super::models::AgentKind;

pub use faq::{get_faq_answer, GetPromotions};
pub use intent::{detect_urgency, extract_order_id};
pub use review::{analyze_emotion_and_urgency, detect_profanity_and_threats, extract_key_quotes};
pub use solution::{
    ActionOutcome, CreateEscalationTicket, GenerateReturnLabel, InitiateRefund, ThankCustomer,
};

/// Run the kind's grounding tools on the query.
pub fn ground(kind: AgentKind, query: &str) -> Value {
    match kind {
        AgentKind::Intent => json!({
            "order_id": extract_order_id(query).unwrap_or_else(|| intent::ORDER_NOT_FOUND.to_string()),
            "urgency": detect_urgency(query),
        }),
        AgentKind::Faq => match get_faq_answer(query) {
            Some(hit) => json!({ "faq_topic": hit.topic, "faq_answer": hit.answer }),
            None => json!({ "faq_topic": null, "faq_answer": faq::NO_FAQ_MATCH }),
        },
        AgentKind::Review => {
            let threats = detect_profanity_and_threats(query);
            let reading = analyze_emotion_and_urgency(query);
            json!({
                "urgency": reading.urgency,
                "emotion": reading.emotion,
                "profanity": threats.profanity,
                "legal_threat": threats.legal_threat,
                "escalation_needed": review::escalation_needed(threats, reading),
                "key_quotes": extract_key_quotes(query),
            })
        }
        AgentKind::Solution => json!({ "order_id": extract_order_id(query) }),
    }
}

/// Tools the model may call for this kind.
pub fn action_tools(kind: AgentKind) -> Vec<Box<dyn ErasedTool>> {
    match kind {
        AgentKind::Faq => vec![Box::new(GetPromotions)],
        AgentKind::Solution => vec![
            Box::new(InitiateRefund),
            Box::new(GenerateReturnLabel),
            Box::new(CreateEscalationTicket),
            Box::new(ThankCustomer),
        ],
        AgentKind::Intent | AgentKind::Review => Vec::new(),
    }
}

/// The structured record returned alongside the agent's text.
pub fn structured_record(kind: AgentKind, grounding: &Value, tool_calls: &[ToolInvocation]) -> Value {
    match kind {
        AgentKind::Intent => json!({
            "order_id": grounding["order_id"]
                .as_str()
                .filter(|id| *id != intent::ORDER_NOT_FOUND),
            "urgency": grounding["urgency"],
        }),
        AgentKind::Faq => json!({ "faq_topic": grounding["faq_topic"] }),
        AgentKind::Review => json!({
            "urgency": grounding["urgency"],
            "emotion": grounding["emotion"],
            "profanity": grounding["profanity"],
            "legal_threat": grounding["legal_threat"],
            "escalation_needed": grounding["escalation_needed"],
        }),
        AgentKind::Solution => {
            let outcomes: Vec<ActionOutcome> = tool_calls
                .iter()
                .filter_map(|call| call.output_json())
                .filter_map(|output| serde_json::from_value(output).ok())
                .collect();

            let ticket_id = outcomes.iter().rev().find_map(|o| o.ticket_id.clone());
            let order_id = outcomes
                .iter()
                .rev()
                .find_map(|o| o.order_id.clone())
                .or_else(|| grounding["order_id"].as_str().map(str::to_string));

            json!({ "ticket_id": ticket_id, "order_id": order_id })
        }
    }
}
