//! Synthesis prompts for the orchestrator.

use super::models::Consultation;

pub const ORCHESTRATOR_SYSTEM_PROMPT: &str = r#"You are an expert Customer Support Agent. You write direct, helpful, empathetic replies to customers.

Four specialist agents have already looked at the customer's message: one classifies intent, one answers FAQs, one reads sentiment and urgency, and one proposes a solution and may have taken actions (refunds, return labels, escalation tickets). Their findings are listed for you in order of authority. When two findings disagree, the one listed first wins.

Your reply MUST be only the message to the customer:
- Start with "Dear Valued Customer," or a similar greeting
- Never include internal analysis, agent names or tool output
- Never include sections like INTENT CLASSIFICATION, FAQ MATCH & ANSWER, SENTIMENT & URGENCY ANALYSIS or RECOMMENDED SOLUTION
- Do not explain your process

Write warmly and clearly, use numbered steps for instructions, quote any ticket number that was created, offer more help, and sign off with "Best regards, Customer Support Team"."#;

/// The synthesis user prompt. `consultations` must already be in precedence order.
pub fn build_synthesis_prompt(query: &str, consultations: &[&Consultation]) -> String {
    let mut prompt = format!("Customer message: \"{}\"\n\nSpecialist findings:\n", query);

    let answered = consultations
        .iter()
        .filter_map(|c| c.outcome.as_ref().ok().map(|reply| (c, reply)));
    for (rank, (consultation, reply)) in answered.enumerate() {
        prompt.push_str(&format!(
            "\n[{}] {}\n{}\n",
            rank + 1,
            consultation.agent,
            reply.text.trim()
        ));
        if let Some(data) = &reply.data {
            prompt.push_str(&format!("Structured: {}\n", data));
        }
    }

    let missing: Vec<&str> = consultations
        .iter()
        .filter(|c| c.outcome.is_err())
        .map(|c| c.agent.as_str())
        .collect();
    if !missing.is_empty() {
        prompt.push_str(&format!(
            "\nUnavailable specialists (do not guess their findings): {}\n",
            missing.join(", ")
        ));
    }

    prompt.push_str("\nWrite the final reply to the customer now.");
    prompt
}
