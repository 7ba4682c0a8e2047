//! Solution actions the model may take on the customer's behalf.

use std::convert::Infallible;

use async_trait::async_trait;
use completion_client::Tool;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::faq::NoArgs;

pub const THANK_YOU: &str = "We're so happy to hear that! Thank you for your kind words — it means a lot to our team! Your satisfaction is our top priority.";

/// What an action tool reports back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub ticket_id: Option<String>,
    pub order_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrderArgs {
    /// Customer order number, without the leading '#'
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EscalationArgs {
    /// Customer order number, without the leading '#'
    #[serde(default)]
    pub order_id: Option<String>,
    /// Why the case needs a senior agent
    #[serde(default)]
    pub reason: Option<String>,
}

pub fn refund_ticket_id() -> String {
    format!("REF{}", rand::thread_rng().gen_range(10000..=99999))
}

pub fn escalation_ticket_id() -> String {
    format!("ESC{}", rand::thread_rng().gen_range(1000..=9999))
}

pub struct InitiateRefund;

#[async_trait]
impl Tool for InitiateRefund {
    const NAME: &'static str = "initiate_refund";
    type Args = OrderArgs;
    type Output = ActionOutcome;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Refund an order to the original payment method. Use for double charges and refund requests."
    }

    async fn call(&self, args: OrderArgs) -> Result<ActionOutcome, Infallible> {
        let ticket = refund_ticket_id();
        let order = args.order_id.as_deref().unwrap_or("the order");
        Ok(ActionOutcome {
            message: format!(
                "Refund successfully initiated!\n\
                 • Order: #{}\n\
                 • Ticket: {}\n\
                 • Full amount will be refunded to your original payment method\n\
                 • Expected: 3–5 business days\n\
                 • Confirmation email sent to your inbox",
                order, ticket
            ),
            ticket_id: Some(ticket),
            order_id: args.order_id,
        })
    }
}

pub struct GenerateReturnLabel;

#[async_trait]
impl Tool for GenerateReturnLabel {
    const NAME: &'static str = "generate_return_label";
    type Args = OrderArgs;
    type Output = ActionOutcome;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Email the customer a free prepaid return label. Use for return requests."
    }

    async fn call(&self, args: OrderArgs) -> Result<ActionOutcome, Infallible> {
        let order = args.order_id.as_deref().unwrap_or("your order");
        Ok(ActionOutcome {
            message: format!(
                "Free return label generated!\n\
                 • Order: #{}\n\
                 • Prepaid label emailed to you\n\
                 • Pack item securely (original packaging preferred)\n\
                 • Drop off at any UPS/FedEx/USPS location\n\
                 • We'll process refund upon receipt",
                order
            ),
            ticket_id: None,
            order_id: args.order_id,
        })
    }
}

pub struct CreateEscalationTicket;

#[async_trait]
impl Tool for CreateEscalationTicket {
    const NAME: &'static str = "create_escalation_ticket";
    type Args = EscalationArgs;
    type Output = ActionOutcome;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Open an urgent ticket for a senior agent. Use when the customer is angry, urgent, abusive or threatening legal action."
    }

    async fn call(&self, args: EscalationArgs) -> Result<ActionOutcome, Infallible> {
        let ticket = escalation_ticket_id();
        let order = args.order_id.as_deref().unwrap_or("N/A");
        let reason = args.reason.as_deref().unwrap_or("Urgent issue");
        Ok(ActionOutcome {
            message: format!(
                "URGENT ESCALATION TICKET CREATED: {}\n\
                 • Order: #{}\n\
                 • Reason: {}\n\
                 • Senior agent assigned\n\
                 • You will be contacted within 30 minutes via phone/email\n\
                 • We're prioritizing your case — thank you for your patience",
                ticket, order, reason
            ),
            ticket_id: Some(ticket),
            order_id: args.order_id,
        })
    }
}

pub struct ThankCustomer;

#[async_trait]
impl Tool for ThankCustomer {
    const NAME: &'static str = "thank_customer";
    type Args = NoArgs;
    type Output = ActionOutcome;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Thank a happy customer for their kind words"
    }

    async fn call(&self, _args: NoArgs) -> Result<ActionOutcome, Infallible> {
        Ok(ActionOutcome {
            ticket_id: None,
            order_id: None,
            message: THANK_YOU.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_formats() {
        for _ in 0..50 {
            let refund = refund_ticket_id();
            assert!(refund.starts_with("REF"));
            let n: u32 = refund[3..].parse().unwrap();
            assert!((10000..=99999).contains(&n));

            let escalation = escalation_ticket_id();
            assert!(escalation.starts_with("ESC"));
            let n: u32 = escalation[3..].parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[tokio::test]
    async fn test_refund_reports_ticket_and_order() {
        let outcome = InitiateRefund
            .call(OrderArgs {
                order_id: Some("A1234".to_string()),
            })
            .await
            .unwrap();

        let ticket = outcome.ticket_id.clone().unwrap();
        assert_eq!(outcome.order_id.as_deref(), Some("A1234"));
        assert!(outcome.message.starts_with("Refund successfully initiated!"));
        assert!(outcome.message.contains("• Order: #A1234"));
        assert!(outcome.message.contains(&format!("• Ticket: {}", ticket)));
    }

    #[test]
    fn test_return_label_defaults() {
        let outcome =
            tokio_test::block_on(GenerateReturnLabel.call(OrderArgs { order_id: None })).unwrap();

        assert_eq!(outcome.ticket_id, None);
        assert_eq!(outcome.order_id, None);
        assert!(outcome.message.contains("• Order: #your order"));
    }

    #[tokio::test]
    async fn test_escalation_defaults() {
        let outcome = CreateEscalationTicket
            .call(EscalationArgs {
                order_id: None,
                reason: None,
            })
            .await
            .unwrap();

        assert!(outcome.ticket_id.unwrap().starts_with("ESC"));
        assert!(outcome.message.contains("• Order: #N/A"));
        assert!(outcome.message.contains("• Reason: Urgent issue"));
    }

    #[test]
    fn test_order_args_accept_empty_object() {
        let args: OrderArgs = serde_json::from_str("{}").unwrap();
        assert!(args.order_id.is_none());
    }

    #[tokio::test]
    async fn test_thank_customer() {
        let outcome = ThankCustomer.call(NoArgs {}).await.unwrap();
        assert_eq!(outcome.message, THANK_YOU);
        assert_eq!(outcome.ticket_id, None);
    }
}
