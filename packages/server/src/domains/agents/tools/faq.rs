//! FAQ lookup and promotions.

use std::convert::Infallible;

use async_trait::async_trait;
use completion_client::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NO_FAQ_MATCH: &str = "No FAQ match found.";

pub const PROMOTIONS: &str = "Current Promotions:\n\
• WELCOME20 → 20% off your first order\n\
• Free shipping on orders over $50\n\
• Buy 2 Get 1 Free on select items (ends soon!)\n\
• 15% off electronics with code TECH15";

/// Keyword table, checked in order.
const FAQS: &[(&str, &str)] = &[
    (
        "return",
        "Yes! Here's our return policy:\n\n\
         You have 30 days from delivery to return most items. \
         The item must be unused and in original packaging. We provide a free prepaid return label. \
         Refunds are processed within 5-7 business days after we receive the item.",
    ),
    (
        "shipping",
        "Yes! Shipping details:\n\n\
         • Standard: 5-7 business days\n\
         • Express: 2-3 business days\n\
         • Free shipping on orders over $50\n\
         • Tracking link sent via email",
    ),
    (
        "cancel",
        "Yes! Order cancellation:\n\n\
         You can cancel within 1 hour of placing the order for free. \
         After that, please contact support — we'll do our best to help!",
    ),
    (
        "payment",
        "We accept all major credit cards, PayPal, Apple Pay, Google Pay, and Klarna.",
    ),
    (
        "warranty",
        "All products come with a 1-year warranty against manufacturing defects.",
    ),
    (
        "track",
        "You can track your order using the link in your confirmation email, \
         or log into your account → Orders → View Details.",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqMatch {
    pub topic: &'static str,
    pub answer: &'static str,
}

/// First FAQ whose keyword appears in the lowercased question.
pub fn get_faq_answer(question: &str) -> Option<FaqMatch> {
    let lowered = question.to_lowercase();
    FAQS.iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|&(topic, answer)| FaqMatch { topic, answer })
}

// =============================================================================
// Model-callable tools
// =============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoArgs {}

/// Lists the promotions currently running.
pub struct GetPromotions;

#[async_trait]
impl Tool for GetPromotions {
    const NAME: &'static str = "get_promotions";
    type Args = NoArgs;
    type Output = String;
    type Error = Infallible;

    fn description(&self) -> &str {
        "Returns the promotions and discount codes currently active"
    }

    async fn call(&self, _args: NoArgs) -> Result<String, Infallible> {
        Ok(PROMOTIONS.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_in_table_order() {
        let hit = get_faq_answer("What is your RETURN policy for shipping damage?").unwrap();
        assert_eq!(hit.topic, "return");
        assert!(hit.answer.starts_with("Yes! Here's our return policy"));
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(get_faq_answer("can I cancelled my order").unwrap().topic, "cancel");
        assert_eq!(get_faq_answer("where is my tracking number").unwrap().topic, "track");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(get_faq_answer("do you sell gift cards?"), None);
    }

    #[test]
    fn test_payment_answer_text() {
        assert_eq!(
            get_faq_answer("which payment methods?").unwrap().answer,
            "We accept all major credit cards, PayPal, Apple Pay, Google Pay, and Klarna."
        );
    }

    #[tokio::test]
    async fn test_promotions_tool() {
        let tool = GetPromotions;
        assert_eq!(tool.definition().name, "get_promotions");

        let text = tool.call(NoArgs {}).await.unwrap();
        assert!(text.starts_with("Current Promotions:\n"));
        assert!(text.contains("WELCOME20"));
        assert!(text.ends_with("code TECH15"));
    }
}
