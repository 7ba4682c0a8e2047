//! Intent grounding: order numbers and urgency.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::agents::models::Urgency;

lazy_static! {
    static ref ORDER_ID_RE: Regex = Regex::new(r"(?i)(?:order|#)\s*#?(\w{4,})").unwrap();
}

pub const ORDER_NOT_FOUND: &str = "Not found";

const HIGH_URGENCY_WORDS: &[&str] = &["now", "urgent", "asap", "immediately", "today"];
const MEDIUM_URGENCY_WORDS: &[&str] = &["soon", "quickly"];

/// First order number in the message (`order A1234`, `#A1234`, `order #A1234`).
pub fn extract_order_id(message: &str) -> Option<String> {
    ORDER_ID_RE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Keyword urgency. Matching is by substring, so "nowhere" counts as "now".
pub fn detect_urgency(message: &str) -> Urgency {
    let lowered = message.to_lowercase();
    if HIGH_URGENCY_WORDS.iter().any(|w| lowered.contains(w)) {
        Urgency::High
    } else if MEDIUM_URGENCY_WORDS.iter().any(|w| lowered.contains(w)) {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}
