//! Sentiment review: profanity, legal threats, emotion and quotes.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::domains::agents::models::{Emotion, Urgency};

lazy_static! {
    static ref PROFANITY_RE: Regex =
        Regex::new(r"(?i)\b(fuck|shit|bitch|asshole|scam|fraud|cunt)\b").unwrap();
    static ref LEGAL_THREAT_RE: Regex =
        Regex::new(r"(?i)\b(sue|lawyer|complaint|regulator|legal|report you)\b").unwrap();
    static ref SENTENCE_BREAK_RE: Regex = Regex::new(r"[.!?]+").unwrap();
}

const URGENCY_WORDS: &[&str] = &["now", "urgent", "immediately", "asap", "today", "right now"];
const ANGER_WORDS: &[&str] = &[
    "angry",
    "furious",
    "unacceptable",
    "ridiculous",
    "disgusting",
    "hate",
];
const HAPPY_WORDS: &[&str] = &["great", "love", "thank", "awesome", "happy", "perfect"];
const QUOTE_WORDS: &[&str] = &[
    "angry", "urgent", "love", "hate", "please", "now", "sorry", "thank",
];

pub const NO_QUOTES: &str = "No strong emotional quotes found.";
const MAX_QUOTES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreatScan {
    pub profanity: bool,
    pub legal_threat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionReading {
    pub urgency: Urgency,
    pub emotion: Emotion,
}

pub fn detect_profanity_and_threats(message: &str) -> ThreatScan {
    ThreatScan {
        profanity: PROFANITY_RE.is_match(message),
        legal_threat: LEGAL_THREAT_RE.is_match(message),
    }
}

pub fn analyze_emotion_and_urgency(message: &str) -> EmotionReading {
    let lowered = message.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    let urgency = if has_any(URGENCY_WORDS) {
        Urgency::High
    } else if lowered.contains("soon") {
        Urgency::Medium
    } else {
        Urgency::Low
    };

    let emotion = if has_any(ANGER_WORDS) {
        Emotion::Angry
    } else if has_any(HAPPY_WORDS) {
        Emotion::Happy
    } else if urgency == Urgency::High {
        Emotion::Frustrated
    } else {
        Emotion::Neutral
    };

    EmotionReading { urgency, emotion }
}

/// Up to two sentences carrying emotional keywords, or a single placeholder.
pub fn extract_key_quotes(message: &str) -> Vec<String> {
    let quotes: Vec<String> = SENTENCE_BREAK_RE
        .split(message)
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            QUOTE_WORDS.iter().any(|w| lowered.contains(w))
        })
        .take(MAX_QUOTES)
        .map(|sentence| format!("{}.", sentence.trim()))
        .collect();

    if quotes.is_empty() {
        vec![NO_QUOTES.to_string()]
    } else {
        quotes
    }
}

/// Escalate on profanity, a legal threat, or high urgency with a negative emotion.
pub fn escalation_needed(threats: ThreatScan, reading: EmotionReading) -> bool {
    threats.profanity
        || threats.legal_threat
        || (reading.urgency == Urgency::High
            && matches!(reading.emotion, Emotion::Angry | Emotion::Frustrated))
}
