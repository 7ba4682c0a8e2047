//! Agent kinds and the small vocabularies their tools produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four worker agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Intent,
    Faq,
    Review,
    Solution,
}

impl AgentKind {
    /// Registry order.
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Intent,
        AgentKind::Faq,
        AgentKind::Review,
        AgentKind::Solution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Intent => "intent_agent",
            AgentKind::Faq => "faq_agent",
            AgentKind::Review => "review_agent",
            AgentKind::Solution => "solution_agent",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentKind::Intent => {
                "Classifies intent, urgency, emotion, and extracts order numbers"
            }
            AgentKind::Faq => "Handles common FAQs and promotions using reliable tools",
            AgentKind::Review => {
                "Sentiment analysis with profanity detection, urgency scoring, and quote extraction"
            }
            AgentKind::Solution => {
                "Provides empathetic solutions and takes real actions (refund, return, escalate)"
            }
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            AgentKind::Intent => 8001,
            AgentKind::Faq => 8002,
            AgentKind::Review => 8003,
            AgentKind::Solution => 8004,
        }
    }

    /// Rank used when worker outputs disagree; lower wins.
    ///
    /// Policy facts beat actions taken, which beat tone, which beats
    /// classification.
    pub fn precedence(self) -> u8 {
        match self {
            AgentKind::Faq => 0,
            AgentKind::Solution => 1,
            AgentKind::Review => 2,
            AgentKind::Intent => 3,
        }
    }

    /// Look up a kind by its agent name (`faq_agent`).
    pub fn from_agent_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    /// Accepts the short form (`faq`) or the agent name (`faq_agent`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let short = lowered.strip_suffix("_agent").unwrap_or(&lowered);
        match short {
            "intent" => Ok(AgentKind::Intent),
            "faq" => Ok(AgentKind::Faq),
            "review" | "reviewer" => Ok(AgentKind::Review),
            "solution" => Ok(AgentKind::Solution),
            other => Err(format!(
                "unknown agent kind '{}' (expected intent, faq, review or solution)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emotion {
    Angry,
    Happy,
    Frustrated,
    Neutral,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("faq".parse::<AgentKind>().unwrap(), AgentKind::Faq);
        assert_eq!("Review_Agent".parse::<AgentKind>().unwrap(), AgentKind::Review);
        assert_eq!("solution_agent".parse::<AgentKind>().unwrap(), AgentKind::Solution);
        assert!("billing".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_default_ports_are_distinct() {
        let ports: Vec<u16> = AgentKind::ALL.iter().map(|k| k.default_port()).collect();
        assert_eq!(ports, vec![8001, 8002, 8003, 8004]);
    }

    #[test]
    fn test_precedence_order() {
        let mut kinds = AgentKind::ALL.to_vec();
        kinds.sort_by_key(|k| k.precedence());
        assert_eq!(
            kinds,
            vec![
                AgentKind::Faq,
                AgentKind::Solution,
                AgentKind::Review,
                AgentKind::Intent
            ]
        );
    }

    #[test]
    fn test_from_agent_name() {
        assert_eq!(AgentKind::from_agent_name("intent_agent"), Some(AgentKind::Intent));
        assert_eq!(AgentKind::from_agent_name("intent"), None);
    }

    #[test]
    fn test_urgency_serializes_capitalized() {
        assert_eq!(serde_json::to_value(Urgency::High).unwrap(), "High");
        assert_eq!(serde_json::to_value(Emotion::Frustrated).unwrap(), "Frustrated");
    }
}
