//! Worker agents domain - intent, FAQ, review and solution agents.
//!
//! Each worker runs its deterministic grounding tools on the query, then asks
//! the model for a reply (offering its action tools), and answers over the
//! agent protocol with text plus a small structured record.

pub mod models;
pub mod prompts;
pub mod tools;
pub mod worker;

pub use models::{AgentKind, Emotion, Urgency};
pub use worker::WorkerAgent;
