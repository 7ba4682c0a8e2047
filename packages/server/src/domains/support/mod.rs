//! Support domain: orchestration of the worker agents and the streaming gateway.

pub mod events;
pub mod gateway;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod reply;

pub use events::StreamEvent;
pub use gateway::{ConfigOrchestratorFactory, OrchestratorFactory, SupportGateway};
pub use models::{Consultation, ConsultationReport, SupportError};
pub use orchestrator::{Orchestrator, OrchestratorPolicy};
pub use reply::finalize_reply;
