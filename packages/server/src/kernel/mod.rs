//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod llm_request;
pub mod pacing;
pub mod registry;
pub mod test_dependencies;
pub mod traits;

pub use deps::{AgentClientAdapter, ServerDeps};
pub use llm_request::ModelCompletion;
pub use pacing::{split_code_points, Pacer, PacingConfig};
pub use registry::{AgentDescriptor, AgentRegistry, RegisteredAgent};
pub use test_dependencies::TestDependencies;
pub use traits::*;
