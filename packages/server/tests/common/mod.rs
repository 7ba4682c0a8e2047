// Common test utilities

pub mod fake_model;
pub mod harness;

pub use fake_model::*;
pub use harness::*;
