// HTTP routes
pub mod health;
pub mod support;

pub use health::*;
pub use support::*;
