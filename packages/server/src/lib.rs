// Customer Support Assistant - Core
//
// Worker agents (intent, faq, review, solution) answer narrow questions over the
// agent protocol. The orchestrator consults all of them and synthesizes one
// customer-facing reply, which the gateway streams back as server-sent events.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
