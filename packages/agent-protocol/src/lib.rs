//! Agent invocation protocol.
//!
//! A small JSON-RPC 2.0 dialect for calling independently addressable agents:
//! each agent advertises an [`AgentCard`] and answers `message/send` calls
//! with a text reply plus an optional structured data part.
//!
//! ```rust,ignore
//! // Worker side
//! let app = agent_protocol::router(Arc::new(MyAgent));
//!
//! // Caller side
//! let reply = AgentClient::new("http://127.0.0.1:8001").send_text("hello").await?;
//! ```

pub mod client;
pub mod error;
pub mod server;
pub mod types;

pub use client::AgentClient;
pub use error::{HandlerError, ProtocolError, Result};
pub use server::{router, AgentHandler};
pub use types::*;
