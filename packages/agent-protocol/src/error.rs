//! Error types for agent invocation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors seen by a caller invoking a remote agent.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Connection refused, reset, DNS failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx HTTP status from the agent
    #[error("HTTP {status} from agent: {body}")]
    Http { status: u16, body: String },

    /// The agent answered with a JSON-RPC error object
    #[error("Agent error {code}: {message}")]
    Remote { code: i64, message: String },

    /// Response body did not match the protocol
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Failure reported by an agent handler while answering a message.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The message cannot be processed (empty text, unsupported content)
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The agent failed while producing an answer
    #[error("{0}")]
    Internal(String),
}
