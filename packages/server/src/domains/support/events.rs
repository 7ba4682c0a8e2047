//! Support stream events.

use serde::{Deserialize, Serialize};

pub const STATUS_INITIALIZING: &str = "Initializing agents...";
pub const STATUS_READY: &str = "All agents ready!";
pub const STATUS_THINKING: &str = "Agents are thinking...";
pub const GENERIC_ERROR: &str = "Sorry, something went wrong. Please try again.";

/// One server-sent event of a support reply.
///
/// Serialized to JSON as the SSE `data` field; clients switch on `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Progress note shown while the reply is prepared
    Status { message: String },

    /// A slice of the final reply
    Content { chunk: String },

    /// The reply has been sent in full
    Complete,

    /// The reply failed; `message` is safe to show the customer
    Error { message: String },
}

impl StreamEvent {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    pub fn content(chunk: impl Into<String>) -> Self {
        Self::Content {
            chunk: chunk.into(),
        }
    }

    pub fn generic_error() -> Self {
        Self::Error {
            message: GENERIC_ERROR.to_string(),
        }
    }

    /// Complete and Error end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error { .. })
    }
}
