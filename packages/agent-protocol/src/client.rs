//! Caller side: invoke a remote agent by base URL.

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{ProtocolError, Result};
use crate::types::{AgentCard, AgentReply, JsonRpcRequest, JsonRpcResponse, Message, AGENT_CARD_PATH};

/// Client for one remote agent.
///
/// Construction performs no I/O; an unreachable agent is only noticed on the
/// first call.
#[derive(Clone)]
pub struct AgentClient {
    http_client: Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    /// Share one connection pool across several agent clients.
    pub fn with_http_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the agent card the agent advertises.
    pub async fn fetch_card(&self) -> Result<AgentCard> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, AGENT_CARD_PATH))
            .send()
            .await
            .map_err(|e| ProtocolError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProtocolError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProtocolError::Parse(e.to_string()))
    }

    /// Send a text message and wait for the agent's reply.
    pub async fn send_text(&self, text: &str) -> Result<AgentReply> {
        let request = JsonRpcRequest::message_send(Message::user_text(text));
        let message = self.send(&request).await?;
        Ok(AgentReply::from_message(&message))
    }

    async fn send(&self, request: &JsonRpcRequest) -> Result<Message> {
        debug!(agent = %self.base_url, method = %request.method, "Invoking agent");

        let response = self
            .http_client
            .post(format!("{}/", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(agent = %self.base_url, error = %e, "Agent request failed");
                ProtocolError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(agent = %self.base_url, status = %status, "Agent returned HTTP error");
            return Err(ProtocolError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ProtocolError::Parse(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(ProtocolError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| ProtocolError::Parse("response has neither result nor error".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = AgentClient::new("http://127.0.0.1:8001/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8001");
    }

    #[tokio::test]
    async fn test_unreachable_agent_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = AgentClient::new(format!("http://127.0.0.1:{}", port));
        let err = client.send_text("hello").await.unwrap_err();
        assert!(matches!(err, ProtocolError::Network(_)));
    }
}
