//! Worker side: expose an agent handler over HTTP.
//!
//! Routes:
//! - `GET /.well-known/agent.json`: agent card
//! - `POST /`: JSON-RPC `message/send`
//! - `GET /health`: liveness

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::HandlerError;
use crate::types::{
    AgentCard, AgentReply, JsonRpcRequest, JsonRpcResponse, MessageSendParams, AGENT_CARD_PATH,
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_MESSAGE_SEND,
    METHOD_NOT_FOUND, PARSE_ERROR,
};

/// An agent that answers one text message at a time.
#[async_trait]
pub trait AgentHandler: Send + Sync {
    fn card(&self) -> AgentCard;

    async fn handle(&self, text: &str) -> Result<AgentReply, HandlerError>;
}

/// Build the axum router serving `handler`.
pub fn router(handler: Arc<dyn AgentHandler>) -> Router {
    Router::new()
        .route("/", post(rpc_handler))
        .route(AGENT_CARD_PATH, get(card_handler))
        .route("/health", get(health_handler))
        .with_state(handler)
}

async fn card_handler(State(handler): State<Arc<dyn AgentHandler>>) -> Json<AgentCard> {
    Json(handler.card())
}

async fn health_handler(State(handler): State<Arc<dyn AgentHandler>>) -> Json<Value> {
    Json(json!({ "status": "healthy", "service": handler.card().name }))
}

/// JSON-RPC entry point. Always answers HTTP 200 with a JSON-RPC envelope.
async fn rpc_handler(
    State(handler): State<Arc<dyn AgentHandler>>,
    body: String,
) -> Json<JsonRpcResponse> {
    Json(dispatch(handler.as_ref(), &body).await)
}

async fn dispatch(handler: &dyn AgentHandler, body: &str) -> JsonRpcResponse {
    let raw: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return JsonRpcResponse::failure(Value::Null, PARSE_ERROR, e.to_string()),
    };

    let id = raw.get("id").cloned().unwrap_or(Value::Null);

    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => return JsonRpcResponse::failure(id, INVALID_REQUEST, e.to_string()),
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return JsonRpcResponse::failure(id, INVALID_REQUEST, "jsonrpc must be \"2.0\"");
    }

    if request.method != METHOD_MESSAGE_SEND {
        return JsonRpcResponse::failure(
            id,
            METHOD_NOT_FOUND,
            format!("unknown method {}", request.method),
        );
    }

    let params: MessageSendParams = match serde_json::from_value(request.params) {
        Ok(p) => p,
        Err(e) => return JsonRpcResponse::failure(id, INVALID_PARAMS, e.to_string()),
    };

    let text = params.message.text();
    if text.trim().is_empty() {
        return JsonRpcResponse::failure(id, INVALID_PARAMS, "message has no text");
    }

    let agent = handler.card().name;
    info!(agent = %agent, query_len = text.len(), "Agent received message");

    match handler.handle(&text).await {
        Ok(reply) => JsonRpcResponse::success(id, reply.into_message()),
        Err(HandlerError::InvalidMessage(reason)) => {
            warn!(agent = %agent, reason = %reason, "Agent rejected message");
            JsonRpcResponse::failure(id, INVALID_PARAMS, reason)
        }
        Err(HandlerError::Internal(reason)) => {
            error!(agent = %agent, error = %reason, "Agent failed");
            JsonRpcResponse::failure(id, INTERNAL_ERROR, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct Echo;

    #[async_trait]
    impl AgentHandler for Echo {
        fn card(&self) -> AgentCard {
            AgentCard {
                name: "echo_agent".to_string(),
                description: "Repeats the message".to_string(),
                url: "http://127.0.0.1:0".to_string(),
                version: "1.0.0".to_string(),
                skills: vec![],
            }
        }

        async fn handle(&self, text: &str) -> Result<AgentReply, HandlerError> {
            if text == "explode" {
                return Err(HandlerError::Internal("model unavailable".to_string()));
            }
            Ok(AgentReply::text(format!("echo: {}", text)).with_data(json!({"len": text.len()})))
        }
    }

    async fn post_rpc(body: &str) -> Value {
        let app = router(Arc::new(Echo));
        let response = app
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn send_body(text: &str) -> String {
        serde_json::to_string(&JsonRpcRequest::message_send(
            crate::types::Message::user_text(text),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_message_send_success() {
        let value = post_rpc(&send_body("hi")).await;

        assert!(value.get("error").is_none());
        assert_eq!(value["result"]["role"], "agent");
        assert_eq!(value["result"]["parts"][0]["text"], "echo: hi");
        assert_eq!(value["result"]["parts"][1]["data"]["len"], 2);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let value = post_rpc("{not json").await;
        assert_eq!(value["error"]["code"], PARSE_ERROR);
        assert_eq!(value["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let value =
            post_rpc(r#"{"jsonrpc":"2.0","id":1,"method":"tasks/get","params":{}}"#).await;
        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn test_wrong_version() {
        let value =
            post_rpc(r#"{"jsonrpc":"1.0","id":"a","method":"message/send","params":{}}"#).await;
        assert_eq!(value["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_text_is_invalid_params() {
        let value = post_rpc(&send_body("   ")).await;
        assert_eq!(value["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_handler_failure_is_internal_error() {
        let value = post_rpc(&send_body("explode")).await;
        assert_eq!(value["error"]["code"], INTERNAL_ERROR);
        assert_eq!(value["error"]["message"], "model unavailable");
    }

    #[tokio::test]
    async fn test_agent_card_route() {
        let app = router(Arc::new(Echo));
        let response = app
            .oneshot(Request::get(AGENT_CARD_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let card: AgentCard = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(card.name, "echo_agent");
    }
}
