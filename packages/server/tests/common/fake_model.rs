//! A stand-in for the hosted chat-completions service.
//!
//! Answers by system prompt: the solution agent first asks for a refund tool
//! call, the orchestrator gets a customer reply quoting any ticket it was
//! shown, and everyone else gets a one-line analysis.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

lazy_static! {
    static ref TICKET: Regex = Regex::new(r"\b(REF\d{5}|ESC\d{4})\b").unwrap();
    static ref ORDER: Regex = Regex::new(r"#([A-Za-z0-9]{3,})").unwrap();
}

#[derive(Default)]
pub struct FakeModelState {
    fail_synthesis: AtomicBool,
    requests: Mutex<Vec<Value>>,
}

#[derive(Clone)]
pub struct FakeModel {
    pub base_url: String,
    state: Arc<FakeModelState>,
}

impl FakeModel {
    pub async fn start() -> Result<Self> {
        let state = Arc::new(FakeModelState::default());
        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind fake model")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}/v1", addr),
            state,
        })
    }

    /// Make every orchestrator synthesis call fail with HTTP 500.
    pub fn fail_synthesis(&self) {
        self.state.fail_synthesis.store(true, Ordering::SeqCst);
    }

    /// System prompts of every request received so far.
    pub fn system_prompts(&self) -> Vec<String> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r["messages"][0]["content"].as_str().map(str::to_string))
            .collect()
    }
}

async fn chat_completions(
    State(state): State<Arc<FakeModelState>>,
    Json(request): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.requests.lock().unwrap().push(request.clone());

    let messages = request["messages"].as_array().cloned().unwrap_or_default();
    let system = messages
        .first()
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default()
        .to_string();
    let user = messages
        .iter()
        .find(|m| m["role"] == "user")
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default()
        .to_string();
    let used_tools = messages.iter().any(|m| m["role"] == "tool");

    if system.starts_with("You are an expert Customer Support Agent") {
        if state.fail_synthesis.load(Ordering::SeqCst) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        return Ok(Json(text_reply(&customer_reply(&user))));
    }

    if system.starts_with("You are the Solution Provider Agent") && !used_tools {
        if let Some(order) = ORDER.captures(&user).map(|c| c[1].to_string()) {
            return Ok(Json(tool_call_reply(
                "initiate_refund",
                json!({ "order_id": order }),
            )));
        }
    }

    Ok(Json(text_reply(&format!(
        "Analysis complete for: {}",
        user.lines().next().unwrap_or_default()
    ))))
}

fn customer_reply(prompt: &str) -> String {
    let ticket = TICKET
        .captures(prompt)
        .map(|c| format!(" Your reference number is {}.", &c[1]))
        .unwrap_or_default();

    format!(
        "## RECOMMENDED SOLUTION\nissue refund\n\n\
         Dear Valued Customer,\n\n\
         I'm sorry for the trouble with your order. We have started your refund.{}\n\n\
         1. Watch for a confirmation email.\n\
         2. Allow 5-7 business days for the funds to arrive.\n\n\
         Best regards,\nCustomer Support Team",
        ticket
    )
}

fn text_reply(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 10, "total_tokens": 20 }
    })
}

fn tool_call_reply(name: &str, arguments: Value) -> Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments.to_string() }
                }]
            }
        }]
    })
}
