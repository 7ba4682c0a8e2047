//! SSE support endpoint.
//!
//! GET /support?message=...
//!
//! Each event's data is one JSON object: `status`, `content`, `complete` or
//! `error`, tagged by `type`. Blank messages are rejected before any
//! orchestration work.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::domains::support::events::GENERIC_ERROR;
use crate::domains::support::StreamEvent;
use crate::server::app::AppState;

pub const MISSING_MESSAGE: &str = "No message provided";

#[derive(Deserialize)]
pub struct SupportQuery {
    #[serde(default)]
    message: String,
}

pub async fn support_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<SupportQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, &'static str)> {
    let message = query.message.trim();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, MISSING_MESSAGE));
    }

    info!(message_len = message.len(), "Support request received");

    let events = state
        .gateway
        .stream_reply(message.to_string())
        .map(|event| Ok(to_sse(&event)));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn to_sse(event: &StreamEvent) -> Event {
    Event::default().json_data(event).unwrap_or_else(|e| {
        error!(error = %e, "Failed to encode stream event");
        Event::default().data(json!({ "type": "error", "message": GENERIC_ERROR }).to_string())
    })
}
