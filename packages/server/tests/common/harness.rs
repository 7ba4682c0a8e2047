//! Test harness: fake model, four real worker agents and the gateway, all on
//! ephemeral local ports.
//!
//! # Example using test-context
//!
//! ```ignore
//! use test_context::test_context;
//!
//! #[test_context(TestHarness)]
//! #[tokio::test]
//! async fn my_test(ctx: &TestHarness) {
//!     let events = ctx.support("hello").await.unwrap();
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use completion_client::CompletionClient;
use support_core::domains::agents::{AgentKind, WorkerAgent};
use support_core::domains::support::StreamEvent;
use support_core::server::{build_app, build_gateway};
use support_core::Config;
use test_context::AsyncTestContext;

use super::FakeModel;

pub const TEST_MODEL: &str = "test-model";

/// Bind an ephemeral port and serve `app` on it, returning the base URL.
pub async fn serve(app: Router) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

/// A URL nothing listens on.
pub async fn dead_url() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

pub async fn start_worker(kind: AgentKind, model: &FakeModel) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}", listener.local_addr()?);

    let client = CompletionClient::new("test-key").with_base_url(model.base_url.clone());
    let worker = WorkerAgent::new(kind, client, TEST_MODEL, url.clone());
    let app = agent_protocol::router(Arc::new(worker));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(url)
}

pub struct TestHarness {
    pub model: FakeModel,
    /// Worker base URLs in registry order
    pub agent_urls: Vec<String>,
    pub gateway_url: String,
    http: reqwest::Client,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Servers stop with the test runtime
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        Self::with_stopped_agent(None).await
    }

    /// Start everything, except `stopped`, whose URL points at a closed port.
    pub async fn with_stopped_agent(stopped: Option<AgentKind>) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let model = FakeModel::start().await?;

        let mut agent_urls = Vec::new();
        for kind in AgentKind::ALL {
            let url = if Some(kind) == stopped {
                dead_url().await?
            } else {
                start_worker(kind, &model).await?
            };
            agent_urls.push(url);
        }

        let vars: HashMap<&str, String> = HashMap::from([
            ("OPENAI_API_KEY", "test-key".to_string()),
            ("MODEL_ID", TEST_MODEL.to_string()),
            ("COMPLETION_BASE_URL", model.base_url.clone()),
            ("AGENT_URLS", agent_urls.join(",")),
            ("WORKER_TIMEOUT_SECS", "10".to_string()),
            ("STREAM_CHUNK_DELAY_MS", "0".to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned())?;

        let gateway_url = serve(build_app(build_gateway(&config))).await?;

        Ok(Self {
            model,
            agent_urls,
            gateway_url,
            http: reqwest::Client::new(),
        })
    }

    pub fn agent_url(&self, kind: AgentKind) -> &str {
        let index = AgentKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.agent_urls[index]
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// GET /support and collect every event until the stream closes.
    pub async fn support(&self, message: &str) -> Result<Vec<StreamEvent>> {
        let response = self
            .http
            .get(format!("{}/support", self.gateway_url))
            .query(&[("message", message)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        parse_sse(&body)
    }
}

/// Decode the `data:` lines of an SSE body.
pub fn parse_sse(body: &str) -> Result<Vec<StreamEvent>> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).context("Bad event payload"))
        .collect()
}

pub fn statuses(events: &[StreamEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Status { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

pub fn content(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Content { chunk } => Some(chunk.as_str()),
            _ => None,
        })
        .collect()
}
