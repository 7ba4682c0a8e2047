//! Runs one worker agent over the agent protocol.
//!
//! ```text
//! worker_agent intent            # 127.0.0.1:8001
//! worker_agent solution --port 9004
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use support_core::domains::agents::{AgentKind, WorkerAgent};
use support_core::ModelConfig;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "worker_agent")]
#[command(about = "Serve one customer support worker agent (intent, faq, review, solution)")]
struct Cli {
    /// Which agent to run
    kind: AgentKind,

    /// Listen port (defaults to 8001-8004 by kind)
    #[arg(long)]
    port: Option<u16>,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,support_core=debug,completion_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let port = cli.port.unwrap_or_else(|| cli.kind.default_port());
    let addr = format!("{}:{}", cli.host, port);

    let model = ModelConfig::from_env().context("Failed to load model configuration")?;
    tracing::info!(agent = %cli.kind, model = %model.model_id, "Starting worker agent");

    let worker = WorkerAgent::new(
        cli.kind,
        model.client(),
        model.model_id.clone(),
        format!("http://{}", addr),
    );
    let app = agent_protocol::router(Arc::new(worker)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("{} listening on {}", cli.kind, addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
