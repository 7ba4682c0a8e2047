use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use completion_client::{regional_base_url, CompletionClient, DEFAULT_BASE_URL};

use crate::domains::agents::AgentKind;

pub const DEFAULT_MODEL_ID: &str = "gpt-4o";
pub const DEFAULT_MODEL_REGION: &str = "us-east-1";

/// Completion collaborator settings shared by the gateway and every worker.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_id: String,
    pub region: String,
    pub api_key: String,
    pub base_url: String,
}

impl ModelConfig {
    /// Load model configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let region = lookup("MODEL_REGION").unwrap_or_else(|| DEFAULT_MODEL_REGION.to_string());
        let template =
            lookup("COMPLETION_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            model_id: lookup("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            base_url: regional_base_url(&template, &region),
            region,
            api_key: lookup("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
        })
    }

    pub fn client(&self) -> CompletionClient {
        CompletionClient::new(self.api_key.clone()).with_base_url(self.base_url.clone())
    }
}

/// Gateway configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model: ModelConfig,
    pub agent_urls: Vec<String>,
    pub min_agent_responses: usize,
    pub worker_timeout: Option<Duration>,
    pub stream_chunk_size: usize,
    pub stream_chunk_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let agent_urls: Vec<String> = match lookup("AGENT_URLS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect(),
            None => AgentKind::ALL
                .iter()
                .map(|kind| format!("http://127.0.0.1:{}", kind.default_port()))
                .collect(),
        };

        if agent_urls.len() != AgentKind::ALL.len() {
            anyhow::bail!(
                "AGENT_URLS must list {} agents (intent, faq, review, solution), got {}",
                AgentKind::ALL.len(),
                agent_urls.len()
            );
        }

        let min_agent_responses: usize = lookup("MIN_AGENT_RESPONSES")
            .unwrap_or_else(|| AgentKind::ALL.len().to_string())
            .parse()
            .context("MIN_AGENT_RESPONSES must be a valid number")?;
        if min_agent_responses > agent_urls.len() {
            anyhow::bail!(
                "MIN_AGENT_RESPONSES ({}) exceeds the number of agents ({})",
                min_agent_responses,
                agent_urls.len()
            );
        }

        let worker_timeout = lookup("WORKER_TIMEOUT_SECS")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .context("WORKER_TIMEOUT_SECS must be a whole number of seconds")?
            .map(Duration::from_secs);

        let stream_chunk_size: usize = lookup("STREAM_CHUNK_SIZE")
            .unwrap_or_else(|| "25".to_string())
            .parse()
            .context("STREAM_CHUNK_SIZE must be a valid number")?;
        if stream_chunk_size == 0 {
            anyhow::bail!("STREAM_CHUNK_SIZE must be at least 1");
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            model: ModelConfig::from_lookup(&lookup)?,
            agent_urls,
            min_agent_responses,
            worker_timeout,
            stream_chunk_size,
            stream_chunk_delay: Duration::from_millis(
                lookup("STREAM_CHUNK_DELAY_MS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .context("STREAM_CHUNK_DELAY_MS must be a valid number")?,
            ),
        })
    }
}
