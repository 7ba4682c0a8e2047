//! Streaming gateway: one support request in, a paced event stream out.
//!
//! Per request: lazily build the orchestrator (once per process), report
//! status, ask the orchestrator for the reply, then emit it in paced chunks.
//! Every stream ends with exactly one `complete` or `error` event.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, OnceCell};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

use super::events::{StreamEvent, STATUS_INITIALIZING, STATUS_READY, STATUS_THINKING};
use super::models::SupportError;
use super::orchestrator::{Orchestrator, OrchestratorPolicy};
use crate::config::Config;
use crate::kernel::{Pacer, PacingConfig, ServerDeps};

/// Frames buffered between the producer task and the HTTP body.
const EVENT_BUFFER: usize = 32;

/// Builds the orchestrator on first use.
#[async_trait]
pub trait OrchestratorFactory: Send + Sync {
    async fn build(&self) -> anyhow::Result<Orchestrator>;
}

/// Production factory: remote workers and the hosted model from configuration.
pub struct ConfigOrchestratorFactory {
    config: Config,
}

impl ConfigOrchestratorFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OrchestratorFactory for ConfigOrchestratorFactory {
    async fn build(&self) -> anyhow::Result<Orchestrator> {
        let deps = ServerDeps::from_config(&self.config)?;
        Ok(Orchestrator::new(deps, policy_from_config(&self.config)))
    }
}

pub fn policy_from_config(config: &Config) -> OrchestratorPolicy {
    OrchestratorPolicy {
        min_agent_responses: config.min_agent_responses,
        worker_timeout: config.worker_timeout,
    }
}

pub fn pacing_from_config(config: &Config) -> PacingConfig {
    PacingConfig {
        chunk_size: config.stream_chunk_size,
        chunk_delay: config.stream_chunk_delay,
        ..PacingConfig::default()
    }
}

enum StreamFailure {
    /// The client went away; nothing more can be sent.
    ClientGone,
    Support(SupportError),
}

impl From<SupportError> for StreamFailure {
    fn from(e: SupportError) -> Self {
        Self::Support(e)
    }
}

struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
}

impl EventSink {
    async fn send(&self, event: StreamEvent) -> Result<(), StreamFailure> {
        self.tx
            .send(event)
            .await
            .map_err(|_| StreamFailure::ClientGone)
    }
}

pub struct SupportGateway {
    orchestrator: OnceCell<Arc<Orchestrator>>,
    factory: Arc<dyn OrchestratorFactory>,
    pacer: Pacer,
}

impl SupportGateway {
    pub fn new(factory: Arc<dyn OrchestratorFactory>, pacer: Pacer) -> Self {
        Self {
            orchestrator: OnceCell::new(),
            factory,
            pacer,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.orchestrator.initialized()
    }

    /// Start answering `message` on a background task and return its events.
    ///
    /// Dropping the stream stops the task at its next send.
    pub fn stream_reply(self: &Arc<Self>, message: String) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let gateway = Arc::clone(self);

        tokio::spawn(async move {
            let sink = EventSink { tx };
            match gateway.run(&message, &sink).await {
                Ok(()) => debug!("Support reply streamed"),
                Err(StreamFailure::ClientGone) => debug!("Client disconnected, reply abandoned"),
                Err(StreamFailure::Support(e)) => {
                    error!(error = %e, "Support reply failed");
                    let _ = sink.send(StreamEvent::generic_error()).await;
                }
            }
        });

        ReceiverStream::new(rx)
    }

    async fn run(&self, message: &str, sink: &EventSink) -> Result<(), StreamFailure> {
        let orchestrator = self.orchestrator(sink).await?;

        sink.send(StreamEvent::status(STATUS_THINKING)).await?;
        self.pacer.after_thinking().await;

        let reply = orchestrator.respond(message).await?;

        for chunk in self.pacer.chunks(&reply) {
            sink.send(StreamEvent::content(chunk)).await?;
            self.pacer.after_chunk().await;
        }

        sink.send(StreamEvent::Complete).await
    }

    /// The shared orchestrator, built by whichever request gets here first.
    /// Only that request sees the initialization statuses; a failed build
    /// leaves the cell empty for the next request to retry.
    async fn orchestrator(&self, sink: &EventSink) -> Result<Arc<Orchestrator>, StreamFailure> {
        let mut constructed = false;
        let constructed_flag = &mut constructed;

        let orchestrator = self
            .orchestrator
            .get_or_try_init(|| async move {
                sink.send(StreamEvent::status(STATUS_INITIALIZING)).await?;
                self.pacer.after_init().await;

                info!("Initializing orchestrator");
                let built = self
                    .factory
                    .build()
                    .await
                    .map_err(|e| SupportError::Initialization(format!("{:#}", e)))?;
                info!(agents = built.registry().len(), "Orchestrator initialized");
                for capability in built.registry().capabilities() {
                    debug!(%capability, "Agent registered");
                }

                *constructed_flag = true;
                Ok::<_, StreamFailure>(Arc::new(built))
            })
            .await?
            .clone();

        if constructed {
            sink.send(StreamEvent::status(STATUS_READY)).await?;
            self.pacer.after_ready().await;
        }

        Ok(orchestrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::agents::AgentKind;
    use crate::domains::support::events::GENERIC_ERROR;
    use crate::kernel::test_dependencies::{MockAgentClient, MockCompletion, MockOrchestratorFactory};
    use crate::kernel::TestDependencies;
    use std::sync::atomic::Ordering;
    use tokio_stream::StreamExt;

    const QUERY: &str = "I want a refund for order #A1234, this is urgent!!";

    fn gateway(factory: MockOrchestratorFactory) -> Arc<SupportGateway> {
        Arc::new(SupportGateway::new(
            Arc::new(factory),
            Pacer::new(PacingConfig::immediate(25)),
        ))
    }

    async fn collect(gateway: &Arc<SupportGateway>) -> Vec<StreamEvent> {
        gateway.stream_reply(QUERY.to_string()).collect().await
    }

    fn statuses(events: &[StreamEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Status { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    fn content(events: &[StreamEvent]) -> String {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Content { chunk } => Some(chunk.as_str()),
                _ => None,
            })
            .collect()
    }

    fn assert_single_terminal_at_end(events: &[StreamEvent]) {
        let terminals = events.iter().filter(|e| e.is_terminal()).count();
        assert_eq!(terminals, 1, "events: {:?}", events);
        assert!(events.last().unwrap().is_terminal());
    }

    #[tokio::test]
    async fn test_first_request_streams_full_sequence() {
        let deps = TestDependencies::new();
        let gateway = gateway(MockOrchestratorFactory::new(deps.server_deps()));

        let events = collect(&gateway).await;

        assert_eq!(
            statuses(&events),
            vec![STATUS_INITIALIZING, STATUS_READY, STATUS_THINKING]
        );
        assert_eq!(
            content(&events),
            "Dear Valued Customer,\n\nThank you for reaching out.\n\nBest regards, Customer Support Team"
        );
        assert_eq!(events.last(), Some(&StreamEvent::Complete));
        assert_single_terminal_at_end(&events);
        assert!(gateway.is_initialized());
    }

    #[tokio::test]
    async fn test_chunks_are_bounded_windows() {
        let deps = TestDependencies::new();
        let gateway = gateway(MockOrchestratorFactory::new(deps.server_deps()));

        let events = collect(&gateway).await;
        let chunks: Vec<&String> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Content { chunk } => Some(chunk),
                _ => None,
            })
            .collect();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 25));
        assert!(chunks[..chunks.len() - 1]
            .iter()
            .all(|c| c.chars().count() == 25));
    }

    #[tokio::test]
    async fn test_later_requests_skip_initialization() {
        let deps = TestDependencies::new();
        let factory = MockOrchestratorFactory::new(deps.server_deps());
        let builds = factory.build_counter();
        let gateway = gateway(factory);

        collect(&gateway).await;
        let second = collect(&gateway).await;

        assert_eq!(statuses(&second), vec![STATUS_THINKING]);
        assert_eq!(second.last(), Some(&StreamEvent::Complete));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_build_once() {
        let deps = TestDependencies::new();
        let factory = MockOrchestratorFactory::new(deps.server_deps())
            .with_delay(std::time::Duration::from_millis(50));
        let builds = factory.build_counter();
        let gateway = gateway(factory);

        let (a, b) = tokio::join!(collect(&gateway), collect(&gateway));

        let initializing = [&a, &b]
            .iter()
            .filter(|events| statuses(events).contains(&STATUS_INITIALIZING))
            .count();
        assert_eq!(initializing, 1);
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(a.last(), Some(&StreamEvent::Complete));
        assert_eq!(b.last(), Some(&StreamEvent::Complete));
    }

    #[tokio::test]
    async fn test_failed_initialization_is_retried() {
        let deps = TestDependencies::new();
        let gateway = gateway(MockOrchestratorFactory::new(deps.server_deps()).failing_first(1));

        let first = collect(&gateway).await;
        assert_eq!(statuses(&first), vec![STATUS_INITIALIZING]);
        assert_eq!(
            first.last(),
            Some(&StreamEvent::Error {
                message: GENERIC_ERROR.to_string()
            })
        );
        assert_single_terminal_at_end(&first);
        assert!(!gateway.is_initialized());

        let second = collect(&gateway).await;
        assert_eq!(
            statuses(&second),
            vec![STATUS_INITIALIZING, STATUS_READY, STATUS_THINKING]
        );
        assert_eq!(second.last(), Some(&StreamEvent::Complete));
    }

    #[tokio::test]
    async fn test_synthesis_failure_emits_one_error_and_no_content() {
        let deps =
            TestDependencies::new().with_completion(MockCompletion::failing("model overloaded"));
        let gateway = gateway(MockOrchestratorFactory::new(deps.server_deps()));

        let events = collect(&gateway).await;

        assert!(content(&events).is_empty());
        assert!(!events.contains(&StreamEvent::Complete));
        assert_eq!(events.last(), Some(&StreamEvent::generic_error()));
        assert_single_terminal_at_end(&events);
    }

    #[tokio::test]
    async fn test_unreachable_worker_emits_error() {
        let deps = TestDependencies::new()
            .with_agent(AgentKind::Solution, MockAgentClient::failing("connection refused"));
        let gateway = gateway(MockOrchestratorFactory::new(deps.server_deps()));

        let events = collect(&gateway).await;

        assert_eq!(events.last(), Some(&StreamEvent::generic_error()));
        assert_single_terminal_at_end(&events);
        // The cause stays in the logs
        assert!(!format!("{:?}", events).contains("connection refused"));
    }

    #[tokio::test]
    async fn test_dropped_stream_stops_producer() {
        let deps = TestDependencies::new();
        let gateway = gateway(MockOrchestratorFactory::new(deps.server_deps()));

        let mut stream = gateway.stream_reply(QUERY.to_string());
        let first = stream.next().await;
        assert_eq!(first, Some(StreamEvent::status(STATUS_INITIALIZING)));
        drop(stream);

        // The producer notices the closed channel and exits without panicking.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}
