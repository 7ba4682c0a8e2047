//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::support::gateway::pacing_from_config;
use crate::domains::support::{ConfigOrchestratorFactory, SupportGateway};
use crate::kernel::Pacer;
use crate::server::routes::{health_handler, support_handler};
use crate::server::static_files::serve_ui;
use crate::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<SupportGateway>,
}

/// Gateway wired from configuration. The orchestrator itself is built on the
/// first support request.
pub fn build_gateway(config: &Config) -> Arc<SupportGateway> {
    let pacer = Pacer::new(pacing_from_config(config));
    let factory = Arc::new(ConfigOrchestratorFactory::new(config.clone()));
    Arc::new(SupportGateway::new(factory, pacer))
}

/// Build the Axum application router
pub fn build_app(gateway: Arc<SupportGateway>) -> Router {
    let app_state = AppState { gateway };

    // CORS configuration - allow any origin for the browser UI
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(serve_ui))
        .route("/health", get(health_handler))
        .route("/support", get(support_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockOrchestratorFactory;
    use crate::kernel::{PacingConfig, TestDependencies};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let deps = TestDependencies::new();
        let factory = Arc::new(MockOrchestratorFactory::new(deps.server_deps()));
        build_app(Arc::new(SupportGateway::new(
            factory,
            Pacer::new(PacingConfig::immediate(25)),
        )))
    }

    async fn get(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"{"status":"healthy","service":"Customer Support Assistant"}"#
        );
    }

    #[tokio::test]
    async fn test_missing_message_is_bad_request() {
        for uri in ["/support", "/support?message=", "/support?message=%20%20"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body, "No message provided");
        }
    }

    #[tokio::test]
    async fn test_support_streams_events() {
        let (status, body) = get("/support?message=where%20is%20order%20%23A1234").await;

        assert_eq!(status, StatusCode::OK);
        let events: Vec<&str> = body
            .lines()
            .filter_map(|l| l.strip_prefix("data: "))
            .collect();
        assert_eq!(
            events.first(),
            Some(&r#"{"type":"status","message":"Initializing agents..."}"#)
        );
        assert_eq!(events.last(), Some(&r#"{"type":"complete"}"#));
    }

    #[tokio::test]
    async fn test_root_serves_ui() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Customer Support Assistant</title>"));
    }
}
