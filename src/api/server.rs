//! Sieve viewer server
//!
//! Serves the table page and its controls over HTTP with Axum. The workbook
//! is loaded on a blocking task after the listener is up; until it is
//! installed every operation answers `503 Service Unavailable`.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handlers;
use crate::controller::Controller;
use crate::loader;
use crate::render::HtmlRenderer;
use crate::source::Source;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Workbook path or URL loaded at startup
    pub source: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            source: String::new(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub source: String,
    pub controller: Mutex<Controller<HtmlRenderer>>,
}

impl AppState {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            source: source.into(),
            controller: Mutex::new(Controller::new(HtmlRenderer::new())),
        }
    }
}

/// Build the router over `state`
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/sheets", get(handlers::sheets))
        .route("/filter", post(handlers::filter))
        .route("/subsheet", post(handlers::subsheet))
        .route("/download", get(handlers::download))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Load the configured workbook in the background and install it.
///
/// A failed load is logged and leaves the server in its loading state.
pub fn spawn_load(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let source = Source::parse(&state.source);
        let workbook = match loader::load(&source) {
            Ok(workbook) => workbook,
            Err(e) => {
                error!(%source, error = %e, "failed to load workbook");
                return;
            }
        };

        match state.controller.lock() {
            Ok(mut controller) => {
                if let Err(e) = controller.install(workbook) {
                    error!(%source, error = %e, "failed to read primary sheet");
                }
            }
            Err(_) => error!("controller lock poisoned"),
        }
    })
}

/// Run the viewer server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sieve_server=info,sheet_sieve=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new(config.source.clone()));
    let app = router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Sieve viewer listening on http://{}", addr);
    info!("   Source: {}", config.source);

    spawn_load(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Sieve viewer shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
