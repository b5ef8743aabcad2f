//! Server initialization and routing
//!
//! Two routers share one [`ServerState`]:
//! - the API router (`/api/health`, `/api/match`), every response carrying
//!   `Access-Control-Allow-Origin: *`;
//! - the UI router (`/`, `/search`, and the asset directory).
//!
//! [`start_server`] runs the API server on a spawned task and the UI server
//! on the calling task. Both stop together on Ctrl+C or SIGTERM.

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{health, matching, not_found, ui};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the API router
///
/// Middleware stack (outermost first):
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. Permissive CORS origin header
/// 5. Timeout handling
/// 6. Body size limit
pub fn build_api_router(state: Arc<ServerState>) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/api/health", get(health::health_check))
        .route(
            "/api/match",
            post(matching::match_products).options(matching::match_preflight),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.timeout(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the interactive UI router
///
/// Product images under `asset_root` are served at `asset_url_prefix`.
pub fn build_ui_router(state: Arc<ServerState>) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(ui::index))
        .route("/search", post(ui::search))
        .nest_service(
            &config.asset_url_prefix,
            ServeDir::new(&config.asset_root),
        )
        .layer(DefaultBodyLimit::max(config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.timeout(),
        ))
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the JSON tracing subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Safe to call more than once;
/// later calls are ignored.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .try_init();
}

/// Start both servers
///
/// Loads the catalog and embedding provider described by `config`, then
/// serves until SIGTERM or Ctrl+C. A catalog that cannot be loaded is
/// returned as an error before any socket is bound.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config.log_level);
    health::mark_started();

    let state = Arc::new(ServerState::from_config(config)?);
    let config = state.config.clone();

    tracing::info!(
        products = state.catalog().len(),
        embedded = state.catalog().embedded_count(),
        model = state.matcher.model_id(),
        "Catalog loaded"
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}MB, Fetch timeout: {}s",
        config.timeout_secs,
        config.max_body_size_mb,
        config.fetch_timeout_secs
    );

    let api_listener = TcpListener::bind(config.api_addr()?).await?;
    let ui_listener = TcpListener::bind(config.ui_addr()?).await?;

    run(api_listener, ui_listener, state, shutdown_signal()).await
}

/// Serve both routers on already-bound listeners until `shutdown` resolves.
pub async fn run<F>(
    api_listener: TcpListener,
    ui_listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let api_addr: SocketAddr = api_listener.local_addr()?;
    let ui_addr: SocketAddr = ui_listener.local_addr()?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let stop_tx = Arc::new(stop_tx);

    let signal_tx = stop_tx.clone();
    tokio::spawn(async move {
        shutdown.await;
        let _ = signal_tx.send(true);
    });

    let api_app = build_api_router(state.clone());
    let api_stop = wait_for_stop(stop_rx.clone());
    let api = tokio::spawn(async move {
        tracing::info!("API server listening on {}", api_addr);
        axum::serve(api_listener, api_app)
            .with_graceful_shutdown(api_stop)
            .await
    });

    tracing::info!("UI server listening on {}", ui_addr);
    let ui_result = axum::serve(ui_listener, build_ui_router(state))
        .with_graceful_shutdown(wait_for_stop(stop_rx))
        .await;

    // A UI failure must not leave the API server running on its own
    let _ = stop_tx.send(true);
    let api_result = api.await;

    ui_result?;
    api_result??;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn wait_for_stop(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
