use axum::{routing::get, Router};
use dashboard::DashboardContext;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// The context is immutable once built, so handlers share it without locking.
#[derive(Debug)]
pub struct AppState {
    pub context: DashboardContext,
}

impl AppState {
    pub fn new(context: DashboardContext) -> Self {
        Self { context }
    }
}

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/marketplaces", get(handlers::list_marketplaces))
        .route(
            "/api/marketplaces/:marketplace/dashboard",
            get(handlers::get_dashboard),
        )
        .route("/api/summary", get(handlers::get_summary))
        .fallback(handlers::fallback)
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Serves the dashboard on `addr` until Ctrl-C.
pub async fn run_server(context: DashboardContext, addr: &str) -> anyhow::Result<()> {
    let app = create_router(AppState::new(context));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dashboard server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
}
