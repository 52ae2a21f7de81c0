// Server module - HTTP server setup and routing
pub mod auth;
pub mod forms;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use self::handlers::{
    contracts, documents, health_check, incidents, owners, payment_types, payments, tenants,
    units,
};
use self::state::AppState;

/// Create the axum application router with all routes and middleware.
///
/// Every route except `/health` requires an authenticated session.
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(owners::router())
        .merge(units::router())
        .merge(tenants::router())
        .merge(contracts::router())
        .merge(payment_types::router())
        .merge(payments::router())
        .merge(incidents::router())
        .merge(documents::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server on the specified address
pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal");
    }
}
