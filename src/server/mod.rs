pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::planner::SemPlanner;
use crate::utils::error::{PlanError, Result};

pub struct AppState {
    pub planner: SemPlanner,
}

pub fn router(planner: SemPlanner) -> Router {
    let state = Arc::new(AppState { planner });

    Router::new()
        .route("/health", get(routes::health))
        .route("/generate_sem_plan", post(routes::generate_sem_plan))
        .route("/generate_sem_plan/", post(routes::generate_sem_plan))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(planner: SemPlanner, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| PlanError::InvalidConfigValueError {
            field: "server.host".to_string(),
            value: host.to_string(),
            reason: format!("{}", e),
        })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 SEM planner listening on http://{}", addr);

    axum::serve(listener, router(planner))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("SEM planner stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
