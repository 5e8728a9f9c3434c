//! HTTP surface of the chat backend.
//!
//! | Route                        | Handler                      |
//! |------------------------------|------------------------------|
//! | `GET /`                      | liveness text                |
//! | `POST /session/new`          | create a session             |
//! | `GET /session/{id}/history`  | list turns                   |
//! | `POST /session/{id}/reset`   | clear turns                  |
//! | `POST /chat`                 | one chat turn                |

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub use crate::core::{app_config::AppConfig, app_state::AppState, telemetry};
pub use crate::error_handler::AppError;

use crate::routes::{
    chat::chat_route::chat,
    health_route::health,
    session::session_routes::{new_session, reset_session, session_history},
};

/// Builds the router with CORS and per-request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/session/new", post(new_session))
        .route("/session/{id}/history", get(session_history))
        .route("/session/{id}/reset", post(reset_session))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wires the components from `config` and serves until Ctrl+C.
pub async fn start(config: AppConfig) -> Result<(), AppError> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
