//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS and request tracing enabled.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /ws/state` -- `WebSocket` state summary stream
/// - `GET /api/state` -- full lifecycle state
/// - `GET /api/state/summary` -- state without geometry
/// - `GET /api/geometries/{slot}` -- one slot's collection
/// - `POST /api/geometries/load` -- request a load episode
/// - `GET|PUT|DELETE /api/selection` -- read, set, clear the selection
///
/// CORS allows any origin so a map front end on another port can call it.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/state", get(ws::ws_state))
        // State
        .route("/api/state", get(handlers::get_state))
        .route("/api/state/summary", get(handlers::get_summary))
        // Geometries
        .route("/api/geometries/load", post(handlers::load_geometries))
        .route("/api/geometries/{slot}", get(handlers::get_geometry))
        // Selection
        .route(
            "/api/selection",
            get(handlers::get_selection)
                .put(handlers::put_selection)
                .delete(handlers::delete_selection),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
