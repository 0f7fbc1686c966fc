//! REST API endpoint handlers for the Observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/state` | Full `{loading, error, data}` snapshot |
//! | `GET` | `/api/state/summary` | Snapshot without geometry |
//! | `GET` | `/api/geometries/{slot}` | One slot's collection |
//! | `POST` | `/api/geometries/load` | Request a load episode |
//! | `GET` | `/api/selection` | Current selection |
//! | `PUT` | `/api/selection` | Select a feature |
//! | `DELETE` | `/api/selection` | Clear the selection |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use jezero_store::{Focus, SelectionSnapshot};
use jezero_types::Slot;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ObserverError;
use crate::state::AppState;

/// Query parameters for `POST /api/geometries/load`.
#[derive(Debug, Default, Deserialize)]
pub struct LoadQuery {
    /// Start an episode even when the redundant-load guard says no.
    #[serde(default)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Return the current lifecycle state, geometry included.
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.snapshot())
}

/// Return loading flag, error, and per-slot feature counts.
pub async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.summary())
}

// ---------------------------------------------------------------------------
// Geometries
// ---------------------------------------------------------------------------

/// Return one slot's collection.
///
/// `slot` may be the camel-case slot name or the resource filename.
pub async fn get_geometry(
    State(state): State<Arc<AppState>>,
    Path(slot): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let slot: Slot = slot.parse()?;

    let collection = state
        .store
        .read(|s| s.data.as_ref().and_then(|d| d.map.get(slot)).cloned())
        .ok_or_else(|| ObserverError::NotFound(format!("geometry slot {slot} is not loaded")))?;

    Ok(Json(collection))
}

/// Issue a "load geometries" intent.
///
/// Unless `force=true`, the intent is dropped while data is present, a load
/// is in flight, or an earlier load failed. Returns `202 Accepted` with the
/// new episode id when an episode was started, `200 OK` otherwise.
pub async fn load_geometries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoadQuery>,
) -> impl IntoResponse {
    // Check and spawn are not atomic. Two racing intents can both start an
    // episode; the store only commits the later one.
    let wanted = state.store.read(jezero_store::LifecycleState::should_request_load);
    if !wanted && !params.force {
        debug!("load request skipped by guard");
        return (
            StatusCode::OK,
            Json(serde_json::json!({ "dispatched": false })),
        );
    }

    // The handle is dropped: the episode keeps running detached.
    let task = state.orchestrator.spawn_load();
    info!(episode = %task.episode, force = params.force, "load episode dispatched");

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "dispatched": true,
            "episode": task.episode,
        })),
    )
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Return the current `{vehicle, feature}` selection.
pub async fn get_selection(State(state): State<Arc<AppState>>) -> Json<SelectionSnapshot> {
    Json(state.selection.read().await.current())
}

/// Select a feature, replacing any previous selection.
pub async fn put_selection(
    State(state): State<Arc<AppState>>,
    Json(focus): Json<Focus>,
) -> Json<SelectionSnapshot> {
    let mut selection = state.selection.write().await;
    debug!(vehicle = %focus.vehicle, "feature selected");
    selection.select(focus.vehicle, focus.feature);
    Json(selection.current())
}

/// Clear the selection.
pub async fn delete_selection(State(state): State<Arc<AppState>>) -> Json<SelectionSnapshot> {
    let mut selection = state.selection.write().await;
    selection.clear();
    Json(selection.current())
}
