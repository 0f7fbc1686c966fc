//! Observer API server for the Jezero traverse map.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for reading the application state, fetching one
//!   geometry slot, and requesting a load
//! - **Selection endpoints** for the detail panel's focused feature
//! - **`WebSocket` endpoint** (`/ws/state`) streaming a state summary on
//!   every transition
//!
//! The server is a view layer: it never mutates the store directly, only
//! hands "load geometries" intents to the orchestrator, guarded the same
//! way a map view guards its initial load.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{AppState, StateSummary};
