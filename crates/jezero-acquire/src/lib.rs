//! Geometry acquisition for the Jezero traverse map.
//!
//! A [`Gateway`] fetches one named GeoJSON document per call. The
//! [`Orchestrator`] turns a "load geometries" intent into one episode that
//! fetches all six slots concurrently and commits the outcome into a
//! [`jezero_store::Store`].
//!
//! # Modules
//!
//! - [`config`] -- Gateway settings (origin, prefix, timeout, source)
//! - [`error`] -- Transport and acquisition errors
//! - [`gateway`] -- HTTP and directory gateways with enum dispatch
//! - [`orchestrator`] -- Load episodes, supersession, fulfill guard

pub mod config;
pub mod error;
pub mod gateway;
pub mod orchestrator;

pub use config::{GatewayConfig, GatewaySource};
pub use error::{AcquisitionError, TransportError};
pub use gateway::{
    DirectoryGateway, Gateway, GeometryGateway, HttpGateway, create_gateway, decode_collection,
};
pub use orchestrator::{
    ABORTED_MESSAGE, EpisodeOutcome, EpisodePhase, EpisodeReport, LoadTask, Orchestrator,
};
