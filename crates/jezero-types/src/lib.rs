//! Shared data model for the Jezero traverse map.
//!
//! Everything the acquisition layer fetches and the state store holds is
//! defined here. Types derive `ts-rs` so the map view can consume the same
//! shapes as generated `TypeScript` bindings.
//!
//! # Modules
//!
//! - [`vehicle`] -- Vehicles and the six named geometry slots
//! - [`geo`] -- GeoJSON features and feature collections
//! - [`dataset`] -- The six-slot [`GeoDataset`] and its store wrapper
//! - [`imagery`] -- Per-sol raw image URLs grouped by camera

pub mod dataset;
pub mod geo;
pub mod imagery;
pub mod vehicle;

// Re-export all public types at crate root for convenience.
pub use dataset::{AppData, GeoDataset};
pub use geo::{
    Feature, FeatureCollection, FeatureCollectionType, FeatureType, Geometry, Position, Properties,
};
pub use imagery::{
    CameraGroup, DatasetImages, EngineeringCameras, HelicopterCameras, ScienceCameras, SolImages,
};
pub use vehicle::{ParseIdentError, Slot, SlotKind, Vehicle};
