//! Vehicle identifiers and the six named geometry slots.
//!
//! Each slot is one GeoJSON resource published by the data backend. A slot
//! knows its fixed resource filename, the vehicle it describes, and whether
//! it holds waypoints, a traversed path, or the current position.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::imagery::CameraGroup;

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

/// One of the two exploration vehicles tracked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Vehicle {
    /// The Perseverance rover.
    Perseverance,
    /// The Ingenuity helicopter.
    Ingenuity,
}

impl Vehicle {
    /// Both vehicles, rover first.
    pub const ALL: [Self; 2] = [Self::Perseverance, Self::Ingenuity];

    /// Lowercase identifier used on the wire and in resource filenames.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perseverance => "perseverance",
            Self::Ingenuity => "ingenuity",
        }
    }

    /// Camera groups whose imagery belongs to this vehicle.
    ///
    /// The rover carries engineering and science cameras; the helicopter
    /// only its own navigation and color cameras.
    pub const fn camera_groups(self) -> &'static [CameraGroup] {
        match self {
            Self::Perseverance => &[CameraGroup::Engineering, CameraGroup::Science],
            Self::Ingenuity => &[CameraGroup::Helicopter],
        }
    }

    /// The three slots describing this vehicle.
    pub const fn slots(self) -> [Slot; 3] {
        match self {
            Self::Perseverance => [
                Slot::PerseveranceWaypoints,
                Slot::PerseverancePath,
                Slot::PerseveranceCurrent,
            ],
            Self::Ingenuity => [
                Slot::IngenuityWaypoints,
                Slot::IngenuityPath,
                Slot::IngenuityCurrent,
            ],
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known vehicle or slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdentError {
    /// The input is not `perseverance` or `ingenuity`.
    #[error("unknown vehicle: {0}")]
    Vehicle(String),

    /// The input is neither a slot name nor a slot resource filename.
    #[error("unknown geometry slot: {0}")]
    Slot(String),
}

impl FromStr for Vehicle {
    type Err = ParseIdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseIdentError::Vehicle(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// What a slot's collection describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SlotKind {
    /// Per-sol stopping points.
    Waypoints,
    /// Line geometry of the traversed route.
    Path,
    /// The latest known position.
    Current,
}

/// One of the six named geometry-collection fields of a
/// [`GeoDataset`](crate::GeoDataset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum Slot {
    /// Rover waypoints (`perseverance-waypoints.json`).
    PerseveranceWaypoints,
    /// Rover traverse (`perseverance-path.json`).
    PerseverancePath,
    /// Rover current position (`perseverance-current.json`).
    PerseveranceCurrent,
    /// Helicopter flight waypoints (`ingenuity-waypoints.json`).
    IngenuityWaypoints,
    /// Helicopter flight path (`ingenuity-path.json`).
    IngenuityPath,
    /// Helicopter current position (`ingenuity-current.json`).
    IngenuityCurrent,
}

impl Slot {
    /// All six slots in canonical order.
    pub const ALL: [Self; 6] = [
        Self::PerseveranceWaypoints,
        Self::PerseverancePath,
        Self::PerseveranceCurrent,
        Self::IngenuityWaypoints,
        Self::IngenuityPath,
        Self::IngenuityCurrent,
    ];

    /// Camel-case field name, as used in the dataset payload.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PerseveranceWaypoints => "perseveranceWaypoints",
            Self::PerseverancePath => "perseverancePath",
            Self::PerseveranceCurrent => "perseveranceCurrent",
            Self::IngenuityWaypoints => "ingenuityWaypoints",
            Self::IngenuityPath => "ingenuityPath",
            Self::IngenuityCurrent => "ingenuityCurrent",
        }
    }

    /// Fixed resource filename served under the `geojson/` path.
    pub const fn filename(self) -> &'static str {
        match self {
            Self::PerseveranceWaypoints => "perseverance-waypoints.json",
            Self::PerseverancePath => "perseverance-path.json",
            Self::PerseveranceCurrent => "perseverance-current.json",
            Self::IngenuityWaypoints => "ingenuity-waypoints.json",
            Self::IngenuityPath => "ingenuity-path.json",
            Self::IngenuityCurrent => "ingenuity-current.json",
        }
    }

    /// The vehicle this slot describes.
    pub const fn vehicle(self) -> Vehicle {
        match self {
            Self::PerseveranceWaypoints | Self::PerseverancePath | Self::PerseveranceCurrent => {
                Vehicle::Perseverance
            }
            Self::IngenuityWaypoints | Self::IngenuityPath | Self::IngenuityCurrent => {
                Vehicle::Ingenuity
            }
        }
    }

    /// Whether the slot holds waypoints, a path, or the current position.
    pub const fn kind(self) -> SlotKind {
        match self {
            Self::PerseveranceWaypoints | Self::IngenuityWaypoints => SlotKind::Waypoints,
            Self::PerseverancePath | Self::IngenuityPath => SlotKind::Path,
            Self::PerseveranceCurrent | Self::IngenuityCurrent => SlotKind::Current,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slot {
    type Err = ParseIdentError;

    /// Accepts either the camel-case slot name or the resource filename.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.name() == s || slot.filename() == s)
            .ok_or_else(|| ParseIdentError::Slot(s.to_owned()))
    }
}
