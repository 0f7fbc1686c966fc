//! Ephemeral selection state: the focused feature and its vehicle.
//!
//! Kept apart from the [`Store`](crate::Store). It belongs to a single view
//! and is mutated directly by that view's interaction handlers.

use jezero_types::{Feature, Vehicle};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A feature together with the vehicle it was picked from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Focus {
    /// The vehicle whose layer the feature belongs to.
    pub vehicle: Vehicle,
    /// The picked feature.
    pub feature: Feature,
}

/// Which feature and vehicle, if any, the detail panel shows.
///
/// Vehicle and feature are stored as one pair, so they are always both
/// present or both absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    focus: Option<Focus>,
}

impl SelectionState {
    /// An empty selection.
    pub const fn new() -> Self {
        Self { focus: None }
    }

    /// Focus `feature` of `vehicle`, replacing any previous selection.
    pub fn select(&mut self, vehicle: Vehicle, feature: Feature) {
        self.focus = Some(Focus { vehicle, feature });
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        self.focus = None;
    }

    /// The selected vehicle.
    pub fn vehicle(&self) -> Option<Vehicle> {
        self.focus.as_ref().map(|f| f.vehicle)
    }

    /// The selected feature.
    pub fn feature(&self) -> Option<&Feature> {
        self.focus.as_ref().map(|f| &f.feature)
    }

    /// The selected pair.
    pub const fn focus(&self) -> Option<&Focus> {
        self.focus.as_ref()
    }

    /// Whether anything is selected.
    pub const fn is_active(&self) -> bool {
        self.focus.is_some()
    }

    /// Serializable `{vehicle, feature}` view of the selection.
    pub fn current(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            vehicle: self.vehicle(),
            feature: self.feature().cloned(),
        }
    }
}

/// Flat `{vehicle, feature}` form of a [`SelectionState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SelectionSnapshot {
    /// The selected vehicle, or `null`.
    pub vehicle: Option<Vehicle>,
    /// The selected feature, or `null`.
    pub feature: Option<Feature>,
}
