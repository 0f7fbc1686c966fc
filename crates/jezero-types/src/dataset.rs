//! The merged map dataset: six optional geometry slots.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geo::FeatureCollection;
use crate::vehicle::Slot;

/// Six named, independently optional geometry collections.
///
/// Also used as a partial update: when overlaid onto an existing dataset,
/// every present slot overwrites the old one and absent slots leave the old
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct GeoDataset {
    /// Rover waypoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub perseverance_waypoints: Option<FeatureCollection>,
    /// Rover traverse.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub perseverance_path: Option<FeatureCollection>,
    /// Rover current position.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub perseverance_current: Option<FeatureCollection>,
    /// Helicopter waypoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ingenuity_waypoints: Option<FeatureCollection>,
    /// Helicopter flight path.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ingenuity_path: Option<FeatureCollection>,
    /// Helicopter current position.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ingenuity_current: Option<FeatureCollection>,
}

impl GeoDataset {
    /// Borrow one slot's collection, if loaded.
    pub const fn get(&self, slot: Slot) -> Option<&FeatureCollection> {
        match slot {
            Slot::PerseveranceWaypoints => self.perseverance_waypoints.as_ref(),
            Slot::PerseverancePath => self.perseverance_path.as_ref(),
            Slot::PerseveranceCurrent => self.perseverance_current.as_ref(),
            Slot::IngenuityWaypoints => self.ingenuity_waypoints.as_ref(),
            Slot::IngenuityPath => self.ingenuity_path.as_ref(),
            Slot::IngenuityCurrent => self.ingenuity_current.as_ref(),
        }
    }

    /// Mutable access to one slot.
    pub const fn slot_mut(&mut self, slot: Slot) -> &mut Option<FeatureCollection> {
        match slot {
            Slot::PerseveranceWaypoints => &mut self.perseverance_waypoints,
            Slot::PerseverancePath => &mut self.perseverance_path,
            Slot::PerseveranceCurrent => &mut self.perseverance_current,
            Slot::IngenuityWaypoints => &mut self.ingenuity_waypoints,
            Slot::IngenuityPath => &mut self.ingenuity_path,
            Slot::IngenuityCurrent => &mut self.ingenuity_current,
        }
    }

    /// Builder-style slot setter.
    #[must_use]
    pub fn with(mut self, slot: Slot, collection: FeatureCollection) -> Self {
        *self.slot_mut(slot) = Some(collection);
        self
    }

    /// Overlay `patch` onto `self`: present slots in the patch win.
    #[must_use]
    pub fn overlay(mut self, mut patch: Self) -> Self {
        for slot in Slot::ALL {
            if let Some(collection) = patch.slot_mut(slot).take() {
                *self.slot_mut(slot) = Some(collection);
            }
        }
        self
    }

    /// Slots that currently hold a collection, in canonical order.
    pub fn loaded_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        Slot::ALL.into_iter().filter(|slot| self.get(*slot).is_some())
    }

    /// Whether all six slots are populated.
    pub fn is_complete(&self) -> bool {
        self.loaded_slots().count() == Slot::ALL.len()
    }

    /// Total number of features across all loaded slots.
    pub fn feature_count(&self) -> usize {
        Slot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot))
            .map(FeatureCollection::len)
            .sum()
    }
}

/// The store's data payload. Wraps the map dataset under `map`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct AppData {
    /// The six geometry slots.
    pub map: GeoDataset,
}
