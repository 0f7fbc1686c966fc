//! Shared application state for the Observer API server.
//!
//! [`AppState`] bundles the process-wide [`Store`], the [`Orchestrator`]
//! that load requests are handed to, and the view's [`SelectionState`].
//! REST reads go straight to the store; `WebSocket` clients follow it
//! through its watch channel.

use std::collections::BTreeMap;
use std::sync::Arc;

use jezero_acquire::{GeometryGateway, Orchestrator};
use jezero_store::{LifecycleState, SelectionState, Store};
use jezero_types::Slot;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use ts_rs::TS;

/// Lightweight projection of [`LifecycleState`] without geometry.
///
/// Pushed over the `WebSocket` on every state change and served by
/// `GET /api/state/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateSummary {
    /// Whether a load is in flight.
    pub loading: bool,
    /// The last load error, if any.
    pub error: Option<String>,
    /// Feature count per loaded slot.
    pub slots: BTreeMap<Slot, usize>,
}

impl StateSummary {
    /// Summarise a state snapshot.
    pub fn of(state: &LifecycleState) -> Self {
        let slots = state
            .data
            .as_ref()
            .map(|data| {
                data.map
                    .loaded_slots()
                    .filter_map(|slot| data.map.get(slot).map(|c| (slot, c.len())))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            loading: state.loading,
            error: state.error.clone(),
            slots,
        }
    }
}

impl From<&LifecycleState> for StateSummary {
    fn from(state: &LifecycleState) -> Self {
        Self::of(state)
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The process-wide state store.
    pub store: Store,
    /// Runs load episodes against the configured gateway.
    pub orchestrator: Orchestrator<GeometryGateway>,
    /// The focused feature of this view.
    pub selection: Arc<RwLock<SelectionState>>,
}

impl AppState {
    /// Create the application state around an orchestrator.
    ///
    /// The store is taken from the orchestrator so both always agree.
    pub fn new(orchestrator: Orchestrator<GeometryGateway>) -> Self {
        Self {
            store: orchestrator.store().clone(),
            orchestrator,
            selection: Arc::new(RwLock::new(SelectionState::new())),
        }
    }

    /// Summary of the current store state.
    pub fn summary(&self) -> StateSummary {
        self.store.read(StateSummary::of)
    }
}

#[cfg(test)]
mod tests {
    use jezero_store::{SuccessPayload, Transition};
    use jezero_types::{Feature, FeatureCollection, GeoDataset, Geometry};

    use super::*;

    #[test]
    fn summary_counts_loaded_slots_only() {
        let store = Store::new();
        store.dispatch(Transition::success(SuccessPayload::map(
            GeoDataset::default()
                .with(
                    Slot::PerseverancePath,
                    FeatureCollection::new(vec![
                        Feature::new(Geometry::LineString(vec![
                            vec![77.45, 18.44],
                            vec![77.46, 18.45],
                        ])),
                    ]),
                )
                .with(Slot::IngenuityCurrent, FeatureCollection::default()),
        )));
        store.dispatch(Transition::Failure("partial".to_owned()));

        let summary = StateSummary::from(&store.snapshot());
        assert_eq!(summary.error.as_deref(), Some("partial"));
        assert_eq!(
            summary.slots,
            BTreeMap::from([(Slot::PerseverancePath, 1), (Slot::IngenuityCurrent, 0)])
        );

        let json = serde_json::to_value(&summary).unwrap_or_default();
        assert_eq!(
            json.pointer("/slots/perseverancePath"),
            Some(&serde_json::json!(1))
        );
    }
}
