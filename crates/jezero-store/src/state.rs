//! The lifecycle state slice held by the store.

use jezero_types::AppData;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Request lifecycle flags, last error, and merged data payload.
///
/// Values of this type are snapshots. The live copy inside a
/// [`Store`](crate::Store) only changes through
/// [`Transition`](crate::Transition)s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LifecycleState {
    /// True between a load request and its settlement.
    pub loading: bool,
    /// Message of the last failed load. Survives later successes unless
    /// the success payload clears it.
    pub error: Option<String>,
    /// Merged geometry data. Once present it is retained across failures.
    pub data: Option<AppData>,
}

impl LifecycleState {
    /// Whether a view should issue a "load geometries" intent now.
    ///
    /// Redundant intents are the caller's to suppress: nothing is loaded
    /// yet, nothing is in flight, and no earlier attempt failed.
    pub const fn should_request_load(&self) -> bool {
        self.data.is_none() && !self.loading && self.error.is_none()
    }
}
