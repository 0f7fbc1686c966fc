//! Pure transition reducer.
//!
//! `reduce` is deterministic and side-effect free. All asynchronous work
//! lives in the acquisition orchestrator; the reducer only folds one
//! transition into the current state.

use jezero_types::AppData;

use crate::state::LifecycleState;
use crate::transition::{ErrorUpdate, SuccessPayload, Transition};

/// Apply one transition to a state, producing the next state.
///
/// | Transition | Effect |
/// |---|---|
/// | `Request` | `loading = true` |
/// | `Fulfill` | `loading = false` |
/// | `Failure(message)` | `error = message` |
/// | `Success(payload)` | error per [`ErrorUpdate`]; data merged slot-wise |
pub fn reduce(state: LifecycleState, transition: Transition) -> LifecycleState {
    match transition {
        Transition::Request => LifecycleState {
            loading: true,
            ..state
        },
        Transition::Fulfill => LifecycleState {
            loading: false,
            ..state
        },
        Transition::Failure(message) => LifecycleState {
            error: Some(message),
            ..state
        },
        Transition::Success(payload) => apply_success(state, *payload),
    }
}

fn apply_success(state: LifecycleState, payload: SuccessPayload) -> LifecycleState {
    let error = match payload.error {
        ErrorUpdate::Keep => state.error,
        ErrorUpdate::Clear => None,
        ErrorUpdate::Replace(message) => Some(message),
    };

    let data = match (state.data, payload.data) {
        (Some(old), Some(new)) => Some(AppData {
            map: old.map.overlay(new.map),
        }),
        (None, Some(new)) => Some(new),
        (old, None) => old,
    };

    LifecycleState {
        loading: state.loading,
        error,
        data,
    }
}
