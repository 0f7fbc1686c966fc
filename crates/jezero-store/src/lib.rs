//! Application state for the Jezero traverse map.
//!
//! The store holds a single observable [`LifecycleState`] (loading flag,
//! last error, merged geometry data) that changes only through declared
//! [`Transition`]s folded in by the pure [`reduce`] function. Selection of
//! the focused feature lives separately in [`SelectionState`].
//!
//! # Modules
//!
//! - [`state`] -- The lifecycle state slice
//! - [`transition`] -- Transition messages and typed partial updates
//! - [`reducer`] -- The pure reducer
//! - [`store`] -- The observable container with episode supersession
//! - [`selection`] -- Focused feature/vehicle pair

pub mod reducer;
pub mod selection;
pub mod state;
pub mod store;
pub mod transition;

pub use reducer::reduce;
pub use selection::{Focus, SelectionSnapshot, SelectionState};
pub use state::LifecycleState;
pub use store::{EpisodeId, Store, StoreEvent};
pub use transition::{ErrorUpdate, SuccessPayload, Transition, TransitionKind};
