//! The observable application state container.
//!
//! [`Store`] is a cheap-to-clone handle around a [`watch`] channel holding
//! the current [`LifecycleState`]. Every transition runs the pure reducer
//! while the channel's write lock is held, so a reader never sees a
//! half-applied transition, and every applied transition notifies watchers.
//!
//! A [`broadcast`] journal additionally records each transition (applied or
//! rejected) in order, for consumers that need the full sequence rather
//! than the latest value.
//!
//! # Episodes
//!
//! A load episode starts with [`Store::begin_episode`], which issues a new
//! [`EpisodeId`] and applies `request` in one step. The episode's later
//! transitions go through [`Store::commit`], which applies them only while
//! that episode is still the latest one issued. A slow episode that
//! resolves after a newer one started is therefore discarded instead of
//! overwriting newer state.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, trace};
use ts_rs::TS;

use crate::reducer::reduce;
use crate::state::LifecycleState;
use crate::transition::{Transition, TransitionKind};

/// Capacity of the transition journal.
///
/// A subscriber that falls further behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips ahead.
const JOURNAL_CAPACITY: usize = 256;

/// Monotonically increasing identifier of one load episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EpisodeId(pub u64);

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One journal entry: a transition offered to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StoreEvent {
    /// Position of this entry in the journal, starting at 1.
    pub sequence: u64,
    /// The episode the transition belongs to, if dispatched by one.
    pub episode: Option<EpisodeId>,
    /// Which transition was offered.
    pub transition: TransitionKind,
    /// False when the transition was rejected as stale.
    pub applied: bool,
}

struct Inner {
    state: watch::Sender<LifecycleState>,
    journal: broadcast::Sender<StoreEvent>,
    /// Last issued episode; `0` before the first one.
    latest_episode: AtomicU64,
    sequence: AtomicU64,
}

impl Inner {
    /// Append to the journal. Must be called with the state lock held so
    /// journal order matches application order.
    fn record(&self, episode: Option<EpisodeId>, transition: TransitionKind, applied: bool) {
        let sequence = self
            .sequence
            .fetch_add(1, Ordering::AcqRel)
            .wrapping_add(1);
        // send only fails when nobody is subscribed, which is normal.
        let _ = self.journal.send(StoreEvent {
            sequence,
            episode,
            transition,
            applied,
        });
    }
}

/// Process-wide application state store.
///
/// Construct once at startup and hand clones to the orchestrator and the
/// view layer.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Create a store in the initial state
    /// (`loading = false`, no error, no data).
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::default());
        let (journal, _) = broadcast::channel(JOURNAL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state,
                journal,
                latest_episode: AtomicU64::new(0),
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> LifecycleState {
        self.inner.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&LifecycleState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Receiver notified after every applied transition.
    pub fn watch(&self) -> watch::Receiver<LifecycleState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to the transition journal.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.journal.subscribe()
    }

    /// The most recently issued episode, if any.
    pub fn latest_episode(&self) -> Option<EpisodeId> {
        match self.inner.latest_episode.load(Ordering::Acquire) {
            0 => None,
            id => Some(EpisodeId(id)),
        }
    }

    /// Apply a transition unconditionally.
    pub fn dispatch(&self, transition: Transition) {
        let kind = transition.kind();
        self.inner.state.send_modify(|state| {
            *state = reduce(std::mem::take(state), transition);
            self.inner.record(None, kind, true);
        });
        trace!(transition = %kind, "transition applied");
    }

    /// Start a new load episode: issue its id and apply `request`.
    ///
    /// Any episode still in flight is superseded from this point on.
    pub fn begin_episode(&self) -> EpisodeId {
        let mut issued = EpisodeId(0);
        self.inner.state.send_modify(|state| {
            let id = self
                .inner
                .latest_episode
                .fetch_add(1, Ordering::AcqRel)
                .wrapping_add(1);
            issued = EpisodeId(id);
            *state = reduce(std::mem::take(state), Transition::Request);
            self.inner
                .record(Some(issued), TransitionKind::Request, true);
        });
        trace!(episode = %issued, "episode started");
        issued
    }

    /// Apply a transition on behalf of `episode`, unless a newer episode
    /// has been issued since.
    ///
    /// Returns whether the transition was applied.
    pub fn commit(&self, episode: EpisodeId, transition: Transition) -> bool {
        let kind = transition.kind();
        let applied = self.inner.state.send_if_modified(|state| {
            let current = self.inner.latest_episode.load(Ordering::Acquire) == episode.0;
            if current {
                *state = reduce(std::mem::take(state), transition);
            }
            self.inner.record(Some(episode), kind, current);
            current
        });
        if !applied {
            debug!(
                episode = %episode,
                transition = %kind,
                "discarding transition from superseded episode"
            );
        }
        applied
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("latest_episode", &self.latest_episode())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn episodes_are_monotonic() {
        let store = Store::new();
        assert_eq!(store.latest_episode(), None);
        let first = store.begin_episode();
        let second = store.begin_episode();
        assert!(second > first);
        assert_eq!(store.latest_episode(), Some(second));
    }

    #[test]
    fn stale_commit_is_rejected_and_journaled() {
        let store = Store::new();
        let mut journal = store.subscribe();

        let stale = store.begin_episode();
        let fresh = store.begin_episode();

        assert!(!store.commit(stale, Transition::Failure("late".to_owned())));
        assert!(!store.commit(stale, Transition::Fulfill));
        assert!(store.snapshot().loading);
        assert_eq!(store.snapshot().error, None);

        assert!(store.commit(fresh, Transition::Fulfill));
        assert!(!store.snapshot().loading);

        let kinds: Vec<(TransitionKind, bool)> = std::iter::from_fn(|| journal.try_recv().ok())
            .map(|e| (e.transition, e.applied))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (TransitionKind::Request, true),
                (TransitionKind::Request, true),
                (TransitionKind::Failure, false),
                (TransitionKind::Fulfill, false),
                (TransitionKind::Fulfill, true),
            ]
        );
    }

    #[tokio::test]
    async fn watchers_are_notified_on_every_transition() {
        let store = Store::new();
        let mut rx = store.watch();

        store.dispatch(Transition::Request);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading);

        // Applying a transition that leaves the value equal still notifies.
        store.dispatch(Transition::Request);
        assert!(rx.has_changed().unwrap());
    }
}
