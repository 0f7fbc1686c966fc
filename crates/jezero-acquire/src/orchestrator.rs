//! Load episodes: fetch all six geometry slots and commit the outcome.
//!
//! One "load geometries" intent runs one episode:
//!
//! 1. `request` is applied (and a new [`EpisodeId`] issued) before any
//!    gateway call starts.
//! 2. All six fetches run concurrently behind a single join-all barrier.
//!    A failing fetch does not cancel the others.
//! 3. Exactly one of `success` (all six collections, error cleared) or
//!    `failure` (the first failure in canonical slot order) is committed.
//! 4. `fulfill` is committed last, from a drop guard. If the episode future
//!    is dropped before an outcome was committed, the guard commits
//!    `failure` ([`ABORTED_MESSAGE`]) and then `fulfill`.
//!
//! Commits go through [`Store::commit`]: once a newer episode has started,
//! everything this episode would commit is discarded.

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use jezero_store::{EpisodeId, Store, SuccessPayload, Transition};
use jezero_types::{FeatureCollection, GeoDataset, Slot};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{AcquisitionError, TransportError};
use crate::gateway::Gateway;

/// Where an episode is in its lifecycle. Used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodePhase {
    /// No intent received yet.
    Idle,
    /// `request` applied, fetches not yet issued.
    Requested,
    /// Fetches issued, waiting for all six to settle.
    AwaitingAll,
    /// All six fetches succeeded.
    Succeeded,
    /// At least one fetch failed.
    Failed,
    /// `fulfill` applied.
    Settled,
}

impl fmt::Display for EpisodePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Requested => "requested",
            Self::AwaitingAll => "awaiting_all",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Settled => "settled",
        })
    }
}

/// How an episode ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// All six slots loaded.
    Succeeded {
        /// Total features across the six collections.
        feature_count: usize,
    },
    /// A fetch failed; no data was contributed.
    Failed {
        /// The message committed as the store's error.
        message: String,
    },
}

impl EpisodeOutcome {
    /// The terminal phase matching this outcome.
    pub const fn phase(&self) -> EpisodePhase {
        match self {
            Self::Succeeded { .. } => EpisodePhase::Succeeded,
            Self::Failed { .. } => EpisodePhase::Failed,
        }
    }
}

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeReport {
    /// The episode's id.
    pub episode: EpisodeId,
    /// What the fetches produced.
    pub outcome: EpisodeOutcome,
    /// True if a newer episode started first, so nothing was committed.
    pub superseded: bool,
    /// Time from `request` to `fulfill`.
    pub elapsed: Duration,
}

/// A load running on its own task.
#[derive(Debug)]
pub struct LoadTask {
    /// The episode issued for this load. `request` is already applied.
    pub episode: EpisodeId,
    /// Resolves to the report once the episode settles.
    pub handle: JoinHandle<EpisodeReport>,
}

/// Error committed for an episode that was dropped before it settled.
pub const ABORTED_MESSAGE: &str = "load episode aborted";

/// Commits `fulfill` for its episode exactly once: on [`settle`] or on drop.
///
/// Dropping it armed means no outcome was committed, so `failure` goes
/// first.
///
/// [`settle`]: FulfillGuard::settle
struct FulfillGuard {
    store: Store,
    episode: EpisodeId,
    armed: bool,
}

impl FulfillGuard {
    const fn new(store: Store, episode: EpisodeId) -> Self {
        Self {
            store,
            episode,
            armed: true,
        }
    }

    /// Commit `fulfill` now. Returns whether it was applied.
    fn settle(mut self) -> bool {
        self.armed = false;
        self.store.commit(self.episode, Transition::Fulfill)
    }
}

impl Drop for FulfillGuard {
    fn drop(&mut self) {
        if self.armed {
            warn!(episode = %self.episode, "load episode dropped before settling");
            self.store
                .commit(self.episode, Transition::Failure(ABORTED_MESSAGE.to_owned()));
            self.store.commit(self.episode, Transition::Fulfill);
        }
    }
}

/// Runs load episodes against a gateway, committing into a store.
pub struct Orchestrator<G> {
    gateway: Arc<G>,
    store: Store,
}

impl<G> Clone for Orchestrator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            store: self.store.clone(),
        }
    }
}

impl<G> fmt::Debug for Orchestrator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<G: Gateway> Orchestrator<G> {
    /// Create an orchestrator owning `gateway`.
    pub fn new(gateway: G, store: Store) -> Self {
        Self::from_shared(Arc::new(gateway), store)
    }

    /// Create an orchestrator around an already shared gateway.
    pub const fn from_shared(gateway: Arc<G>, store: Store) -> Self {
        Self { gateway, store }
    }

    /// The store episodes commit into.
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// The gateway fetches go through.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run one load episode to completion.
    ///
    /// Never fails: a fetch failure becomes a `failure` transition and is
    /// reported in [`EpisodeReport::outcome`].
    pub async fn load_geometries(&self) -> EpisodeReport {
        let started = Instant::now();
        let episode = self.store.begin_episode();
        let guard = FulfillGuard::new(self.store.clone(), episode);
        self.run_episode(guard, started).await
    }

    async fn fetch_slot(
        &self,
        slot: Slot,
    ) -> (Slot, Result<FeatureCollection, TransportError>) {
        (slot, self.gateway.fetch_geometry(slot).await)
    }

    async fn run_episode(&self, guard: FulfillGuard, started: Instant) -> EpisodeReport {
        let episode = guard.episode;
        info!(episode = %episode, phase = %EpisodePhase::Requested, "load episode started");

        debug!(episode = %episode, phase = %EpisodePhase::AwaitingAll, "issuing fetches");
        let fetches: Vec<_> = Slot::ALL
            .into_iter()
            .map(|slot| self.fetch_slot(slot))
            .collect();
        let results = join_all(fetches).await;

        let (transition, outcome) = match assemble(episode, results) {
            Ok(map) => {
                let feature_count = map.feature_count();
                (
                    Transition::success(SuccessPayload::map(map).clearing_error()),
                    EpisodeOutcome::Succeeded { feature_count },
                )
            }
            Err(err) => {
                let message = err.to_string();
                (
                    Transition::Failure(message.clone()),
                    EpisodeOutcome::Failed { message },
                )
            }
        };

        let committed = self.store.commit(episode, transition);
        let fulfilled = guard.settle();
        let superseded = !(committed && fulfilled);
        let elapsed = started.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        match &outcome {
            EpisodeOutcome::Succeeded { feature_count } => info!(
                episode = %episode,
                phase = %EpisodePhase::Settled,
                feature_count,
                superseded,
                elapsed_ms,
                "load episode succeeded"
            ),
            EpisodeOutcome::Failed { message } => warn!(
                episode = %episode,
                phase = %EpisodePhase::Settled,
                error = %message,
                superseded,
                elapsed_ms,
                "load episode failed"
            ),
        }

        EpisodeReport {
            episode,
            outcome,
            superseded,
            elapsed,
        }
    }
}

impl<G: Gateway + 'static> Orchestrator<G> {
    /// Start a load episode on a new Tokio task.
    ///
    /// `request` is applied before this returns, so the returned episode id
    /// is already the latest one.
    pub fn spawn_load(&self) -> LoadTask {
        let started = Instant::now();
        let episode = self.store.begin_episode();
        let guard = FulfillGuard::new(self.store.clone(), episode);
        let this = self.clone();
        let handle = tokio::spawn(async move { this.run_episode(guard, started).await });
        LoadTask { episode, handle }
    }
}

/// Fold the six fetch results into a complete dataset, or the first
/// failure in canonical slot order.
fn assemble(
    episode: EpisodeId,
    results: Vec<(Slot, Result<FeatureCollection, TransportError>)>,
) -> Result<GeoDataset, AcquisitionError> {
    let mut map = GeoDataset::default();
    let mut first_failure = None;

    for (slot, result) in results {
        match result {
            Ok(collection) => {
                debug!(episode = %episode, slot = %slot, features = collection.len(), "slot loaded");
                *map.slot_mut(slot) = Some(collection);
            }
            Err(source) => {
                warn!(episode = %episode, slot = %slot, error = %source, "slot fetch failed");
                first_failure.get_or_insert(AcquisitionError::Gateway { slot, source });
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(map),
    }
}

#[cfg(test)]
mod tests {
    use jezero_types::{Feature, Geometry};

    use super::*;

    fn ok(slot: Slot) -> (Slot, Result<FeatureCollection, TransportError>) {
        (
            slot,
            Ok(FeatureCollection::new(vec![Feature::new(Geometry::Point(
                vec![77.45, 18.44],
            ))])),
        )
    }

    fn failed(slot: Slot, status: u16) -> (Slot, Result<FeatureCollection, TransportError>) {
        (
            slot,
            Err(TransportError::Status {
                url: slot.filename().to_owned(),
                status,
            }),
        )
    }

    #[test]
    fn assemble_fills_all_slots() {
        let results = Slot::ALL.into_iter().map(ok).collect();
        let map = assemble(EpisodeId(1), results);
        assert!(map.as_ref().is_ok_and(GeoDataset::is_complete));
        assert_eq!(map.map(|m| m.feature_count()).ok(), Some(6));
    }

    #[test]
    fn assemble_reports_first_failure_in_slot_order() {
        let results = vec![
            ok(Slot::PerseveranceWaypoints),
            failed(Slot::PerseverancePath, 502),
            ok(Slot::PerseveranceCurrent),
            failed(Slot::IngenuityWaypoints, 404),
            ok(Slot::IngenuityPath),
            ok(Slot::IngenuityCurrent),
        ];
        let err = assemble(EpisodeId(1), results).err();
        assert_eq!(err.map(|e| e.slot()), Some(Slot::PerseverancePath));
    }

    #[test]
    fn outcome_phase() {
        assert_eq!(
            EpisodeOutcome::Succeeded { feature_count: 0 }.phase(),
            EpisodePhase::Succeeded
        );
        assert_eq!(
            EpisodeOutcome::Failed {
                message: String::new()
            }
            .phase(),
            EpisodePhase::Failed
        );
        assert_eq!(EpisodePhase::AwaitingAll.to_string(), "awaiting_all");
    }
}
