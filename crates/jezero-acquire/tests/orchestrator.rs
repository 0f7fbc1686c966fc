//! Integration tests for load episodes.
//!
//! A scripted gateway decides each fetch's delay and result from the
//! episode that issued it, and records what the store looked like when the
//! call was made. Tests run on a paused clock so delays are deterministic.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::time::Duration;

use jezero_acquire::{ABORTED_MESSAGE, EpisodeOutcome, Gateway, Orchestrator, TransportError};
use jezero_store::{EpisodeId, Store, TransitionKind};
use jezero_types::{Feature, FeatureCollection, Geometry, Slot};

type Script = dyn Fn(u64, Slot) -> (Duration, Result<FeatureCollection, TransportError>) + Send + Sync;

/// One recorded gateway call.
#[derive(Debug, Clone, Copy)]
struct Call {
    episode: u64,
    slot: Slot,
    loading: bool,
}

struct ScriptedGateway {
    store: Store,
    script: Box<Script>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    fn new(
        store: &Store,
        script: impl Fn(u64, Slot) -> (Duration, Result<FeatureCollection, TransportError>)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            store: store.clone(),
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Gateway for ScriptedGateway {
    async fn fetch_geometry(&self, slot: Slot) -> Result<FeatureCollection, TransportError> {
        let episode = self.store.latest_episode().map_or(0, |e| e.0);
        let loading = self.store.read(|s| s.loading);
        self.calls.lock().unwrap().push(Call {
            episode,
            slot,
            loading,
        });
        let (delay, result) = (self.script)(episode, slot);
        tokio::time::sleep(delay).await;
        result
    }
}

/// A one-feature collection tagged with the episode that produced it.
fn tagged(episode: u64) -> FeatureCollection {
    FeatureCollection::new(vec![
        Feature::new(Geometry::Point(vec![77.45, 18.44])).with_property("episode", episode),
    ])
}

fn episode_tag(store: &Store, slot: Slot) -> Option<u64> {
    store.read(|s| {
        s.data
            .as_ref()?
            .map
            .get(slot)?
            .features
            .first()?
            .property("episode")?
            .as_u64()
    })
}

fn status_error(slot: Slot, status: u16) -> TransportError {
    TransportError::Status {
        url: format!("http://mars.test/mars-20/api/geojson/{}", slot.filename()),
        status,
    }
}

#[tokio::test(start_paused = true)]
async fn success_loads_all_six_slots_and_clears_error() {
    let store = Store::new();
    store.dispatch(jezero_store::Transition::Failure("earlier".to_owned()));

    let gateway = ScriptedGateway::new(&store, |episode, _| {
        (Duration::from_millis(20), Ok(tagged(episode)))
    });
    let orchestrator = Orchestrator::new(gateway, store.clone());

    let report = orchestrator.load_geometries().await;

    assert_eq!(report.outcome, EpisodeOutcome::Succeeded { feature_count: 6 });
    assert!(!report.superseded);
    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert!(state.data.unwrap().map.is_complete());
}

#[tokio::test(start_paused = true)]
async fn request_is_applied_before_any_fetch() {
    let store = Store::new();
    let gateway = ScriptedGateway::new(&store, |episode, _| (Duration::ZERO, Ok(tagged(episode))));
    let orchestrator = Orchestrator::new(gateway, store.clone());

    orchestrator.load_geometries().await;

    let calls = orchestrator.gateway().calls();
    assert_eq!(calls.len(), 6);
    assert!(calls.iter().all(|c| c.loading && c.episode == 1));
    let mut slots: Vec<Slot> = calls.iter().map(|c| c.slot).collect();
    slots.sort();
    assert_eq!(slots, Slot::ALL.to_vec());
}

#[tokio::test(start_paused = true)]
async fn failure_uses_first_slot_in_canonical_order() {
    let store = Store::new();
    let gateway = ScriptedGateway::new(&store, |episode, slot| match slot {
        // Fails last in time but first in slot order.
        Slot::PerseverancePath => (Duration::from_millis(500), Err(status_error(slot, 502))),
        Slot::IngenuityWaypoints => (Duration::from_millis(5), Err(status_error(slot, 404))),
        _ => (Duration::from_millis(10), Ok(tagged(episode))),
    });
    let orchestrator = Orchestrator::new(gateway, store.clone());
    let mut journal = store.subscribe();

    let report = orchestrator.load_geometries().await;

    let expected = status_error(Slot::PerseverancePath, 502).to_string();
    assert_eq!(
        report.outcome,
        EpisodeOutcome::Failed {
            message: expected.clone()
        }
    );
    // Every call settled before the episode did.
    assert!(report.elapsed >= Duration::from_millis(500));

    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error, Some(expected));
    assert_eq!(state.data, None);

    let kinds: Vec<TransitionKind> = std::iter::from_fn(|| journal.try_recv().ok())
        .map(|e| e.transition)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TransitionKind::Request,
            TransitionKind::Failure,
            TransitionKind::Fulfill
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_previous_data() {
    let store = Store::new();
    let gateway = ScriptedGateway::new(&store, |episode, slot| {
        if episode == 2 && slot == Slot::IngenuityCurrent {
            (
                Duration::from_millis(30_000),
                Err(TransportError::Timeout {
                    resource: slot.filename().to_owned(),
                    timeout_ms: 30_000,
                }),
            )
        } else {
            (Duration::from_millis(10), Ok(tagged(episode)))
        }
    });
    let orchestrator = Orchestrator::new(gateway, store.clone());

    orchestrator.load_geometries().await;
    let loaded = store.snapshot().data;
    let report = orchestrator.load_geometries().await;

    assert!(matches!(report.outcome, EpisodeOutcome::Failed { .. }));
    assert_eq!(store.snapshot().data, loaded);
    assert_eq!(episode_tag(&store, Slot::PerseveranceWaypoints), Some(1));
}

#[tokio::test(start_paused = true)]
async fn newer_episode_wins_when_older_resolves_last() {
    let store = Store::new();
    let gateway = ScriptedGateway::new(&store, |episode, _| {
        let delay = if episode == 1 { 100 } else { 10 };
        (Duration::from_millis(delay), Ok(tagged(episode)))
    });
    let orchestrator = Orchestrator::new(gateway, store.clone());

    let first = orchestrator.spawn_load();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = orchestrator.spawn_load();
    assert_eq!(first.episode, EpisodeId(1));
    assert_eq!(second.episode, EpisodeId(2));

    let second = second.handle.await.unwrap();
    assert!(!second.superseded);
    assert!(!store.snapshot().loading);

    let first = first.handle.await.unwrap();
    assert!(first.superseded);
    assert_eq!(episode_tag(&store, Slot::IngenuityPath), Some(2));
    assert!(!store.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn stale_fulfill_does_not_clear_loading() {
    let store = Store::new();
    let gateway = ScriptedGateway::new(&store, |episode, _| {
        let delay = if episode == 1 { 20 } else { 200 };
        (Duration::from_millis(delay), Ok(tagged(episode)))
    });
    let orchestrator = Orchestrator::new(gateway, store.clone());

    let first = orchestrator.spawn_load();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = orchestrator.spawn_load();

    let first = first.handle.await.unwrap();
    assert!(first.superseded);
    let state = store.snapshot();
    assert!(state.loading);
    assert_eq!(state.data, None);

    second.handle.await.unwrap();
    assert!(!store.snapshot().loading);
    assert_eq!(episode_tag(&store, Slot::PerseveranceCurrent), Some(2));
}

#[tokio::test(start_paused = true)]
async fn aborted_episode_fails_then_fulfills() {
    let store = Store::new();
    let gateway = ScriptedGateway::new(&store, |episode, _| {
        (Duration::from_secs(3_600), Ok(tagged(episode)))
    });
    let orchestrator = Orchestrator::new(gateway, store.clone());
    let mut journal = store.subscribe();

    let task = orchestrator.spawn_load();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(store.snapshot().loading);

    task.handle.abort();
    assert!(task.handle.await.unwrap_err().is_cancelled());
    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.data, None);
    assert_eq!(state.error.as_deref(), Some(ABORTED_MESSAGE));

    let kinds: Vec<TransitionKind> = std::iter::from_fn(|| journal.try_recv().ok())
        .map(|e| e.transition)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TransitionKind::Request,
            TransitionKind::Failure,
            TransitionKind::Fulfill
        ]
    );
}
