//! Jezero traverse map service.
//!
//! Wires the geometry gateway, the process-wide state store, and the
//! observer server together.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `jezero.yaml` (or `$JEZERO_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the state store
//! 4. Build the configured geometry gateway and the orchestrator
//! 5. Issue the initial load intent, if the view guard allows it
//! 6. Serve the observer API until the process is terminated

mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use jezero_acquire::{Orchestrator, create_gateway};
use jezero_observer::{AppState, start_server};
use jezero_store::Store;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH, LogFormat, LoggingConfig, ViewerConfig};
use crate::error::ViewerError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the gateway cannot be
/// built, or the observer server fails.
#[tokio::main]
async fn main() -> Result<(), ViewerError> {
    // 1. Load configuration. Logging depends on it, so errors here are
    //    reported by the runtime rather than through tracing.
    let config_path = std::env::var(CONFIG_PATH_VAR)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = ViewerConfig::load(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config_path = %config_path.display(),
        origin = config.gateway.origin,
        source = ?config.gateway.source,
        timeout_ms = config.gateway.timeout_ms,
        "jezero-viewer starting"
    );

    // 3. Create the store.
    let store = Store::new();

    // 4. Build gateway and orchestrator.
    let gateway = create_gateway(&config.gateway)?;
    info!(gateway = gateway.name(), "Geometry gateway ready");
    let orchestrator = Orchestrator::new(gateway, store.clone());

    // 5. Initial load, guarded the same way a view guards it.
    if config.load_on_startup && store.read(jezero_store::LifecycleState::should_request_load) {
        let task = orchestrator.spawn_load();
        info!(episode = %task.episode, "Initial load dispatched");
    }

    // 6. Serve.
    let state = Arc::new(AppState::new(orchestrator));
    start_server(&config.server, state).await?;

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
