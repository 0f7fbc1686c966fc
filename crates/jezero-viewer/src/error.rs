//! Error types for the viewer binary.
//!
//! [`ViewerError`] wraps every failure mode of startup and serving so that
//! `main` can propagate with `?`.

use jezero_acquire::TransportError;
use jezero_observer::ServerError;

use crate::config::ConfigError;

/// Top-level error for the viewer binary.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The geometry gateway could not be built.
    #[error("gateway error: {source}")]
    Gateway {
        /// The underlying transport error.
        #[from]
        source: TransportError,
    },

    /// The observer server failed to start or stopped with an error.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}
