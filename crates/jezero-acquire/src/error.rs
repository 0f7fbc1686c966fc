//! Error types for geometry acquisition.
//!
//! [`TransportError`] is what a single gateway call fails with. The
//! orchestrator wraps the first one of an episode in [`AcquisitionError`]
//! and hands its message to the store verbatim.

use jezero_types::Slot;

/// A single geometry fetch failed.
///
/// Every variant renders a human-readable message; that message is what
/// ends up in the store's `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the connection broke.
    #[error("request to {url} failed: {message}")]
    Request {
        /// The resource location.
        url: String,
        /// Description from the HTTP client.
        message: String,
    },

    /// The call did not settle within the configured bound.
    #[error("request for {resource} timed out after {timeout_ms} ms")]
    Timeout {
        /// The resource location.
        resource: String,
        /// The bound that was exceeded.
        timeout_ms: u64,
    },

    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The resource location.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The body is not a GeoJSON `FeatureCollection`.
    #[error("{resource} is not a FeatureCollection: {message}")]
    Decode {
        /// The resource location.
        resource: String,
        /// Description from the JSON decoder.
        message: String,
    },

    /// A local geometry file could not be read.
    #[error("failed to read {path}: {message}")]
    Read {
        /// The file path.
        path: String,
        /// Description from the filesystem.
        message: String,
    },
}

/// A load episode failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcquisitionError {
    /// The fetch for `slot` failed.
    ///
    /// Renders as the transport message alone, so the store shows what the
    /// transport reported.
    #[error("{source}")]
    Gateway {
        /// The slot whose fetch failed first in canonical order.
        slot: Slot,
        /// The underlying transport failure.
        source: TransportError,
    },
}

impl AcquisitionError {
    /// The slot the failure is attributed to.
    pub const fn slot(&self) -> Slot {
        match self {
            Self::Gateway { slot, .. } => *slot,
        }
    }
}
