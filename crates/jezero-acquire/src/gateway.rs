//! Remote data gateway: one named geometry document per call.
//!
//! The orchestrator is generic over [`Gateway`], so tests can substitute a
//! scripted implementation. Production code builds a [`GeometryGateway`]
//! from configuration with [`create_gateway`], which dispatches over the
//! concrete backends by enum instead of trait objects.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jezero_types::{FeatureCollection, Slot};
use tracing::debug;

use crate::config::{GatewayConfig, GatewaySource};
use crate::error::TransportError;

/// Source of geometry documents.
///
/// A call is a single attempt: no retry, no caching. Implementations
/// enforce their own upper bound on how long a call may take.
pub trait Gateway: Send + Sync {
    /// Fetch the collection stored in `slot`'s resource.
    fn fetch_geometry(
        &self,
        slot: Slot,
    ) -> impl Future<Output = Result<FeatureCollection, TransportError>> + Send;
}

/// Decode a response body as a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`TransportError::Decode`] if `body` is not JSON, or its `type`
/// tag or features do not form a `FeatureCollection`.
pub fn decode_collection(resource: &str, body: &[u8]) -> Result<FeatureCollection, TransportError> {
    serde_json::from_slice(body).map_err(|e| TransportError::Decode {
        resource: resource.to_owned(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Fetches `GET <origin>/<path_prefix>/geojson/<file>` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpGateway {
    /// Build a gateway with a client bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be
    /// initialised (for example, no TLS backend is available).
    pub fn new(config: &GatewayConfig) -> Result<Self, TransportError> {
        let base_url = config.geojson_base();
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Request {
                url: base_url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url,
            timeout_ms: config.timeout_ms,
        })
    }

    /// The full URL of `slot`'s document.
    pub fn url_for(&self, slot: Slot) -> String {
        format!("{}/{}", self.base_url, slot.filename())
    }

    fn classify(&self, url: &str, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                resource: url.to_owned(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            TransportError::Request {
                url: url.to_owned(),
                message: err.to_string(),
            }
        }
    }
}

impl Gateway for HttpGateway {
    async fn fetch_geometry(&self, slot: Slot) -> Result<FeatureCollection, TransportError> {
        let url = self.url_for(slot);
        debug!(slot = %slot, url = %url, "fetching geometry");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify(&url, &e))?;

        decode_collection(&url, &body)
    }
}

// ---------------------------------------------------------------------------
// Local directory
// ---------------------------------------------------------------------------

/// Reads `<directory>/<file>` from disk, for offline use against a copy of
/// the service's data directory.
#[derive(Debug, Clone)]
pub struct DirectoryGateway {
    root: PathBuf,
    timeout: Duration,
    timeout_ms: u64,
}

impl DirectoryGateway {
    /// Read documents from `root`, bounding each read by `timeout_ms`.
    pub fn new(root: impl Into<PathBuf>, timeout_ms: u64) -> Self {
        Self {
            root: root.into(),
            timeout: Duration::from_millis(timeout_ms),
            timeout_ms,
        }
    }

    /// The directory documents are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Gateway for DirectoryGateway {
    async fn fetch_geometry(&self, slot: Slot) -> Result<FeatureCollection, TransportError> {
        let path = self.root.join(slot.filename());
        let shown = path.display().to_string();
        debug!(slot = %slot, path = %shown, "reading geometry");

        let body = tokio::time::timeout(self.timeout, tokio::fs::read(&path))
            .await
            .map_err(|_| TransportError::Timeout {
                resource: shown.clone(),
                timeout_ms: self.timeout_ms,
            })?
            .map_err(|e| TransportError::Read {
                path: shown.clone(),
                message: e.to_string(),
            })?;

        decode_collection(&shown, &body)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// The configured gateway backend.
#[derive(Debug, Clone)]
pub enum GeometryGateway {
    /// Remote geometry service.
    Http(HttpGateway),
    /// Local data directory.
    Directory(DirectoryGateway),
}

impl GeometryGateway {
    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Directory(_) => "directory",
        }
    }
}

impl Gateway for GeometryGateway {
    async fn fetch_geometry(&self, slot: Slot) -> Result<FeatureCollection, TransportError> {
        match self {
            Self::Http(gateway) => gateway.fetch_geometry(slot).await,
            Self::Directory(gateway) => gateway.fetch_geometry(slot).await,
        }
    }
}

/// Build the gateway selected by `config.source`.
///
/// # Errors
///
/// Returns [`TransportError::Request`] if the HTTP client cannot be built.
pub fn create_gateway(config: &GatewayConfig) -> Result<GeometryGateway, TransportError> {
    Ok(match config.source {
        GatewaySource::Http => GeometryGateway::Http(HttpGateway::new(config)?),
        GatewaySource::Directory => GeometryGateway::Directory(DirectoryGateway::new(
            config.directory.clone(),
            config.timeout_ms,
        )),
    })
}
