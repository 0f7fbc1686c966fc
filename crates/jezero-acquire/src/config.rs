//! Gateway configuration (the `gateway:` section of `jezero.yaml`).

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Where geometry documents come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewaySource {
    /// The remote geometry service over HTTP.
    #[default]
    Http,
    /// A local directory holding the six `*.json` files.
    Directory,
}

/// Settings for reaching the geometry documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// Service origin, e.g. `http://localhost:8000`.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path between the origin and `geojson/<file>`.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Upper bound for one fetch, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Which gateway implementation to build.
    #[serde(default)]
    pub source: GatewaySource,

    /// Directory read by [`GatewaySource::Directory`].
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl GatewayConfig {
    /// The per-call timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `<origin>/<path_prefix>/geojson`, without a trailing slash.
    pub fn geojson_base(&self) -> String {
        let origin = self.origin.trim_end_matches('/');
        let prefix = self.path_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{origin}/geojson")
        } else {
            format!("{origin}/{prefix}/geojson")
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            path_prefix: default_path_prefix(),
            timeout_ms: default_timeout_ms(),
            source: GatewaySource::default(),
            directory: default_directory(),
        }
    }
}

fn default_origin() -> String {
    "http://localhost:8000".to_owned()
}

fn default_path_prefix() -> String {
    "mars-20/api".to_owned()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_directory() -> PathBuf {
    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = GatewayConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.source, GatewaySource::Http);
        assert_eq!(
            config.geojson_base(),
            "http://localhost:8000/mars-20/api/geojson"
        );
    }

    #[test]
    fn base_url_tolerates_stray_slashes() {
        let config = GatewayConfig {
            origin: "https://example.org/".to_owned(),
            path_prefix: "/mars-20/api/".to_owned(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.geojson_base(), "https://example.org/mars-20/api/geojson");

        let bare = GatewayConfig {
            path_prefix: String::new(),
            ..GatewayConfig::default()
        };
        assert_eq!(bare.geojson_base(), "http://localhost:8000/geojson");
    }
}
