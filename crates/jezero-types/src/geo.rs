//! GeoJSON features and feature collections.
//!
//! Only the subset of RFC 7946 the traverse layers use is modelled: a
//! collection of features, each with an optional geometry and an open
//! property bag. Deserialization is strict about the `type` tags so that a
//! document of the wrong shape is rejected rather than silently read as an
//! empty collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::imagery::{DatasetImages, SolImages};

/// A longitude/latitude pair, optionally followed by elevation.
pub type Position = Vec<f64>;

/// Open-schema feature properties (sol index, telemetry, image URL lists).
pub type Properties = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "coordinates")]
#[ts(export, export_to = "bindings/")]
pub enum Geometry {
    /// A single position (current location, waypoint).
    Point(Position),
    /// Several unconnected positions.
    MultiPoint(Vec<Position>),
    /// A traversed segment.
    LineString(Vec<Position>),
    /// Several traversed segments.
    MultiLineString(Vec<Vec<Position>>),
    /// A closed area.
    Polygon(Vec<Vec<Position>>),
    /// Several closed areas.
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Whether this is a point-like geometry.
    pub const fn is_point(&self) -> bool {
        matches!(self, Self::Point(_) | Self::MultiPoint(_))
    }

    /// Whether this is a line-like geometry.
    pub const fn is_line(&self) -> bool {
        matches!(self, Self::LineString(_) | Self::MultiLineString(_))
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// The `type` tag of a [`Feature`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FeatureType {
    /// `"Feature"`
    #[default]
    Feature,
}

/// One element of a geometry collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Feature {
    /// Always `"Feature"`.
    #[serde(rename = "type")]
    pub kind: FeatureType,
    /// Optional feature identifier (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<Value>,
    /// The feature geometry; GeoJSON allows `null`.
    pub geometry: Option<Geometry>,
    /// The property bag; GeoJSON allows `null`.
    pub properties: Option<Properties>,
}

impl Feature {
    /// Create a feature with the given geometry and an empty property bag.
    pub const fn new(geometry: Geometry) -> Self {
        Self {
            kind: FeatureType::Feature,
            id: None,
            geometry: Some(geometry),
            properties: Some(BTreeMap::new()),
        }
    }

    /// Builder-style property setter.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_owned(), value.into());
        self
    }

    /// Look up a property by name.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }

    /// Read a numeric telemetry property.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.property(key)?.as_f64()
    }

    /// The sol this feature belongs to, as a string key.
    ///
    /// Numbers and strings are accepted. A missing, zero, or empty `sol`
    /// yields `None`: the landing sol carries no imagery.
    pub fn sol(&self) -> Option<String> {
        match self.property("sol")? {
            Value::Number(n) => sol_key(n),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Imagery attached under the `images` property by the data backend.
    ///
    /// Returns `None` if the property is absent or not shaped like
    /// [`SolImages`].
    pub fn images(&self) -> Option<SolImages> {
        let raw = self.property("images")?;
        serde_json::from_value(raw.clone()).ok()
    }
}

/// Integral sols render without a fraction, so `14` and `14.0` share a key.
fn sol_key(n: &serde_json::Number) -> Option<String> {
    if let Some(v) = n.as_u64() {
        return (v != 0).then(|| v.to_string());
    }
    if let Some(v) = n.as_i64() {
        return Some(v.to_string());
    }
    let v = n.as_f64()?;
    if v == 0.0 {
        None
    } else if v.fract() == 0.0 {
        Some(format!("{v:.0}"))
    } else {
        Some(v.to_string())
    }
}

// ---------------------------------------------------------------------------
// FeatureCollection
// ---------------------------------------------------------------------------

/// The `type` tag of a [`FeatureCollection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FeatureCollectionType {
    /// `"FeatureCollection"`
    #[default]
    FeatureCollection,
}

/// An ordered sequence of features: the payload of one slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    /// The features, in document order.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Wrap a list of features.
    pub const fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features,
        }
    }

    /// Number of features in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Attach `thumbnail` and `image` properties to each feature from the
    /// per-sol image index.
    ///
    /// Features without a sol, or whose sol has no entry, are left without
    /// that key. Existing properties are preserved.
    ///
    /// View-layer helper: the load path stores collections as fetched, and
    /// a consumer joins them with its image index before rendering.
    #[must_use]
    pub fn with_sol_images(mut self, images: &DatasetImages) -> Self {
        for feature in &mut self.features {
            let Some(sol) = feature.sol() else {
                continue;
            };
            let thumbnail = images.thumbnail.get(&sol).and_then(|i| serde_json::to_value(i).ok());
            let image = images.image.get(&sol).and_then(|i| serde_json::to_value(i).ok());
            if thumbnail.is_none() && image.is_none() {
                continue;
            }
            let properties = feature.properties.get_or_insert_with(BTreeMap::new);
            if let Some(thumbnail) = thumbnail {
                properties.insert("thumbnail".to_owned(), thumbnail);
            }
            if let Some(image) = image {
                properties.insert("image".to_owned(), image);
            }
        }
        self
    }
}
