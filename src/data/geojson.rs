use crate::core::geo::LngLat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

impl GeoJsonGeometry {
    pub fn point(position: LngLat) -> Self {
        Self::Point {
            coordinates: position.to_array(),
        }
    }
}

impl From<&geo_types::LineString<f64>> for GeoJsonGeometry {
    fn from(line: &geo_types::LineString<f64>) -> Self {
        Self::LineString {
            coordinates: line.coords().map(|c| [c.x, c.y]).collect(),
        }
    }
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    /// Feature with an empty property bag
    pub fn new(geometry: GeoJsonGeometry) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: Some(HashMap::new()),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Numeric property lookup, used by the data-driven overlay styles
    pub fn number(&self, key: &str) -> Option<f64> {
        self.properties.as_ref()?.get(key)?.as_f64()
    }
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    pub fn feature_collection(features: Vec<GeoJsonFeature>) -> Self {
        Self::FeatureCollection { features }
    }

    /// All features, a single feature as a one-element list
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features.iter().collect(),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features().len()
    }
}
