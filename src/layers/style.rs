//! Visual layer definitions and their fixed paint/layout styles
//!
//! Paint and layout values are map-engine style expressions kept as JSON so
//! they can be handed to the surface unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Line,
    Circle,
    Fill,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Line => write!(f, "line"),
            LayerKind::Circle => write!(f, "circle"),
            LayerKind::Fill => write!(f, "fill"),
        }
    }
}

/// A visual layer bound to one data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub layout: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub paint: Value,
}

impl LayerSpec {
    pub fn new(id: &str, kind: LayerKind, source: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            source: source.to_string(),
            layout: Value::Null,
            paint: Value::Null,
        }
    }

    pub fn with_layout(mut self, layout: Value) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_paint(mut self, paint: Value) -> Self {
        self.paint = paint;
        self
    }
}

pub const ROUTE_COLOR: &str = "#3b82f6";

/// Colors for per-segment traffic congestion levels reported by the directions service
pub const CONGESTION_COLORS: [(&str, &str); 5] = [
    ("low", "#22c55e"),
    ("moderate", "#f59e0b"),
    ("heavy", "#ef4444"),
    ("severe", "#7f1d1d"),
    ("unknown", "#3b82f6"),
];

/// Color for a congestion level; unrecognized levels use the `unknown` color
pub fn congestion_color(level: &str) -> &'static str {
    CONGESTION_COLORS
        .iter()
        .find(|(name, _)| *name == level)
        .map(|(_, color)| *color)
        .unwrap_or(ROUTE_COLOR)
}

/// Safety score stops, red (unsafe) through teal (safe)
pub const SAFETY_SCORE_STOPS: [(f64, &str); 5] = [
    (0.0, "#ef4444"),
    (3.0, "#f97316"),
    (5.0, "#eab308"),
    (7.0, "#22c55e"),
    (10.0, "#10b981"),
];

/// Isochrone contour palette in minutes, plus the fallback color
pub const CONTOUR_COLORS: [(u32, &str); 3] = [(5, "#3b82f6"), (10, "#8b5cf6"), (15, "#ec4899")];
pub const CONTOUR_DEFAULT_COLOR: &str = "#6b7280";

pub fn route_line_layer(id: &str, source: &str) -> LayerSpec {
    LayerSpec::new(id, LayerKind::Line, source)
        .with_layout(json!({
            "line-join": "round",
            "line-cap": "round",
        }))
        .with_paint(json!({
            "line-color": ROUTE_COLOR,
            "line-width": 6,
            "line-opacity": 0.8,
        }))
}

pub fn safety_circle_layer(id: &str, source: &str) -> LayerSpec {
    let mut color = vec![json!("interpolate"), json!(["linear"]), json!(["get", "safety_score"])];
    for (stop, hex) in SAFETY_SCORE_STOPS {
        color.push(json!(stop));
        color.push(json!(hex));
    }

    LayerSpec::new(id, LayerKind::Circle, source).with_paint(json!({
        "circle-radius": ["interpolate", ["linear"], ["zoom"], 10, 4, 15, 12],
        "circle-color": color,
        "circle-opacity": 0.7,
        "circle-stroke-color": "#ffffff",
        "circle-stroke-width": 1,
    }))
}

pub fn isochrone_fill_layer(id: &str, source: &str) -> LayerSpec {
    let mut color = vec![json!("match"), json!(["get", "contour"])];
    for (minutes, hex) in CONTOUR_COLORS {
        color.push(json!(minutes));
        color.push(json!(hex));
    }
    color.push(json!(CONTOUR_DEFAULT_COLOR));

    LayerSpec::new(id, LayerKind::Fill, source).with_paint(json!({
        "fill-color": color,
        "fill-opacity": 0.3,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_layer_style() {
        let layer = route_line_layer("route-line", "route");
        assert_eq!(layer.kind, LayerKind::Line);
        assert_eq!(layer.layout["line-join"], "round");
        assert_eq!(layer.layout["line-cap"], "round");
        assert_eq!(layer.paint["line-color"], ROUTE_COLOR);
        assert_eq!(layer.paint["line-width"], 6);
    }

    #[test]
    fn test_safety_expression_has_five_stops() {
        let layer = safety_circle_layer("safety-layer", "safety-data");
        let color = layer.paint["circle-color"].as_array().unwrap();
        // "interpolate", ["linear"], ["get", ...] followed by stop/color pairs
        assert_eq!(color.len(), 3 + 2 * 5);
        assert_eq!(color[2], json!(["get", "safety_score"]));
        assert_eq!(color[3], json!(0.0));
        assert_eq!(color[4], "#ef4444");
        assert_eq!(color[12], "#10b981");
    }

    #[test]
    fn test_isochrone_expression_ends_with_default() {
        let layer = isochrone_fill_layer("isochrone-layer", "isochrone-data");
        let color = layer.paint["fill-color"].as_array().unwrap();
        assert_eq!(color.first().unwrap(), "match");
        assert_eq!(color.last().unwrap(), CONTOUR_DEFAULT_COLOR);
        assert_eq!(layer.paint["fill-opacity"], 0.3);
    }

    #[test]
    fn test_congestion_colors() {
        assert_eq!(congestion_color("heavy"), "#ef4444");
        assert_eq!(congestion_color("gridlock"), "#3b82f6");
    }

    #[test]
    fn test_layer_spec_serializes_engine_shape() {
        let value = serde_json::to_value(route_line_layer("route-line", "route")).unwrap();
        assert_eq!(value["type"], "line");
        assert_eq!(value["source"], "route");
        assert_eq!(value["id"], "route-line");
    }
}
