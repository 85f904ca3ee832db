//! # MapJitsu
//!
//! View-state and overlay synchronization core for an interactive 3D map.
//!
//! The crate owns the state that sits between user interaction and the map
//! engine: camera modes, time-of-day lighting, debounced place search,
//! route fetching, and the add/update/remove lifecycle of overlay layers.
//! The map engine itself is reached only through the [`MapSurface`]
//! capability trait, so any engine (or the bundled in-memory surface) can
//! be attached to a [`MapStore`].

pub mod animation;
pub mod camera;
pub mod core;
pub mod data;
pub mod geolocation;
pub mod layers;
pub mod lighting;
pub mod prelude;
pub mod runtime;
pub mod search;
pub mod services;
pub mod surface;
pub mod traits;
pub mod vibe;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapJitsuBuilder,
    config::MapJitsuConfig,
    geo::LngLat,
    map::MapJitsu,
    store::{MapStore, StoreEvent, ViewState},
};

pub use animation::transitions::{CameraTransition, TransitionId};

pub use camera::{CameraController, CameraMode, CameraModeKey};

pub use lighting::{resolve_preset, LightPreset, LightingController};

pub use layers::{
    overlay::{Overlay, OverlayManager},
    route::{RouteData, RouteManager, RouteStep},
};

pub use search::{orchestrator::SearchBox, SearchResult};

pub use surface::{memory::InMemorySurface, MapSurface};

pub use data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {}", details.join("; "))]
    Validation { details: Vec<String> },

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Invalid camera parameter: {0}")]
    InvalidCamera(String),

    #[error("No map surface attached")]
    NoSurface,

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
