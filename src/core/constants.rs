//! Core constants taken from the MapJitsu web client and Mapbox Standard style conventions.
//! Keeping them in a single place makes it easier to tweak app-wide magic numbers.

use crate::core::geo::LngLat;

/// Initial map center (San Francisco).
pub const DEFAULT_CENTER: LngLat = LngLat {
    lng: -122.4194,
    lat: 37.7749,
};

/// Initial zoom, pitch and bearing of a freshly created view.
pub const DEFAULT_ZOOM: f64 = 14.0;
pub const DEFAULT_PITCH: f64 = 45.0;
pub const DEFAULT_BEARING: f64 = -17.6;

/// Zoom range accepted by the map engine.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Pitch range accepted by the map engine, in degrees.
pub const MIN_PITCH: f64 = 0.0;
pub const MAX_PITCH: f64 = 85.0;

/// Style the surface is expected to load.
pub const STYLE_URL: &str = "mapbox://styles/mapbox/standard";

/// Style import and configuration key holding the light preset.
pub const BASEMAP_IMPORT: &str = "basemap";
pub const LIGHT_PRESET_PROPERTY: &str = "lightPreset";

/// Duration of a camera mode transition.
pub const CAMERA_TRANSITION_MS: u64 = 1000;

/// Delay between the last keystroke and the place search request.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Maximum number of place search results.
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Place categories the search is scoped to.
pub const SEARCH_PLACE_TYPES: [&str; 4] = ["poi", "address", "neighborhood", "place"];

/// Zoom used when flying to a chosen search result.
pub const SEARCH_SELECT_ZOOM: f64 = 16.0;

/// Contours requested from the isochrone service, in minutes.
pub const DEFAULT_CONTOURS_MINUTES: [u32; 3] = [5, 10, 15];
