//! HTTP clients for the MapJitsu proxies and the Mapbox geocoder

pub mod directions;
pub mod geocoding;
pub(crate) mod http;
pub mod isochrone;
pub mod vibe;

pub use directions::{DirectionsRequest, DirectionsResponse, Profile, ProxyDirections};
pub use geocoding::MapboxGeocoder;
pub use isochrone::{IsochroneRequest, ProxyIsochrone};
pub use vibe::{ProxyVibeCheck, TimeContext, VibeCheckRequest, VibeCheckResult};
