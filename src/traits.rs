//! Shared trait abstractions for the remote services
//!
//! Orchestrators depend on these traits rather than on concrete HTTP
//! clients, so tests and headless hosts can substitute their own.

use crate::{
    data::geojson::GeoJson,
    search::{PlaceQuery, SearchResult},
    services::{
        directions::{DirectionsRequest, DirectionsResponse},
        isochrone::IsochroneRequest,
        vibe::{VibeCheckRequest, VibeCheckResult},
    },
    Result,
};
use async_trait::async_trait;

/// Free-text place search
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Ranked results for the query, best match first
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<SearchResult>>;
}

/// Route between two points
#[async_trait]
pub trait DirectionsService: Send + Sync {
    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse>;
}

/// Reachability contours around a point
#[async_trait]
pub trait IsochroneService: Send + Sync {
    /// A feature collection of contour polygons, each tagged with its `contour` minutes
    async fn isochrone(&self, request: &IsochroneRequest) -> Result<GeoJson>;
}

/// Conversational location summary
#[async_trait]
pub trait VibeCheckService: Send + Sync {
    async fn vibe_check(&self, request: &VibeCheckRequest) -> Result<VibeCheckResult>;
}
