//! Client for the directions proxy (`POST /api/map/directions`)

use super::http::{endpoint, read_json, HTTP_CLIENT};
use crate::{
    core::geo::LngLat, data::geojson::GeoJsonGeometry, traits::DirectionsService, MapError,
    Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Travel mode understood by the directions and isochrone services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Driving,
    Walking,
    Cycling,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::Driving
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsRequest {
    pub origin: LngLat,
    pub destination: LngLat,
    pub profile: Profile,
}

impl DirectionsRequest {
    pub fn new(origin: LngLat, destination: LngLat) -> Self {
        Self {
            origin,
            destination,
            profile: Profile::default(),
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Rejects what the proxy would reject, before a request is sent
    pub fn validate(&self) -> Result<()> {
        let mut details = Vec::new();
        for (name, point) in [("origin", &self.origin), ("destination", &self.destination)] {
            if !point.lng.is_finite() {
                details.push(format!("{name}.lng: expected a finite number"));
            }
            if !point.lat.is_finite() {
                details.push(format!("{name}.lat: expected a finite number"));
            }
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(MapError::Validation { details })
        }
    }
}

/// Provider-shaped directions response; only the fields this crate reads
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: GeoJsonGeometry,
    /// Seconds
    pub duration: f64,
    /// Meters
    pub distance: f64,
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<LegStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegStep {
    pub maneuver: Maneuver,
    pub distance: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Maneuver {
    #[serde(default)]
    pub instruction: String,
}

/// Talks to the MapJitsu directions proxy, which holds the provider secret
#[derive(Debug, Clone)]
pub struct ProxyDirections {
    base_url: String,
}

impl ProxyDirections {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DirectionsService for ProxyDirections {
    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
        request.validate()?;
        let url = endpoint(&self.base_url, "/api/map/directions")?;
        log::debug!(
            "requesting {} route {} -> {}",
            request.profile.as_str(),
            request.origin,
            request.destination
        );

        let response = HTTP_CLIENT.post(url).json(request).send().await?;
        read_json(response).await
    }
}
