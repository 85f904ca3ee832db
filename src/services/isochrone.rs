//! Client for the isochrone proxy (`GET /api/map/isochrone`)

use super::{
    directions::Profile,
    http::{endpoint, read_json, HTTP_CLIENT},
};
use crate::{
    core::{constants::DEFAULT_CONTOURS_MINUTES, geo::LngLat},
    data::geojson::GeoJson,
    traits::IsochroneService,
    MapError, Result,
};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRequest {
    pub center: LngLat,
    pub contours_minutes: Vec<u32>,
    pub profile: Profile,
}

impl IsochroneRequest {
    /// 5/10/15 minute walking contours around `center`
    pub fn new(center: LngLat) -> Self {
        Self {
            center,
            contours_minutes: DEFAULT_CONTOURS_MINUTES.to_vec(),
            profile: Profile::Walking,
        }
    }

    pub fn with_contours(mut self, minutes: Vec<u32>) -> Self {
        self.contours_minutes = minutes;
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Query string pairs in the order the proxy documents them
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>> {
        if !self.center.lng.is_finite() || !self.center.lat.is_finite() {
            return Err(MapError::Validation {
                details: vec!["lng/lat: expected finite numbers".to_string()],
            });
        }
        if self.contours_minutes.is_empty() {
            return Err(MapError::Validation {
                details: vec!["contours_minutes: at least one contour is required".to_string()],
            });
        }

        let contours = self
            .contours_minutes
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Ok(vec![
            ("lng", self.center.lng.to_string()),
            ("lat", self.center.lat.to_string()),
            ("contours_minutes", contours),
            ("profile", self.profile.as_str().to_string()),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct ProxyIsochrone {
    base_url: String,
}

impl ProxyIsochrone {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl IsochroneService for ProxyIsochrone {
    async fn isochrone(&self, request: &IsochroneRequest) -> Result<GeoJson> {
        let pairs = request.query_pairs()?;
        let url = endpoint(&self.base_url, "/api/map/isochrone")?;
        log::debug!("requesting isochrone around {}", request.center);

        let response = HTTP_CLIENT.get(url).query(&pairs).send().await?;
        read_json(response).await
    }
}
