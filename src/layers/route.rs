//! Route fetching and the route line overlay

use super::overlay::{remove_overlay, upsert_overlay, Overlay};
use crate::{
    core::{geo::LngLat, store::MapStore},
    data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    services::directions::{DirectionsRequest, DirectionsRoute, Profile},
    traits::DirectionsService,
    MapError, Result,
};
use geo_types::LineString;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Message shown when a route request fails for any reason
pub const ROUTE_FETCH_ERROR: &str = "Failed to fetch route";

#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    pub instruction: String,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteData {
    pub geometry: LineString<f64>,
    pub duration_seconds: f64,
    pub distance_meters: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteData {
    /// Extracts the line, totals, and first-leg steps of a provider route
    pub fn from_route(route: &DirectionsRoute) -> Result<Self> {
        let geometry = match &route.geometry {
            GeoJsonGeometry::LineString { coordinates } => LineString::from(coordinates.clone()),
            other => {
                return Err(MapError::ParseError(format!(
                    "route geometry must be a LineString, got {other:?}"
                )))
            }
        };

        let steps = route
            .legs
            .first()
            .map(|leg| {
                leg.steps
                    .iter()
                    .map(|step| RouteStep {
                        instruction: step.maneuver.instruction.clone(),
                        distance: step.distance,
                        duration: step.duration,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            geometry,
            duration_seconds: route.duration,
            distance_meters: route.distance,
            steps,
        })
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// The line as a single GeoJSON feature, the shape the route source holds
    pub fn to_feature(&self) -> GeoJson {
        GeoJson::Feature(GeoJsonFeature::new(GeoJsonGeometry::from(&self.geometry)))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    pub route: Option<RouteData>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct RouteManager {
    store: MapStore,
    service: Arc<dyn DirectionsService>,
    state: Arc<Mutex<RouteState>>,
}

impl std::fmt::Debug for RouteManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteManager")
            .field("state", &*self.lock())
            .finish()
    }
}

impl RouteManager {
    pub fn new(store: MapStore, service: Arc<dyn DirectionsService>) -> Self {
        Self {
            store,
            service,
            state: Arc::new(Mutex::new(RouteState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RouteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> RouteState {
        self.lock().clone()
    }

    pub fn route(&self) -> Option<RouteData> {
        self.lock().route.clone()
    }

    /// Driving route from `origin` to `destination`
    pub async fn fetch_route(&self, origin: LngLat, destination: LngLat) -> Result<Option<RouteData>> {
        self.fetch_route_with_profile(origin, destination, Profile::Driving)
            .await
    }

    /// Fetches a route and draws it.
    ///
    /// Does nothing without a surface. A response with no routes leaves the
    /// previous route in place and reports no error. On failure the error
    /// message is set and the layers are left as they were.
    pub async fn fetch_route_with_profile(
        &self,
        origin: LngLat,
        destination: LngLat,
        profile: Profile,
    ) -> Result<Option<RouteData>> {
        if !self.store.has_surface() {
            log::debug!("no surface attached, skipping route request");
            return Ok(None);
        }

        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }

        let request = DirectionsRequest::new(origin, destination).with_profile(profile);
        let outcome = self.request(&request).await;

        let mut state = self.lock();
        state.loading = false;
        match outcome {
            Ok(Some(route)) => {
                log::info!(
                    "route {} -> {}: {:.1} km, {:.0} min, {} steps",
                    origin,
                    destination,
                    route.distance_km(),
                    route.duration_minutes(),
                    route.steps.len()
                );
                state.route = Some(route.clone());
                Ok(Some(route))
            }
            Ok(None) => {
                log::debug!("directions returned no routes for {} -> {}", origin, destination);
                Ok(None)
            }
            Err(e) => {
                log::error!("route fetch error: {}", e);
                state.error = Some(ROUTE_FETCH_ERROR.to_string());
                Err(e)
            }
        }
    }

    async fn request(&self, request: &DirectionsRequest) -> Result<Option<RouteData>> {
        let response = self.service.directions(request).await?;
        let Some(first) = response.routes.first() else {
            return Ok(None);
        };

        let route = RouteData::from_route(first)?;
        let feature = GeoJson::Feature(GeoJsonFeature::new(first.geometry.clone()));
        self.store
            .with_surface(|surface| upsert_overlay(surface, Overlay::Route, feature))
            .ok_or(MapError::NoSurface)??;
        Ok(Some(route))
    }

    /// Removes the route line and forgets the route. Safe to call repeatedly.
    pub fn clear_route(&self) {
        if let Some(Err(e)) = self
            .store
            .with_surface(|surface| remove_overlay(surface, Overlay::Route))
        {
            log::warn!("failed to remove route overlay: {}", e);
        }
        self.lock().route = None;
    }
}
