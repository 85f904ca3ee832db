//! Map builder for fluent configuration
//!
//! [`MapJitsuBuilder`] wires one store to every component. Services default
//! to the HTTP clients pointed at the configured endpoints; any of them can
//! be replaced, which is how tests and headless hosts substitute fakes.

use crate::{
    camera::CameraController,
    core::{
        config::MapJitsuConfig,
        map::MapJitsu,
        store::{MapStore, ViewState},
    },
    geolocation::Geolocation,
    layers::{overlay::OverlayManager, route::RouteManager},
    lighting::{Clock, LightingController, SystemClock},
    search::orchestrator::SearchBox,
    services::{MapboxGeocoder, ProxyDirections, ProxyIsochrone, ProxyVibeCheck},
    surface::MapSurface,
    traits::{DirectionsService, IsochroneService, PlaceSearch, VibeCheckService},
    vibe::VibeCheck,
    Result,
};
use std::sync::Arc;

#[derive(Default)]
pub struct MapJitsuBuilder {
    config: Option<MapJitsuConfig>,
    initial_state: Option<ViewState>,
    surface: Option<Box<dyn MapSurface>>,
    clock: Option<Arc<dyn Clock>>,
    place_search: Option<Arc<dyn PlaceSearch>>,
    directions: Option<Arc<dyn DirectionsService>>,
    isochrone: Option<Arc<dyn IsochroneService>>,
    vibe_check: Option<Arc<dyn VibeCheckService>>,
    geolocation_supported: Option<bool>,
}

impl MapJitsuBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: MapJitsuConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Starting camera and lighting instead of the defaults. Out-of-range
    /// camera values are clamped; non-finite ones fail the build.
    pub fn with_initial_state(mut self, state: ViewState) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Surface to attach once every component is listening
    pub fn with_surface(mut self, surface: Box<dyn MapSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Clock used for time-of-day lighting
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_place_search(mut self, service: Arc<dyn PlaceSearch>) -> Self {
        self.place_search = Some(service);
        self
    }

    pub fn with_directions(mut self, service: Arc<dyn DirectionsService>) -> Self {
        self.directions = Some(service);
        self
    }

    pub fn with_isochrone(mut self, service: Arc<dyn IsochroneService>) -> Self {
        self.isochrone = Some(service);
        self
    }

    pub fn with_vibe_check(mut self, service: Arc<dyn VibeCheckService>) -> Self {
        self.vibe_check = Some(service);
        self
    }

    /// Whether the host can deliver position fixes
    pub fn with_geolocation(mut self, supported: bool) -> Self {
        self.geolocation_supported = Some(supported);
        self
    }

    pub fn build(self) -> Result<MapJitsu> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let endpoints = &config.endpoints;

        let store = match self.initial_state {
            Some(state) => MapStore::with_state(state)?,
            None => MapStore::new(),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let lighting = LightingController::install(&store, clock);

        let place_search = self.place_search.or_else(|| match &endpoints.mapbox_token {
            Some(token) => Some(Arc::new(MapboxGeocoder::new(
                endpoints.geocoding_base_url.clone(),
                token.clone(),
            )) as Arc<dyn PlaceSearch>),
            None => {
                log::warn!("no map token configured, place search is disabled");
                None
            }
        });
        let search = place_search
            .map(|service| SearchBox::new(service, store.clone(), config.search.clone()));

        let directions = self
            .directions
            .unwrap_or_else(|| Arc::new(ProxyDirections::new(endpoints.api_base_url.clone())));
        let isochrone = self
            .isochrone
            .unwrap_or_else(|| Arc::new(ProxyIsochrone::new(endpoints.api_base_url.clone())));
        let vibe_check = self
            .vibe_check
            .unwrap_or_else(|| Arc::new(ProxyVibeCheck::new(endpoints.api_base_url.clone())));

        let camera = CameraController::new(store.clone(), config.camera.transition_duration());
        let routes = RouteManager::new(store.clone(), directions);
        let overlays = OverlayManager::new(store.clone())
            .with_isochrone_service(isochrone, config.isochrone.clone());
        let vibe = VibeCheck::new(store.clone(), vibe_check);
        let geolocation = match self.geolocation_supported {
            Some(false) => Geolocation::unsupported(),
            _ => Geolocation::new(),
        };

        if let Some(surface) = self.surface {
            store.attach_surface(surface);
        }

        log::debug!("map built against {}", endpoints.api_base_url);
        Ok(MapJitsu {
            config,
            store,
            lighting,
            camera,
            search,
            routes,
            overlays,
            vibe,
            geolocation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{config::ServiceEndpoints, geo::LngLat},
        lighting::{FixedClock, LightPreset},
        surface::memory::InMemorySurface,
        MapError,
    };

    #[test]
    fn test_defaults_without_token() {
        let map = MapJitsuBuilder::new()
            .with_clock(Arc::new(FixedClock::new(12)))
            .build()
            .unwrap();
        assert!(map.search().is_none());
        assert!(!map.store().has_surface());
        assert_eq!(map.store().center(), LngLat::new(-122.4194, 37.7749));
    }

    #[test]
    fn test_token_enables_search() {
        let config = MapJitsuConfig {
            endpoints: ServiceEndpoints {
                mapbox_token: Some("pk.test".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let map = MapJitsuBuilder::new().with_config(config).build().unwrap();
        assert!(map.search().is_some());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = MapJitsuConfig::default();
        config.endpoints.api_base_url = "not a url".into();
        assert!(matches!(
            MapJitsuBuilder::new().with_config(config).build(),
            Err(MapError::Config(_))
        ));
    }

    #[test]
    fn test_initial_state_is_validated() {
        let map = MapJitsuBuilder::new()
            .with_initial_state(ViewState {
                zoom: 40.0,
                pitch: -5.0,
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(map.store().zoom(), 22.0);
        assert_eq!(map.store().pitch(), 0.0);

        let broken = MapJitsuBuilder::new()
            .with_initial_state(ViewState {
                bearing: f64::NAN,
                ..Default::default()
            })
            .build();
        assert!(matches!(broken, Err(MapError::InvalidCamera(_))));
    }

    #[test]
    fn test_surface_attached_after_lighting_installed() {
        let surface = InMemorySurface::new();
        let map = MapJitsuBuilder::new()
            .with_clock(Arc::new(FixedClock::new(6)))
            .with_surface(Box::new(surface.clone()))
            .build()
            .unwrap();

        assert!(map.store().has_surface());
        assert_eq!(map.store().light_preset(), LightPreset::Dawn);
        assert_eq!(
            surface.config_property("basemap", "lightPreset"),
            Some("dawn".into())
        );
    }
}
