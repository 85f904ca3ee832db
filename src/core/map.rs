use crate::{
    animation::transitions::TransitionId,
    camera::{CameraController, CameraModeKey},
    core::{config::MapJitsuConfig, geo::LngLat, store::MapStore},
    geolocation::{Geolocation, PositionFix},
    layers::{overlay::OverlayManager, route::RouteManager},
    lighting::{LightPreset, LightingController},
    search::orchestrator::SearchBox,
    surface::MapSurface,
    vibe::VibeCheck,
};

/// One map view and every component wired to its store.
///
/// Built with [`MapJitsuBuilder`](crate::core::builder::MapJitsuBuilder).
/// Components share the store handle; the facade only routes calls that
/// involve more than one of them, such as feeding position fixes from
/// geolocation into the camera.
pub struct MapJitsu {
    pub(crate) config: MapJitsuConfig,
    pub(crate) store: MapStore,
    pub(crate) lighting: LightingController,
    pub(crate) camera: CameraController,
    pub(crate) search: Option<SearchBox>,
    pub(crate) routes: RouteManager,
    pub(crate) overlays: OverlayManager,
    pub(crate) vibe: VibeCheck,
    pub(crate) geolocation: Geolocation,
}

impl std::fmt::Debug for MapJitsu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapJitsu")
            .field("store", &self.store)
            .field("camera_mode", &self.camera.active_mode())
            .field("search_enabled", &self.search.is_some())
            .finish()
    }
}

impl MapJitsu {
    pub fn config(&self) -> &MapJitsuConfig {
        &self.config
    }

    pub fn store(&self) -> &MapStore {
        &self.store
    }

    pub fn lighting(&self) -> &LightingController {
        &self.lighting
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// The search box, absent when no place search service is available
    pub fn search(&self) -> Option<&SearchBox> {
        self.search.as_ref()
    }

    pub fn routes(&self) -> &RouteManager {
        &self.routes
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn vibe(&self) -> &VibeCheck {
        &self.vibe
    }

    pub fn geolocation(&self) -> &Geolocation {
        &self.geolocation
    }

    pub fn attach_surface(&self, surface: Box<dyn MapSurface>) {
        self.store.attach_surface(surface);
    }

    pub fn detach_surface(&self) -> Option<Box<dyn MapSurface>> {
        self.store.detach_surface()
    }

    /// Called by the engine once the attached surface has finished loading
    pub fn on_load(&self) {
        log::info!("map surface loaded");
        self.store.set_ready(true);
    }

    /// Pins the light preset, or returns to time-of-day lighting with `None`
    pub fn set_light_preset(&self, preset: Option<LightPreset>) {
        match preset {
            Some(preset) => self.store.set_light_preset(preset),
            None => self.store.clear_light_override(),
        }
    }

    pub fn set_camera_mode(&mut self, key: CameraModeKey) -> Option<TransitionId> {
        self.camera.set_mode(key)
    }

    pub fn fly_to(&self, coordinates: LngLat, zoom: Option<f64>) -> Option<TransitionId> {
        self.store.fly_to(coordinates, zoom)
    }

    /// Reports the end of an engine animation; false for a superseded one
    pub fn complete_transition(&self, id: TransitionId) -> bool {
        self.store.complete_transition(id)
    }

    pub fn start_tracking(&mut self) {
        self.geolocation.start_tracking();
    }

    pub fn stop_tracking(&mut self) {
        self.geolocation.stop_tracking();
    }

    /// Records a position fix and lets a follow-user camera mode recenter on it
    pub fn on_position_fix(&mut self, fix: PositionFix) -> Option<TransitionId> {
        let position = self.geolocation.on_fix(fix)?;
        self.camera.on_position(position)
    }

    pub fn on_position_error(&mut self, message: impl Into<String>) {
        self.geolocation.on_error(message);
    }
}
