//! Data overlays on the attached surface
//!
//! Each overlay owns one GeoJSON source and one layer under fixed ids.
//! Adding an overlay that already exists only replaces its data, so repeated
//! updates never duplicate sources or layers.

use super::style::{isochrone_fill_layer, route_line_layer, safety_circle_layer, LayerSpec};
use crate::{
    core::{config::IsochroneConfig, geo::LngLat, store::MapStore},
    data::geojson::GeoJson,
    services::{directions::Profile, isochrone::IsochroneRequest},
    surface::MapSurface,
    traits::IsochroneService,
    MapError, Result,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Route,
    Safety,
    Isochrone,
}

impl Overlay {
    pub const ALL: [Overlay; 3] = [Overlay::Route, Overlay::Safety, Overlay::Isochrone];

    pub fn source_id(&self) -> &'static str {
        match self {
            Overlay::Route => "route",
            Overlay::Safety => "safety-data",
            Overlay::Isochrone => "isochrone-data",
        }
    }

    pub fn layer_id(&self) -> &'static str {
        match self {
            Overlay::Route => "route-line",
            Overlay::Safety => "safety-layer",
            Overlay::Isochrone => "isochrone-layer",
        }
    }

    pub fn layer_spec(&self) -> LayerSpec {
        match self {
            Overlay::Route => route_line_layer(self.layer_id(), self.source_id()),
            Overlay::Safety => safety_circle_layer(self.layer_id(), self.source_id()),
            Overlay::Isochrone => isochrone_fill_layer(self.layer_id(), self.source_id()),
        }
    }
}

/// Creates the overlay's source and layer, or replaces the source data when
/// they already exist
pub fn upsert_overlay(surface: &mut dyn MapSurface, overlay: Overlay, data: GeoJson) -> Result<()> {
    let source_id = overlay.source_id();
    if surface.has_source(source_id) {
        surface.set_source_data(source_id, data)?;
    } else {
        surface.add_source(source_id, data)?;
    }

    if !surface.has_layer(overlay.layer_id()) {
        surface.add_layer(overlay.layer_spec())?;
    }
    Ok(())
}

/// Removes the overlay's layer, then its source. Returns whether anything was removed.
pub fn remove_overlay(surface: &mut dyn MapSurface, overlay: Overlay) -> Result<bool> {
    let mut removed = false;
    if surface.has_layer(overlay.layer_id()) {
        surface.remove_layer(overlay.layer_id())?;
        removed = true;
    }
    if surface.has_source(overlay.source_id()) {
        surface.remove_source(overlay.source_id())?;
        removed = true;
    }
    Ok(removed)
}

/// Safety and isochrone overlays for one store
#[derive(Clone)]
pub struct OverlayManager {
    store: MapStore,
    isochrone: Option<Arc<dyn IsochroneService>>,
    config: IsochroneConfig,
}

impl std::fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayManager")
            .field("has_isochrone_service", &self.isochrone.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl OverlayManager {
    pub fn new(store: MapStore) -> Self {
        Self {
            store,
            isochrone: None,
            config: IsochroneConfig::default(),
        }
    }

    pub fn with_isochrone_service(
        mut self,
        service: Arc<dyn IsochroneService>,
        config: IsochroneConfig,
    ) -> Self {
        self.isochrone = Some(service);
        self.config = config;
        self
    }

    fn upsert(&self, overlay: Overlay, data: GeoJson) -> Result<()> {
        let count = data.feature_count();
        self.store
            .with_surface(|surface| upsert_overlay(surface, overlay, data))
            .ok_or(MapError::NoSurface)??;
        log::debug!("{} overlay now shows {} features", overlay.layer_id(), count);
        Ok(())
    }

    fn remove(&self, overlay: Overlay) -> Result<()> {
        let removed = self
            .store
            .with_surface(|surface| remove_overlay(surface, overlay))
            .transpose()?
            .unwrap_or(false);
        if removed {
            log::debug!("removed {} overlay", overlay.layer_id());
        }
        Ok(())
    }

    /// Shows point features colored by their `safety_score` property
    pub fn add_safety_layer(&self, data: GeoJson) -> Result<()> {
        self.upsert(Overlay::Safety, data)
    }

    pub fn remove_safety_layer(&self) -> Result<()> {
        self.remove(Overlay::Safety)
    }

    /// Shows contour polygons colored by their `contour` property
    pub fn add_isochrone_layer(&self, data: GeoJson) -> Result<()> {
        self.upsert(Overlay::Isochrone, data)
    }

    pub fn remove_isochrone_layer(&self) -> Result<()> {
        self.remove(Overlay::Isochrone)
    }

    /// Fetches reachability contours around `center` and shows them.
    ///
    /// An empty `contours_minutes` uses the configured contours.
    pub async fn fetch_isochrone(
        &self,
        center: LngLat,
        contours_minutes: &[u32],
        profile: Profile,
    ) -> Result<GeoJson> {
        let service = self
            .isochrone
            .as_ref()
            .ok_or_else(|| MapError::Config("no isochrone service configured".to_string()))?;

        let contours = if contours_minutes.is_empty() {
            self.config.contours_minutes.clone()
        } else {
            contours_minutes.to_vec()
        };
        let request = IsochroneRequest::new(center)
            .with_contours(contours)
            .with_profile(profile);

        let data = service.isochrone(&request).await?;
        self.add_isochrone_layer(data.clone())?;
        Ok(data)
    }
}
