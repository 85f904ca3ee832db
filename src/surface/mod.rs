//! Capability interface to the map engine
//!
//! The store owns exactly one [`MapSurface`] per view. Components never keep
//! their own reference to it; they issue commands through
//! [`MapStore::with_surface`](crate::core::store::MapStore::with_surface).

pub mod memory;

use crate::{
    animation::transitions::CameraTransition, data::geojson::GeoJson, layers::style::LayerSpec,
    Result,
};
use serde_json::Value;

/// The operations this crate needs from a map engine.
///
/// Implementations are expected to report engine failures (style not loaded,
/// unknown ids, a source still referenced by a layer) as errors rather than
/// panicking; callers decide whether to swallow or propagate them.
pub trait MapSurface: Send {
    /// Animated flight to the transition's target
    fn fly_to(&mut self, transition: &CameraTransition) -> Result<()>;

    /// Eased camera change to the transition's target
    fn ease_to(&mut self, transition: &CameraTransition) -> Result<()>;

    /// Sets a configuration property on a style import
    fn set_config_property(&mut self, import_id: &str, key: &str, value: Value) -> Result<()>;

    fn has_source(&self, id: &str) -> bool;

    fn add_source(&mut self, id: &str, data: GeoJson) -> Result<()>;

    /// Replaces the data of an existing GeoJSON source in place
    fn set_source_data(&mut self, id: &str, data: GeoJson) -> Result<()>;

    fn remove_source(&mut self, id: &str) -> Result<()>;

    fn has_layer(&self, id: &str) -> bool;

    fn add_layer(&mut self, layer: LayerSpec) -> Result<()>;

    fn remove_layer(&mut self, id: &str) -> Result<()>;
}
