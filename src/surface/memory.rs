//! Engine-free [`MapSurface`] that records every command.
//!
//! Used for headless operation and as the substitute engine in tests. It
//! enforces the same rules the real engine does: ids are unique, a layer
//! needs an existing source, a source cannot be removed while a layer still
//! references it, and configuration properties cannot be set before the
//! style has loaded.

use super::MapSurface;
use crate::{
    animation::transitions::CameraTransition, data::geojson::GeoJson, layers::style::LayerSpec,
    prelude::HashMap, MapError, Result,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct SurfaceRecord {
    style_loaded: bool,
    sources: HashMap<String, GeoJson>,
    /// Layers in draw order
    layers: Vec<LayerSpec>,
    config: HashMap<(String, String), Value>,
    transitions: Vec<CameraTransition>,
}

/// Cloneable handle; clones share the same recorded state so a test can keep
/// one clone while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemorySurface {
    inner: Arc<Mutex<SurfaceRecord>>,
}

impl InMemorySurface {
    /// A surface whose style has finished loading
    pub fn new() -> Self {
        let surface = Self::default();
        surface.set_style_loaded(true);
        surface
    }

    /// A surface still waiting on its style; configuration calls fail until
    /// [`set_style_loaded`](Self::set_style_loaded) is called
    pub fn loading() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceRecord> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_style_loaded(&self, loaded: bool) {
        self.lock().style_loaded = loaded;
    }

    pub fn source_data(&self, id: &str) -> Option<GeoJson> {
        self.lock().sources.get(id).cloned()
    }

    pub fn layer(&self, id: &str) -> Option<LayerSpec> {
        self.lock().layers.iter().find(|l| l.id == id).cloned()
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.lock().layers.iter().map(|l| l.id.clone()).collect()
    }

    pub fn source_count(&self) -> usize {
        self.lock().sources.len()
    }

    pub fn layer_count(&self) -> usize {
        self.lock().layers.len()
    }

    pub fn config_property(&self, import_id: &str, key: &str) -> Option<Value> {
        self.lock()
            .config
            .get(&(import_id.to_string(), key.to_string()))
            .cloned()
    }

    /// Every camera command received, oldest first
    pub fn transitions(&self) -> Vec<CameraTransition> {
        self.lock().transitions.clone()
    }

    pub fn last_transition(&self) -> Option<CameraTransition> {
        self.lock().transitions.last().cloned()
    }
}

impl MapSurface for InMemorySurface {
    fn fly_to(&mut self, transition: &CameraTransition) -> Result<()> {
        self.lock().transitions.push(transition.clone());
        Ok(())
    }

    fn ease_to(&mut self, transition: &CameraTransition) -> Result<()> {
        self.lock().transitions.push(transition.clone());
        Ok(())
    }

    fn set_config_property(&mut self, import_id: &str, key: &str, value: Value) -> Result<()> {
        let mut record = self.lock();
        if !record.style_loaded {
            return Err(MapError::Surface("style is not done loading".into()));
        }
        record
            .config
            .insert((import_id.to_string(), key.to_string()), value);
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        self.lock().sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, data: GeoJson) -> Result<()> {
        let mut record = self.lock();
        if record.sources.contains_key(id) {
            return Err(MapError::Surface(format!("source \"{id}\" already exists")));
        }
        record.sources.insert(id.to_string(), data);
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: GeoJson) -> Result<()> {
        let mut record = self.lock();
        match record.sources.get_mut(id) {
            Some(existing) => {
                *existing = data;
                Ok(())
            }
            None => Err(MapError::Surface(format!("source \"{id}\" does not exist"))),
        }
    }

    fn remove_source(&mut self, id: &str) -> Result<()> {
        let mut record = self.lock();
        if let Some(layer) = record.layers.iter().find(|l| l.source == id) {
            return Err(MapError::Surface(format!(
                "source \"{id}\" cannot be removed while layer \"{}\" is using it",
                layer.id
            )));
        }
        record
            .sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MapError::Surface(format!("source \"{id}\" does not exist")))
    }

    fn has_layer(&self, id: &str) -> bool {
        self.lock().layers.iter().any(|l| l.id == id)
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<()> {
        let mut record = self.lock();
        if record.layers.iter().any(|l| l.id == layer.id) {
            return Err(MapError::Surface(format!(
                "layer \"{}\" already exists",
                layer.id
            )));
        }
        if !record.sources.contains_key(&layer.source) {
            return Err(MapError::Surface(format!(
                "layer \"{}\" references missing source \"{}\"",
                layer.id, layer.source
            )));
        }
        record.layers.push(layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<()> {
        let mut record = self.lock();
        let before = record.layers.len();
        record.layers.retain(|l| l.id != id);
        if record.layers.len() == before {
            return Err(MapError::Surface(format!("layer \"{id}\" does not exist")));
        }
        Ok(())
    }
}
