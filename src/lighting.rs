//! Time-of-day lighting
//!
//! [`resolve_preset`] maps a wall-clock hour to one of four presets. The
//! [`LightingController`] listens to the store and pushes the resolved
//! preset into the surface's `basemap.lightPreset` configuration whenever
//! the surface or the explicit preset changes.

use crate::{
    core::{
        constants::{BASEMAP_IMPORT, LIGHT_PRESET_PROPERTY},
        store::{ListenerId, MapStore, StoreContext, StoreEvent},
    },
    MapError,
};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightPreset {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl LightPreset {
    pub const ALL: [LightPreset; 4] = [Self::Dawn, Self::Day, Self::Dusk, Self::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dawn => "dawn",
            Self::Day => "day",
            Self::Dusk => "dusk",
            Self::Night => "night",
        }
    }
}

impl std::fmt::Display for LightPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LightPreset {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MapError::ParseError(format!("unknown light preset: {s}")))
    }
}

/// Resolves the preset for `hour` (0..=23). An override always wins.
///
/// Bands are half-open: [5, 8) dawn, [8, 17) day, [17, 20) dusk, night otherwise.
pub fn resolve_preset(hour: u32, override_preset: Option<LightPreset>) -> LightPreset {
    if let Some(preset) = override_preset {
        return preset;
    }
    match hour {
        5..=7 => LightPreset::Dawn,
        8..=16 => LightPreset::Day,
        17..=19 => LightPreset::Dusk,
        _ => LightPreset::Night,
    }
}

/// Source of the local wall-clock hour
pub trait Clock: Send + Sync {
    fn local_hour(&self) -> u32;
}

/// Local time of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        use chrono::Timelike;
        chrono::Local::now().hour()
    }
}

/// Clock pinned to an hour that can be moved by hand
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    hour: Arc<AtomicU32>,
}

impl FixedClock {
    pub fn new(hour: u32) -> Self {
        Self {
            hour: Arc::new(AtomicU32::new(hour % 24)),
        }
    }

    pub fn set_hour(&self, hour: u32) {
        self.hour.store(hour % 24, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.hour.load(Ordering::SeqCst)
    }
}

/// Applies the resolved preset to the store and, if attached, the surface.
///
/// A surface that rejects the property (typically because its style is still
/// loading) is logged and left alone; the next triggering change retries.
fn apply_lighting(ctx: &mut StoreContext<'_>, hour: u32) {
    let preset = resolve_preset(hour, ctx.light_override);
    ctx.set_light_preset(preset);

    let Some(surface) = ctx.surface.as_deref_mut() else {
        return;
    };
    match surface.set_config_property(BASEMAP_IMPORT, LIGHT_PRESET_PROPERTY, preset.as_str().into())
    {
        Ok(()) => log::debug!("light preset set to {}", preset),
        Err(e) => log::debug!("could not set light preset: {}", e),
    }
}

pub struct LightingController {
    store: MapStore,
    clock: Arc<dyn Clock>,
    listener: ListenerId,
}

impl LightingController {
    /// Subscribes to `store` and applies lighting on every surface attach,
    /// ready signal, and preset change.
    pub fn install(store: &MapStore, clock: Arc<dyn Clock>) -> Self {
        let listener_clock = clock.clone();
        let listener = store.subscribe(Box::new(
            move |event: &StoreEvent, ctx: &mut StoreContext<'_>| match event {
                StoreEvent::SurfaceAttached | StoreEvent::Ready | StoreEvent::LightPresetChanged => {
                    apply_lighting(ctx, listener_clock.local_hour())
                }
                StoreEvent::SurfaceDetached | StoreEvent::CameraChanged => {}
            },
        ));

        Self {
            store: store.clone(),
            clock,
            listener,
        }
    }

    /// Stops reacting to store events. Lighting already applied stays.
    pub fn uninstall(self) {
        self.store.unsubscribe(self.listener);
    }

    /// Re-resolves against the current hour, e.g. from a periodic timer
    pub fn refresh(&self) {
        let hour = self.clock.local_hour();
        self.store.with_context(|ctx| apply_lighting(ctx, hour));
    }

    /// The preset lighting would resolve to right now
    pub fn current(&self) -> LightPreset {
        resolve_preset(self.clock.local_hour(), self.store.light_override())
    }
}
