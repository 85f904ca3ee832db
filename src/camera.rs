//! Named camera modes
//!
//! Selecting a mode eases the surface to the mode's pitch/bearing/zoom and
//! writes the same target into the store immediately. The store therefore
//! always holds the *target* camera, not the animation's current frame.
//! A mode chosen mid-animation simply issues a newer transition; how the
//! engine interrupts the running ease is up to the engine.

use crate::{
    animation::transitions::{CameraTransition, TransitionId},
    core::{geo::LngLat, store::MapStore},
    MapError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Camera parameters of a mode. Reference data, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMode {
    pub pitch: f64,
    pub bearing: f64,
    pub zoom: f64,
    /// Keep the camera centered on the user's position
    pub follow_user: bool,
}

pub const DRIVER: CameraMode = CameraMode {
    pitch: 60.0,
    bearing: 0.0,
    zoom: 17.0,
    follow_user: true,
};

pub const EXPLORER: CameraMode = CameraMode {
    pitch: 45.0,
    bearing: 0.0,
    zoom: 15.0,
    follow_user: false,
};

pub const OVERVIEW: CameraMode = CameraMode {
    pitch: 0.0,
    bearing: 0.0,
    zoom: 12.0,
    follow_user: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraModeKey {
    Driver,
    Explorer,
    Overview,
}

impl CameraModeKey {
    pub const ALL: [CameraModeKey; 3] = [Self::Driver, Self::Explorer, Self::Overview];

    pub fn mode(&self) -> CameraMode {
        match self {
            Self::Driver => DRIVER,
            Self::Explorer => EXPLORER,
            Self::Overview => OVERVIEW,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Explorer => "explorer",
            Self::Overview => "overview",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Driver => "Driver",
            Self::Explorer => "Explorer",
            Self::Overview => "Overview",
        }
    }
}

impl std::str::FromStr for CameraModeKey {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MapError::ParseError(format!("unknown camera mode: {s}")))
    }
}

pub struct CameraController {
    store: MapStore,
    duration: Duration,
    active: Option<CameraModeKey>,
}

impl CameraController {
    pub fn new(store: MapStore, duration: Duration) -> Self {
        Self {
            store,
            duration,
            active: None,
        }
    }

    pub fn active_mode(&self) -> Option<CameraModeKey> {
        self.active
    }

    /// Switches to `key`. Does nothing when no surface is attached.
    pub fn set_mode(&mut self, key: CameraModeKey) -> Option<TransitionId> {
        let mode = key.mode();
        let transition = CameraTransition::ease_to()
            .with_pitch(mode.pitch)
            .with_bearing(mode.bearing)
            .with_zoom(mode.zoom)
            .with_duration(self.duration);

        let id = self.store.ease_to(transition)?;

        if let Err(e) = self.store.set_camera(mode.pitch, mode.bearing, mode.zoom) {
            log::warn!("camera mode {} rejected by store: {}", key.as_str(), e);
        }
        self.active = Some(key);
        log::debug!("camera mode {} (transition {})", key.as_str(), id.generation);
        Some(id)
    }

    /// Feeds a user position. Modes that follow the user recenter on it;
    /// other modes ignore it.
    pub fn on_position(&mut self, position: LngLat) -> Option<TransitionId> {
        let key = self.active?;
        if !key.mode().follow_user {
            return None;
        }

        let transition = CameraTransition::ease_to()
            .with_center(position)
            .with_duration(self.duration);
        let id = self.store.ease_to(transition)?;
        self.store.set_center(position);
        Some(id)
    }
}
