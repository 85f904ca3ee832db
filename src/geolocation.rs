//! User position tracking
//!
//! The host platform pushes position fixes and errors into a
//! [`Geolocation`] tracker. Accepted fixes are handed back to the caller so
//! they can drive follow-user camera modes.

use crate::{core::geo::LngLat, MapError, Result};
use serde::{Deserialize, Serialize};

pub const UNSUPPORTED_MESSAGE: &str = "Geolocation not supported";

/// One position report from the platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters
    pub accuracy: f64,
    /// Degrees clockwise from north, when the device is moving
    pub heading: Option<f64>,
}

impl PositionFix {
    pub fn position(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeolocationState {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub heading: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Geolocation {
    state: GeolocationState,
    tracking: bool,
    supported: bool,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Geolocation {
    pub fn new() -> Self {
        Self {
            state: GeolocationState::default(),
            tracking: false,
            supported: true,
        }
    }

    /// A tracker for a platform without positioning
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn state(&self) -> &GeolocationState {
        &self.state
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn start_tracking(&mut self) {
        self.tracking = true;
        if !self.supported {
            self.state.error = Some(UNSUPPORTED_MESSAGE.to_string());
            return;
        }
        log::debug!("position tracking started");
    }

    pub fn stop_tracking(&mut self) {
        self.tracking = false;
    }

    /// Records a fix while tracking. Returns the new position, or `None` when
    /// the fix was ignored.
    pub fn on_fix(&mut self, fix: PositionFix) -> Option<LngLat> {
        if !self.tracking || !self.supported {
            return None;
        }
        self.state = GeolocationState {
            latitude: Some(fix.latitude),
            longitude: Some(fix.longitude),
            accuracy: Some(fix.accuracy),
            heading: fix.heading,
            error: None,
        };
        Some(fix.position())
    }

    /// Records a platform error, keeping the last known position
    pub fn on_error(&mut self, message: impl Into<String>) {
        if !self.tracking {
            return;
        }
        let message = message.into();
        log::warn!("geolocation error: {}", message);
        self.state.error = Some(message);
    }

    /// Last known position
    pub fn position(&self) -> Result<LngLat> {
        if !self.supported {
            return Err(MapError::Config(UNSUPPORTED_MESSAGE.to_string()));
        }
        match (self.state.longitude, self.state.latitude) {
            (Some(lng), Some(lat)) => Ok(LngLat::new(lng, lat)),
            _ => Err(MapError::Config("no position fix yet".to_string())),
        }
    }
}
