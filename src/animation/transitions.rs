use crate::core::geo::LngLat;
use std::time::Duration;

/// Identifies one animated camera command.
///
/// Generations increase monotonically per store; issuing a new transition
/// supersedes every earlier one, so a completion callback for an older
/// generation is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId {
    pub generation: u64,
}

/// How the engine should animate the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Zoom-out/zoom-in flight arc (used for navigation)
    FlyTo,
    /// Straight interpolation of the camera parameters (used for camera modes)
    EaseTo,
}

/// State of a transition as seen by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Running,
    Completed,
    Superseded,
}

/// A camera command handed to the map surface.
///
/// Parameters left as `None` keep the engine's current value.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTransition {
    pub id: TransitionId,
    pub kind: TransitionKind,
    pub center: Option<LngLat>,
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    pub bearing: Option<f64>,
    /// `None` lets the engine pick its own duration
    pub duration: Option<Duration>,
    /// Animate even when the user prefers reduced motion
    pub essential: bool,
}

impl CameraTransition {
    pub fn fly_to(center: LngLat) -> Self {
        Self {
            id: TransitionId { generation: 0 },
            kind: TransitionKind::FlyTo,
            center: Some(center),
            zoom: None,
            pitch: None,
            bearing: None,
            duration: None,
            essential: true,
        }
    }

    pub fn ease_to() -> Self {
        Self {
            id: TransitionId { generation: 0 },
            kind: TransitionKind::EaseTo,
            center: None,
            zoom: None,
            pitch: None,
            bearing: None,
            duration: None,
            essential: false,
        }
    }

    pub fn with_center(mut self, center: LngLat) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Hands out transition generations and remembers which one is current.
#[derive(Debug, Default)]
pub struct TransitionTracker {
    generation: u64,
    active: Option<TransitionId>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new transition, superseding any running one
    pub fn begin(&mut self) -> TransitionId {
        self.generation += 1;
        let id = TransitionId {
            generation: self.generation,
        };
        if let Some(previous) = self.active.replace(id) {
            log::debug!(
                "transition {} superseded by {}",
                previous.generation,
                id.generation
            );
        }
        id
    }

    /// Marks `id` as finished. Returns false when a newer transition has
    /// since been issued, in which case the completion must be ignored.
    pub fn complete(&mut self, id: TransitionId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn state_of(&self, id: TransitionId) -> TransitionState {
        if self.active == Some(id) {
            TransitionState::Running
        } else if id.generation == self.generation {
            TransitionState::Completed
        } else {
            TransitionState::Superseded
        }
    }

    pub fn active(&self) -> Option<TransitionId> {
        self.active
    }
}
