//! Camera transition commands and the generation counter that tracks them

pub mod transitions;

pub use transitions::{CameraTransition, TransitionId, TransitionKind, TransitionState, TransitionTracker};
