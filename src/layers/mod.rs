//! Data overlays drawn on the map surface

pub mod overlay;
pub mod route;
pub mod style;

pub use overlay::{Overlay, OverlayManager};
pub use route::{RouteData, RouteManager, RouteState, RouteStep};
pub use style::{LayerKind, LayerSpec};
