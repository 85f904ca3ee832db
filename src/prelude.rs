//! Prelude module for common mapjitsu types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapjitsu::prelude::*;`

pub use crate::core::{
    builder::MapJitsuBuilder,
    config::{CameraConfig, IsochroneConfig, MapJitsuConfig, SearchConfig, ServiceEndpoints},
    geo::LngLat,
    map::MapJitsu,
    store::{ListenerId, MapStore, StoreContext, StoreEvent, ViewState},
};

pub use crate::animation::transitions::{
    CameraTransition, TransitionId, TransitionKind, TransitionState,
};

pub use crate::camera::{CameraController, CameraMode, CameraModeKey};

pub use crate::lighting::{resolve_preset, Clock, FixedClock, LightPreset, LightingController, SystemClock};

pub use crate::layers::{
    overlay::{Overlay, OverlayManager},
    route::{RouteData, RouteManager, RouteState, RouteStep},
    style::{LayerKind, LayerSpec},
};

pub use crate::search::{orchestrator::SearchBox, PlaceQuery, SearchResult, SearchState};

pub use crate::services::{
    directions::{DirectionsRequest, DirectionsResponse, Profile},
    isochrone::IsochroneRequest,
    vibe::{TimeContext, VibeCheckRequest, VibeCheckResult},
};

pub use crate::traits::{DirectionsService, IsochroneService, PlaceSearch, VibeCheckService};

pub use crate::surface::{memory::InMemorySurface, MapSurface};

pub use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};

pub use crate::geolocation::{Geolocation, GeolocationState, PositionFix};

pub use crate::vibe::VibeCheck;

pub use crate::runtime::{spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
