//! The view-state store
//!
//! [`MapStore`] is the single source of truth for one map view: camera,
//! lighting, readiness, and the attached [`MapSurface`]. It is an explicitly
//! constructed handle; clones share state, and each component receives its
//! own clone instead of reaching for a global.

use crate::{
    animation::transitions::{
        CameraTransition, TransitionId, TransitionKind, TransitionState, TransitionTracker,
    },
    core::{
        constants::{
            DEFAULT_BEARING, DEFAULT_CENTER, DEFAULT_PITCH, DEFAULT_ZOOM, MAX_PITCH, MAX_ZOOM,
            MIN_PITCH, MIN_ZOOM,
        },
        geo::LngLat,
    },
    lighting::LightPreset,
    surface::MapSurface,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub light_preset: LightPreset,
    pub ready: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            pitch: DEFAULT_PITCH,
            bearing: DEFAULT_BEARING,
            light_preset: LightPreset::Night,
            ready: false,
        }
    }
}

impl ViewState {
    /// Brings the camera fields into engine ranges. Non-finite values are rejected.
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            zoom: clamp_zoom(self.zoom)?,
            pitch: clamp_pitch(self.pitch)?,
            bearing: normalize_bearing(self.bearing)?,
            ..self
        })
    }
}

/// What changed in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    SurfaceAttached,
    SurfaceDetached,
    /// The surface finished its initial load
    Ready,
    /// The explicit light preset was set or cleared, or a refresh was requested
    LightPresetChanged,
    CameraChanged,
}

/// View of the store handed to listeners and [`MapStore::with_context`].
///
/// The camera fields are read-only here; they change only through the
/// store's setters.
pub struct StoreContext<'a> {
    state: &'a mut ViewState,
    pub light_override: Option<LightPreset>,
    pub surface: Option<&'a mut (dyn MapSurface + 'static)>,
}

impl StoreContext<'_> {
    pub fn state(&self) -> &ViewState {
        self.state
    }

    /// Records the preset lighting resolved to
    pub fn set_light_preset(&mut self, preset: LightPreset) {
        self.state.light_preset = preset;
    }
}

pub type StoreListener = Box<dyn FnMut(&StoreEvent, &mut StoreContext<'_>) + Send>;

/// Returned by [`MapStore::subscribe`]; pass to [`MapStore::unsubscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct StoreInner {
    state: ViewState,
    light_override: Option<LightPreset>,
    surface: Option<Box<dyn MapSurface>>,
    listeners: Vec<(ListenerId, StoreListener)>,
    next_listener: u64,
    transitions: TransitionTracker,
}

impl StoreInner {
    fn emit(&mut self, event: StoreEvent) {
        let StoreInner {
            state,
            light_override,
            surface,
            listeners,
            ..
        } = self;
        for (_, listener) in listeners.iter_mut() {
            let mut ctx = StoreContext {
                state: &mut *state,
                light_override: *light_override,
                surface: surface.as_deref_mut(),
            };
            listener(&event, &mut ctx);
        }
    }

    /// Issues an animated command, tagging it with a fresh generation
    fn animate(&mut self, transition: CameraTransition) -> Option<TransitionId> {
        let surface = self.surface.as_deref_mut()?;
        let id = self.transitions.begin();
        let transition = CameraTransition { id, ..transition };
        let issued = match transition.kind {
            TransitionKind::FlyTo => surface.fly_to(&transition),
            TransitionKind::EaseTo => surface.ease_to(&transition),
        };
        if let Err(e) = issued {
            log::warn!("camera transition {} was rejected: {}", id.generation, e);
        }
        Some(id)
    }
}

#[derive(Clone)]
pub struct MapStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl std::fmt::Debug for MapStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("MapStore")
            .field("state", &inner.state)
            .field("light_override", &inner.light_override)
            .field("has_surface", &inner.surface.is_some())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl Default for MapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MapStore {
    pub fn new() -> Self {
        Self::from_valid_state(ViewState::default())
    }

    /// A store starting from `state`, with zoom and pitch clamped and the
    /// bearing normalized. Fails on non-finite camera values.
    pub fn with_state(state: ViewState) -> Result<Self> {
        Ok(Self::from_valid_state(state.validated()?))
    }

    fn from_valid_state(state: ViewState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state,
                light_override: None,
                surface: None,
                listeners: Vec::new(),
                next_listener: 0,
                transitions: TransitionTracker::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a listener. Listeners run while the store is locked and must
    /// act through the context they are given, never through the store handle.
    pub fn subscribe(&self, listener: StoreListener) -> ListenerId {
        let mut inner = self.lock();
        inner.next_listener += 1;
        let id = ListenerId(inner.next_listener);
        inner.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().state.clone()
    }

    pub fn center(&self) -> LngLat {
        self.lock().state.center
    }

    pub fn zoom(&self) -> f64 {
        self.lock().state.zoom
    }

    pub fn pitch(&self) -> f64 {
        self.lock().state.pitch
    }

    pub fn bearing(&self) -> f64 {
        self.lock().state.bearing
    }

    pub fn light_preset(&self) -> LightPreset {
        self.lock().state.light_preset
    }

    pub fn light_override(&self) -> Option<LightPreset> {
        self.lock().light_override
    }

    pub fn is_ready(&self) -> bool {
        self.lock().state.ready
    }

    pub fn has_surface(&self) -> bool {
        self.lock().surface.is_some()
    }

    /// Coordinates are stored as received; no range check is applied.
    pub fn set_center(&self, center: LngLat) {
        let mut inner = self.lock();
        inner.state.center = center;
        inner.emit(StoreEvent::CameraChanged);
    }

    pub fn set_zoom(&self, zoom: f64) -> Result<()> {
        let zoom = clamp_zoom(zoom)?;
        let mut inner = self.lock();
        inner.state.zoom = zoom;
        inner.emit(StoreEvent::CameraChanged);
        Ok(())
    }

    pub fn set_pitch(&self, pitch: f64) -> Result<()> {
        let pitch = clamp_pitch(pitch)?;
        let mut inner = self.lock();
        inner.state.pitch = pitch;
        inner.emit(StoreEvent::CameraChanged);
        Ok(())
    }

    pub fn set_bearing(&self, bearing: f64) -> Result<()> {
        let bearing = normalize_bearing(bearing)?;
        let mut inner = self.lock();
        inner.state.bearing = bearing;
        inner.emit(StoreEvent::CameraChanged);
        Ok(())
    }

    /// Sets pitch, bearing and zoom together with a single change event.
    /// Nothing is written unless all three values are acceptable.
    pub fn set_camera(&self, pitch: f64, bearing: f64, zoom: f64) -> Result<()> {
        let pitch = clamp_pitch(pitch)?;
        let bearing = normalize_bearing(bearing)?;
        let zoom = clamp_zoom(zoom)?;
        let mut inner = self.lock();
        inner.state.pitch = pitch;
        inner.state.bearing = bearing;
        inner.state.zoom = zoom;
        inner.emit(StoreEvent::CameraChanged);
        Ok(())
    }

    /// Pins the light preset, overriding the time-of-day resolution
    pub fn set_light_preset(&self, preset: LightPreset) {
        let mut inner = self.lock();
        inner.light_override = Some(preset);
        inner.state.light_preset = preset;
        inner.emit(StoreEvent::LightPresetChanged);
    }

    /// Returns lighting to time-of-day resolution
    pub fn clear_light_override(&self) {
        let mut inner = self.lock();
        inner.light_override = None;
        inner.emit(StoreEvent::LightPresetChanged);
    }

    pub fn set_ready(&self, ready: bool) {
        let mut inner = self.lock();
        inner.state.ready = ready;
        if ready {
            inner.emit(StoreEvent::Ready);
        }
    }

    /// Attaches the view's map surface, replacing (and dropping) any previous one.
    /// The view is not ready until [`set_ready`](Self::set_ready) is called.
    pub fn attach_surface(&self, surface: Box<dyn MapSurface>) {
        let mut inner = self.lock();
        if inner.surface.replace(surface).is_some() {
            log::debug!("replacing attached map surface");
        }
        inner.state.ready = false;
        inner.emit(StoreEvent::SurfaceAttached);
    }

    /// Detaches and returns the surface, e.g. when the view is torn down
    pub fn detach_surface(&self) -> Option<Box<dyn MapSurface>> {
        let mut inner = self.lock();
        let surface = inner.surface.take();
        inner.state.ready = false;
        if surface.is_some() {
            inner.emit(StoreEvent::SurfaceDetached);
        }
        surface
    }

    /// Runs `f` against the attached surface, if any
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut dyn MapSurface) -> R) -> Option<R> {
        let mut inner = self.lock();
        inner.surface.as_deref_mut().map(|surface| f(surface))
    }

    /// Runs `f` with the store context: read access to the state, the
    /// lighting field, and the surface
    pub fn with_context<R>(&self, f: impl FnOnce(&mut StoreContext<'_>) -> R) -> R {
        let mut inner = self.lock();
        let StoreInner {
            state,
            light_override,
            surface,
            ..
        } = &mut *inner;
        let mut ctx = StoreContext {
            state,
            light_override: *light_override,
            surface: surface.as_deref_mut(),
        };
        f(&mut ctx)
    }

    /// Re-sends `event` to every listener without changing any state
    pub fn notify(&self, event: StoreEvent) {
        self.lock().emit(event);
    }

    /// Moves the view to `coordinates`, keeping the current zoom when none is given.
    ///
    /// The state is updated whether or not a surface is attached, so the view
    /// stays consistent for a surface attached later. Returns the transition
    /// id when a flight was issued.
    pub fn fly_to(&self, coordinates: LngLat, zoom: Option<f64>) -> Option<TransitionId> {
        let zoom = match zoom.map(clamp_zoom).transpose() {
            Ok(zoom) => zoom,
            Err(e) => {
                log::warn!("ignoring fly_to zoom: {}", e);
                None
            }
        };

        let mut inner = self.lock();
        let target_zoom = zoom.unwrap_or(inner.state.zoom);
        let id = inner.animate(CameraTransition::fly_to(coordinates).with_zoom(target_zoom));

        inner.state.center = coordinates;
        inner.state.zoom = target_zoom;
        inner.emit(StoreEvent::CameraChanged);
        id
    }

    /// Issues an eased camera change without touching the stored state.
    /// Returns `None` when no surface is attached.
    pub fn ease_to(&self, transition: CameraTransition) -> Option<TransitionId> {
        self.lock().animate(transition)
    }

    /// Called by the engine when an animation ends. Returns false for a
    /// superseded generation, whose completion must be ignored.
    pub fn complete_transition(&self, id: TransitionId) -> bool {
        self.lock().transitions.complete(id)
    }

    pub fn transition_state(&self, id: TransitionId) -> TransitionState {
        self.lock().transitions.state_of(id)
    }

    pub fn active_transition(&self) -> Option<TransitionId> {
        self.lock().transitions.active()
    }
}

fn finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MapError::InvalidCamera(format!("{name} must be finite, got {value}")))
    }
}

pub(crate) fn clamp_zoom(zoom: f64) -> Result<f64> {
    Ok(finite("zoom", zoom)?.clamp(MIN_ZOOM, MAX_ZOOM))
}

pub(crate) fn clamp_pitch(pitch: f64) -> Result<f64> {
    Ok(finite("pitch", pitch)?.clamp(MIN_PITCH, MAX_PITCH))
}

/// Normalizes to the (-180, 180] range
pub(crate) fn normalize_bearing(bearing: f64) -> Result<f64> {
    let wrapped = finite("bearing", bearing)? % 360.0;
    Ok(if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::memory::InMemorySurface;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults() {
        let store = MapStore::new();
        let state = store.snapshot();
        assert_eq!(state.center, LngLat::new(-122.4194, 37.7749));
        assert_eq!(state.zoom, 14.0);
        assert_eq!(state.pitch, 45.0);
        assert_eq!(state.bearing, -17.6);
        assert_eq!(state.light_preset, LightPreset::Night);
        assert!(!state.ready);
        assert!(!store.has_surface());
    }

    #[test]
    fn test_fly_to_without_surface_still_updates_state() {
        let store = MapStore::new();
        let id = store.fly_to(LngLat::new(2.35, 48.85), Some(12.0));
        assert!(id.is_none());
        assert_eq!(store.center(), LngLat::new(2.35, 48.85));
        assert_eq!(store.zoom(), 12.0);
    }

    #[test]
    fn test_fly_to_issues_flight_and_keeps_zoom() {
        let store = MapStore::new();
        let surface = InMemorySurface::new();
        store.attach_surface(Box::new(surface.clone()));

        let id = store.fly_to(LngLat::new(-73.98, 40.75), None).unwrap();
        let issued = surface.last_transition().unwrap();
        assert_eq!(issued.id, id);
        assert_eq!(issued.kind, TransitionKind::FlyTo);
        assert_eq!(issued.zoom, Some(14.0));
        assert!(issued.essential);
        assert_eq!(store.zoom(), 14.0);
    }

    #[test]
    fn test_out_of_range_center_passes_through() {
        let store = MapStore::new();
        store.set_center(LngLat::new(500.0, -120.0));
        assert_eq!(store.center(), LngLat::new(500.0, -120.0));
    }

    #[test]
    fn test_camera_values_are_clamped_and_checked() {
        let store = MapStore::new();
        store.set_zoom(40.0).unwrap();
        assert_eq!(store.zoom(), MAX_ZOOM);
        store.set_pitch(-5.0).unwrap();
        assert_eq!(store.pitch(), 0.0);
        store.set_bearing(270.0).unwrap();
        assert_eq!(store.bearing(), -90.0);
        store.set_bearing(-180.0).unwrap();
        assert_eq!(store.bearing(), 180.0);

        assert!(matches!(store.set_zoom(f64::NAN), Err(MapError::InvalidCamera(_))));
        assert!(store.set_camera(10.0, f64::INFINITY, 3.0).is_err());
        // rejected composite update leaves state alone
        assert_eq!(store.pitch(), 0.0);
        assert_eq!(store.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_ready_resets_on_attach_and_detach() {
        let store = MapStore::new();
        store.attach_surface(Box::new(InMemorySurface::new()));
        store.set_ready(true);
        assert!(store.is_ready());

        assert!(store.detach_surface().is_some());
        assert!(!store.is_ready());
        assert!(store.detach_surface().is_none());
    }

    #[test]
    fn test_listeners_receive_events() {
        let store = MapStore::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        store.subscribe(Box::new(move |event: &StoreEvent, ctx: &mut StoreContext<'_>| {
            if *event == StoreEvent::SurfaceAttached {
                assert!(ctx.surface.is_some());
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }));

        store.attach_surface(Box::new(InMemorySurface::new()));
        store.set_zoom(3.0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_initial_state_is_brought_into_range() {
        let store = MapStore::with_state(ViewState {
            zoom: 30.0,
            pitch: 400.0,
            bearing: 900.0,
            ..ViewState::default()
        })
        .unwrap();
        assert_eq!(store.zoom(), MAX_ZOOM);
        assert_eq!(store.pitch(), MAX_PITCH);
        assert_eq!(store.bearing(), 180.0);

        let rejected = MapStore::with_state(ViewState {
            zoom: f64::NAN,
            ..ViewState::default()
        });
        assert!(matches!(rejected, Err(MapError::InvalidCamera(_))));
    }

    #[test]
    fn test_fly_to_with_non_finite_zoom_keeps_current_zoom() {
        let store = MapStore::new();
        let surface = InMemorySurface::new();
        store.attach_surface(Box::new(surface.clone()));

        store.fly_to(LngLat::new(-122.27, 37.80), Some(f64::NAN)).unwrap();
        assert_eq!(store.zoom(), 14.0);
        assert_eq!(store.center(), LngLat::new(-122.27, 37.80));
        assert_eq!(surface.last_transition().unwrap().zoom, Some(14.0));

        store.fly_to(LngLat::new(-122.27, 37.80), Some(f64::INFINITY)).unwrap();
        assert_eq!(store.zoom(), 14.0);
    }

    #[test]
    fn test_context_only_writes_light_preset() {
        let store = MapStore::new();
        store.with_context(|ctx| {
            assert_eq!(ctx.state().pitch, 45.0);
            ctx.set_light_preset(LightPreset::Dawn);
        });
        assert_eq!(store.light_preset(), LightPreset::Dawn);
        assert_eq!(store.pitch(), 45.0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let store = MapStore::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let id = store.subscribe(Box::new(move |_: &StoreEvent, _: &mut StoreContext<'_>| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        store.set_zoom(10.0).unwrap();
        assert!(store.unsubscribe(id));
        store.set_zoom(11.0).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_newer_transition_supersedes_older() {
        let store = MapStore::new();
        store.attach_surface(Box::new(InMemorySurface::new()));
        let first = store.fly_to(LngLat::new(0.0, 0.0), None).unwrap();
        let second = store.fly_to(LngLat::new(1.0, 1.0), None).unwrap();

        assert_eq!(store.transition_state(first), TransitionState::Superseded);
        assert!(!store.complete_transition(first));
        assert!(store.complete_transition(second));
        assert_eq!(store.active_transition(), None);
    }
}
