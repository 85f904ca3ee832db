use async_trait::async_trait;
use mapjitsu::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// End-to-end scenarios driven through the public facade, with an in-memory
/// surface standing in for the map engine and scripted services standing in
/// for the network.
#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GOLDEN_GATE_PARK: LngLat = LngLat {
        lng: -122.4836,
        lat: 37.7694,
    };

    #[derive(Default)]
    struct CountingSearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlaceSearch for CountingSearch {
        async fn search(&self, query: &PlaceQuery) -> Result<Vec<SearchResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                SearchResult {
                    id: "poi.golden-gate-park".into(),
                    display_name: format!("{}, San Francisco, California, United States", query.text),
                    coordinates: GOLDEN_GATE_PARK,
                    place_types: vec!["poi".into()],
                },
                SearchResult {
                    id: "neighborhood.golden-gate-heights".into(),
                    display_name: "Golden Gate Heights, San Francisco, California".into(),
                    coordinates: LngLat::new(-122.4695, 37.7567),
                    place_types: vec!["neighborhood".into()],
                },
            ])
        }
    }

    struct LineDirections {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DirectionsService for LineDirections {
        async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as f64;
            let body = serde_json::json!({
                "routes": [{
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [
                            [request.origin.lng, request.origin.lat],
                            [request.origin.lng - 0.01 * (n + 1.0), request.origin.lat],
                            [request.destination.lng, request.destination.lat]
                        ]
                    },
                    "duration": 900.0,
                    "distance": 6100.0,
                    "legs": [{"steps": [
                        {"maneuver": {"instruction": "Head west on Fell Street"}, "distance": 3000.0, "duration": 400.0}
                    ]}]
                }]
            });
            Ok(serde_json::from_value(body)?)
        }
    }

    struct Harness {
        map: MapJitsu,
        surface: InMemorySurface,
        clock: FixedClock,
        search_calls: Arc<CountingSearch>,
    }

    fn harness(hour: u32) -> Harness {
        let _ = env_logger::builder().is_test(true).try_init();

        let surface = InMemorySurface::new();
        let clock = FixedClock::new(hour);
        let search_calls = Arc::new(CountingSearch::default());
        let map = MapJitsuBuilder::new()
            .with_clock(Arc::new(clock.clone()))
            .with_place_search(search_calls.clone())
            .with_directions(Arc::new(LineDirections {
                calls: AtomicUsize::new(0),
            }))
            .with_surface(Box::new(surface.clone()))
            .build()
            .expect("default config is valid");
        map.on_load();

        Harness {
            map,
            surface,
            clock,
            search_calls,
        }
    }

    fn light_property(surface: &InMemorySurface) -> Option<String> {
        surface
            .config_property("basemap", "lightPreset")
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Searching for a place and picking it moves the map there
    #[tokio::test(start_paused = true)]
    async fn test_search_and_select_golden_gate_park() {
        let h = harness(12);
        let search = h.map.search().expect("search is configured").clone();

        search.input("Golden Gate Park");
        tokio::time::sleep(Duration::from_millis(350)).await;

        let state = search.state();
        assert!(state.is_open);
        assert_eq!(state.results.len(), 2);
        assert_eq!(state.results[0].title(), "Golden Gate Park");

        search.select(0).expect("first result");

        let state = search.state();
        assert!(!state.is_open);
        assert!(state.results.is_empty());
        assert_eq!(h.map.store().center(), GOLDEN_GATE_PARK);
        assert_eq!(h.map.store().zoom(), 16.0);

        let flight = h.surface.last_transition().expect("a flight was issued");
        assert_eq!(flight.kind, TransitionKind::FlyTo);
        assert_eq!(flight.center, Some(GOLDEN_GATE_PARK));
        assert!(flight.essential);
    }

    /// Typing and clearing inside the debounce window never hits the network
    #[tokio::test(start_paused = true)]
    async fn test_typing_then_clearing_makes_no_request() {
        let h = harness(12);
        let search = h.map.search().expect("search is configured");

        search.input("Gol");
        tokio::time::sleep(Duration::from_millis(120)).await;
        search.input("");
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(h.search_calls.calls.load(Ordering::SeqCst), 0);
        assert!(search.state().results.is_empty());
    }

    /// The last camera mode wins and its tuple is what the store holds
    #[tokio::test]
    async fn test_driver_then_overview() {
        let mut h = harness(12);

        let driver = h.map.set_camera_mode(CameraModeKey::Driver).unwrap();
        let overview = h.map.set_camera_mode(CameraModeKey::Overview).unwrap();

        let store = h.map.store();
        assert_eq!((store.pitch(), store.bearing(), store.zoom()), (0.0, 0.0, 12.0));

        let transitions = h.surface.transitions();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[1].duration, Some(Duration::from_millis(1000)));

        assert!(!h.map.complete_transition(driver));
        assert!(h.map.complete_transition(overview));
    }

    /// Following the user only recenters in the driver mode
    #[tokio::test]
    async fn test_follow_user_in_driver_mode() {
        let mut h = harness(12);
        h.map.start_tracking();
        let fix = PositionFix {
            latitude: 37.7793,
            longitude: -122.4193,
            accuracy: 8.0,
            heading: None,
        };

        h.map.set_camera_mode(CameraModeKey::Explorer);
        assert!(h.map.on_position_fix(fix).is_none());

        h.map.set_camera_mode(CameraModeKey::Driver);
        assert!(h.map.on_position_fix(fix).is_some());
        assert_eq!(h.map.store().center(), LngLat::new(-122.4193, 37.7793));
        assert_eq!(h.map.geolocation().state().accuracy, Some(8.0));
    }

    /// Lighting follows the clock until a preset is pinned
    #[tokio::test]
    async fn test_lighting_follows_clock_and_override() {
        let h = harness(18);
        assert_eq!(light_property(&h.surface).as_deref(), Some("dusk"));

        h.clock.set_hour(9);
        h.map.lighting().refresh();
        assert_eq!(light_property(&h.surface).as_deref(), Some("day"));

        h.map.set_light_preset(Some(LightPreset::Night));
        assert_eq!(light_property(&h.surface).as_deref(), Some("night"));
        assert_eq!(h.map.store().light_preset(), LightPreset::Night);

        h.map.set_light_preset(None);
        assert_eq!(light_property(&h.surface).as_deref(), Some("day"));
    }

    /// Fetching twice keeps one route overlay showing the newest line
    #[tokio::test]
    async fn test_route_replaced_then_cleared() {
        let h = harness(12);
        let origin = LngLat::new(-122.4194, 37.7749);
        let routes = h.map.routes();

        routes.fetch_route(origin, GOLDEN_GATE_PARK).await.unwrap();
        let second = routes
            .fetch_route(origin, GOLDEN_GATE_PARK)
            .await
            .unwrap()
            .expect("a route");

        assert_eq!(h.surface.source_count(), 1);
        assert_eq!(h.surface.layer_ids(), vec!["route-line".to_string()]);
        assert_eq!(h.surface.source_data("route"), Some(second.to_feature()));
        assert_eq!(second.steps[0].instruction, "Head west on Fell Street");

        routes.clear_route();
        routes.clear_route();
        assert_eq!(h.surface.source_count(), 0);
        assert_eq!(h.surface.layer_count(), 0);
        assert!(routes.state().route.is_none());
    }

    /// Overlays coexist and each updates in place
    #[tokio::test]
    async fn test_overlays_coexist() {
        let h = harness(12);
        let overlays = h.map.overlays();
        let point = |score: f64| {
            GeoJson::feature_collection(vec![GeoJsonFeature::new(GeoJsonGeometry::point(
                GOLDEN_GATE_PARK,
            ))
            .with_property("safety_score", score)])
        };

        overlays.add_safety_layer(point(3.0)).unwrap();
        overlays.add_safety_layer(point(9.5)).unwrap();
        overlays
            .add_isochrone_layer(GeoJson::feature_collection(Vec::new()))
            .unwrap();

        assert_eq!(h.surface.source_count(), 2);
        assert_eq!(h.surface.layer_count(), 2);
        let safety = h.surface.source_data("safety-data").unwrap();
        assert_eq!(safety.features()[0].number("safety_score"), Some(9.5));

        overlays.remove_safety_layer().unwrap();
        assert!(h.surface.layer("safety-layer").is_none());
        assert!(h.surface.layer("isochrone-layer").is_some());
    }

    /// Commands issued before any surface exists only touch the state
    #[tokio::test]
    async fn test_detached_store_keeps_state() {
        let mut h = harness(12);
        let detached = h.map.detach_surface();
        assert!(detached.is_some());

        assert!(h.map.set_camera_mode(CameraModeKey::Driver).is_none());
        assert!(h.map.fly_to(GOLDEN_GATE_PARK, None).is_none());
        assert_eq!(h.map.store().center(), GOLDEN_GATE_PARK);
        assert_eq!(h.map.store().pitch(), 45.0);
        assert!(h
            .map
            .routes()
            .fetch_route(GOLDEN_GATE_PARK, GOLDEN_GATE_PARK)
            .await
            .unwrap()
            .is_none());
    }
}
