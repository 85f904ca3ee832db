//! Drives a map view without a rendering engine.
//!
//! Run with `RUST_LOG=debug`. Set `MAPBOX_TOKEN` to try a live place search
//! and `MAPJITSU_API_BASE` to point route requests at a running proxy.

use mapjitsu::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = MapJitsuConfig::from_env()?;
    let has_token = config.endpoints.mapbox_token.is_some();

    let surface = InMemorySurface::new();
    let mut map = MapJitsuBuilder::new()
        .with_config(config)
        .with_surface(Box::new(surface.clone()))
        .build()?;
    map.on_load();
    println!(
        "ready at {} with {} lighting",
        map.store().center(),
        map.store().light_preset()
    );

    for key in CameraModeKey::ALL {
        map.set_camera_mode(key);
        let view = map.store().snapshot();
        println!(
            "{:<9} pitch {:>4} bearing {:>4} zoom {:>4}",
            key.label(),
            view.pitch,
            view.bearing,
            view.zoom
        );
    }

    if let (true, Some(search)) = (has_token, map.search()) {
        search.input("Golden Gate Park");
        tokio::time::sleep(search_settle_time(map.config())).await;
        let state = search.state();
        for result in &state.results {
            println!("  {} | {}", result.title(), result.subtitle());
        }
        if let Some((chosen, _)) = search.select(0) {
            println!("flew to {} at {}", chosen.title(), map.store().center());
        }
    } else {
        println!("no map token, skipping place search");
    }

    let origin = LngLat::new(-122.4194, 37.7749);
    let destination = LngLat::new(-122.4836, 37.7694);
    match map.routes().fetch_route(origin, destination).await {
        Ok(Some(route)) => println!(
            "route: {:.1} km, {:.0} min, {} steps",
            route.distance_km(),
            route.duration_minutes(),
            route.steps.len()
        ),
        Ok(None) => println!("no route found"),
        Err(e) => println!("route unavailable: {e}"),
    }

    println!("layers on the surface: {:?}", surface.layer_ids());
    Ok(())
}

fn search_settle_time(config: &MapJitsuConfig) -> Duration {
    config.search.debounce() + Duration::from_secs(2)
}
