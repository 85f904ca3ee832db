//! Configuration for the MapJitsu core
//!
//! Every section has a `Default` matching the values the web client ships
//! with, so a config only needs to name what it changes. Credentials and
//! service locations are read from the environment with [`MapJitsuConfig::from_env`].

use crate::core::constants::{
    CAMERA_TRANSITION_MS, DEFAULT_CONTOURS_MINUTES, SEARCH_DEBOUNCE_MS, SEARCH_PLACE_TYPES,
    SEARCH_RESULT_LIMIT, SEARCH_SELECT_ZOOM,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the public map token.
pub const ENV_MAPBOX_TOKEN: &str = "MAPBOX_TOKEN";
/// Fallback variable name used by the web build.
pub const ENV_PUBLIC_MAPBOX_TOKEN: &str = "NEXT_PUBLIC_MAPBOX_TOKEN";
/// Base URL of the directions / isochrone / vibe-check proxy.
pub const ENV_API_BASE: &str = "MAPJITSU_API_BASE";
/// Base URL of the place search service.
pub const ENV_GEOCODING_BASE: &str = "MAPJITSU_GEOCODING_BASE";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapJitsuConfig {
    pub endpoints: ServiceEndpoints,
    pub search: SearchConfig,
    pub camera: CameraConfig,
    pub isochrone: IsochroneConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub api_base_url: String,
    pub geocoding_base_url: String,
    pub mapbox_token: Option<String>,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            geocoding_base_url: "https://api.mapbox.com".to_string(),
            mapbox_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub result_limit: usize,
    pub place_types: Vec<String>,
    pub select_zoom: f64,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: SEARCH_DEBOUNCE_MS,
            result_limit: SEARCH_RESULT_LIMIT,
            place_types: SEARCH_PLACE_TYPES.iter().map(|t| t.to_string()).collect(),
            select_zoom: SEARCH_SELECT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub transition_duration_ms: u64,
}

impl CameraConfig {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: CAMERA_TRANSITION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsochroneConfig {
    pub contours_minutes: Vec<u32>,
}

impl Default for IsochroneConfig {
    fn default() -> Self {
        Self {
            contours_minutes: DEFAULT_CONTOURS_MINUTES.to_vec(),
        }
    }
}

impl MapJitsuConfig {
    /// Builds a config from the process environment on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.endpoints.mapbox_token = get(ENV_MAPBOX_TOKEN).or_else(|| get(ENV_PUBLIC_MAPBOX_TOKEN));
        if let Some(base) = get(ENV_API_BASE) {
            config.endpoints.api_base_url = base;
        }
        if let Some(base) = get(ENV_GEOCODING_BASE) {
            config.endpoints.geocoding_base_url = base;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the config for values the services cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("api_base_url", &self.endpoints.api_base_url),
            ("geocoding_base_url", &self.endpoints.geocoding_base_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| MapError::Config(format!("{name} is not a valid URL ({url}): {e}")))?;
        }
        if self.search.result_limit == 0 {
            return Err(MapError::Config("search.result_limit must be at least 1".into()));
        }
        if self.isochrone.contours_minutes.is_empty() {
            return Err(MapError::Config(
                "isochrone.contours_minutes must name at least one contour".into(),
            ));
        }
        Ok(())
    }

    /// Returns the map token or the configuration error the place search reports without one.
    pub fn require_token(&self) -> Result<&str> {
        self.endpoints
            .mapbox_token
            .as_deref()
            .ok_or_else(|| MapError::Config(format!("{ENV_MAPBOX_TOKEN} is required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_client_constants() {
        let config = MapJitsuConfig::default();
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(config.search.select_zoom, 16.0);
        assert_eq!(config.camera.transition_duration(), Duration::from_millis(1000));
        assert_eq!(config.isochrone.contours_minutes, vec![5, 10, 15]);
    }

    #[test]
    fn test_token_falls_back_to_public_variable() {
        let config =
            MapJitsuConfig::from_lookup(lookup(&[(ENV_PUBLIC_MAPBOX_TOKEN, "pk.public")])).unwrap();
        assert_eq!(config.require_token().unwrap(), "pk.public");

        let config = MapJitsuConfig::from_lookup(lookup(&[
            (ENV_MAPBOX_TOKEN, "pk.primary"),
            (ENV_PUBLIC_MAPBOX_TOKEN, "pk.public"),
        ]))
        .unwrap();
        assert_eq!(config.require_token().unwrap(), "pk.primary");
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let config = MapJitsuConfig::from_lookup(lookup(&[(ENV_MAPBOX_TOKEN, "  ")])).unwrap();
        assert!(matches!(config.require_token(), Err(MapError::Config(_))));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = MapJitsuConfig::from_lookup(lookup(&[(ENV_API_BASE, "not a url")])).unwrap_err();
        assert!(matches!(err, MapError::Config(msg) if msg.contains("api_base_url")));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MapJitsuConfig =
            serde_json::from_str(r#"{"search": {"debounce_ms": 150}}"#).unwrap();
        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(config.endpoints, ServiceEndpoints::default());
    }
}
