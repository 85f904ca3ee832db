//! Mapbox Geocoding v5 client for forward place search

use super::http::{endpoint, read_json, HTTP_CLIENT};
use crate::{
    core::geo::LngLat,
    search::{PlaceQuery, SearchResult},
    traits::PlaceSearch,
    MapError, Result,
};
use async_trait::async_trait;
use serde::Deserialize;

const PLACES_PATH: &str = "/geocoding/v5/mapbox.places";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub features: Vec<GeocodingFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingFeature {
    pub id: String,
    /// Full display name including its context
    pub place_name: String,
    pub center: [f64; 2],
    #[serde(default)]
    pub place_type: Vec<String>,
}

impl From<GeocodingFeature> for SearchResult {
    fn from(feature: GeocodingFeature) -> Self {
        Self {
            id: feature.id,
            display_name: feature.place_name,
            coordinates: LngLat::from(feature.center),
            place_types: feature.place_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    base_url: String,
    access_token: String,
}

impl MapboxGeocoder {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Forward search URL; the query text is percent-encoded into the path
    pub fn search_url(&self, query: &PlaceQuery) -> Result<reqwest::Url> {
        let mut url = endpoint(&self.base_url, PLACES_PATH)?;
        url.path_segments_mut()
            .map_err(|_| MapError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .push(&format!("{}.json", query.text));

        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("types", &query.types.join(","))
            .append_pair("limit", &query.limit.to_string());
        Ok(url)
    }
}

#[async_trait]
impl PlaceSearch for MapboxGeocoder {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<SearchResult>> {
        let url = self.search_url(query)?;
        log::debug!("place search for {:?}", query.text);

        let response = HTTP_CLIENT.get(url).send().await?;
        let parsed: GeocodingResponse = read_json(response).await?;
        Ok(parsed
            .features
            .into_iter()
            .take(query.limit)
            .map(SearchResult::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SearchConfig;

    fn geocoder() -> MapboxGeocoder {
        MapboxGeocoder::new("https://api.mapbox.com", "pk.test")
    }

    #[test]
    fn test_search_url_encodes_query() {
        let query = PlaceQuery::from_config("Golden Gate Park", &SearchConfig::default());
        let url = geocoder().search_url(&query).unwrap();
        assert_eq!(
            url.path(),
            "/geocoding/v5/mapbox.places/Golden%20Gate%20Park.json"
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("access_token".into(), "pk.test".into())));
        assert!(pairs.contains(&("types".into(), "poi,address,neighborhood,place".into())));
        assert!(pairs.contains(&("limit".into(), "5".into())));
    }

    #[test]
    fn test_slash_in_query_stays_in_one_segment() {
        let query = PlaceQuery::from_config("24th St/Mission", &SearchConfig::default());
        let url = geocoder().search_url(&query).unwrap();
        assert!(url.path().ends_with("/24th%20St%2FMission.json"));
    }

    #[test]
    fn test_feature_conversion() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"id": "neighborhood.1", "text": "Inner Richmond", "place_name": "Inner Richmond, San Francisco, California", "center": [-122.46, 37.78], "place_type": ["neighborhood"]},
            {"id": "place.2", "text": "San Francisco", "place_name": "San Francisco, California", "center": [-122.42, 37.77], "place_type": ["place"]}
        ]}"#;
        let parsed: GeocodingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.features[0].place_type, vec!["neighborhood".to_string()]);

        let result = SearchResult::from(parsed.features[1].clone());
        assert_eq!(result.coordinates, LngLat::new(-122.42, 37.77));
        assert_eq!(result.display_name, "San Francisco, California");
    }
}
