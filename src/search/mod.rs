//! Place search: result types and the debounced search box state machine

pub mod orchestrator;

use crate::core::{config::SearchConfig, geo::LngLat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub display_name: String,
    pub coordinates: LngLat,
    pub place_types: Vec<String>,
}

impl SearchResult {
    /// Primary line of the dropdown entry: text before the first comma
    pub fn title(&self) -> &str {
        self.display_name
            .split_once(',')
            .map(|(head, _)| head)
            .unwrap_or(&self.display_name)
            .trim()
    }

    /// Secondary line: everything after the first comma
    pub fn subtitle(&self) -> &str {
        self.display_name
            .split_once(',')
            .map(|(_, rest)| rest.trim())
            .unwrap_or("")
    }

    pub fn has_type(&self, place_type: &str) -> bool {
        self.place_types.iter().any(|t| t == place_type)
    }
}

/// One outgoing search request
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub text: String,
    pub types: Vec<String>,
    pub limit: usize,
}

impl PlaceQuery {
    pub fn from_config(text: &str, config: &SearchConfig) -> Self {
        Self {
            text: text.trim().to_string(),
            types: config.place_types.clone(),
            limit: config.result_limit,
        }
    }
}

/// What the search box shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub is_open: bool,
    pub is_loading: bool,
}
