//! Client for the vibe-check proxy (`POST /api/ai/vibe-check`)

use super::http::{endpoint, read_json, HTTP_CLIENT};
use crate::{core::geo::LngLat, traits::VibeCheckService, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VibeCheckRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl VibeCheckRequest {
    pub fn at(position: LngLat) -> Self {
        Self {
            lat: position.lat,
            lng: position.lng,
            query: None,
        }
    }

    /// Blank questions are dropped so the proxy uses its default prompt
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        self
    }
}

/// Coarse part of day used to flavour the vibe description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeContext {
    Morning,
    Afternoon,
    Evening,
    Night,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VibeContext {
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "timeContext")]
    pub time_context: TimeContext,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VibeCheckResult {
    pub response: String,
    pub context: VibeContext,
}

#[derive(Debug, Clone)]
pub struct ProxyVibeCheck {
    base_url: String,
}

impl ProxyVibeCheck {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl VibeCheckService for ProxyVibeCheck {
    async fn vibe_check(&self, request: &VibeCheckRequest) -> Result<VibeCheckResult> {
        let url = endpoint(&self.base_url, "/api/ai/vibe-check")?;
        let response = HTTP_CLIENT.post(url).json(request).send().await?;
        read_json(response).await
    }
}
