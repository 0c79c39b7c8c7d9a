//! HTTP area provider for GeoNature-style `geo` endpoints.
//!
//! Thin wrapper over `GET /geo/types` and `GET /geo/areas`. Query building
//! and response parsing are pure functions so they can be tested without a
//! server.

use std::time::Duration;

use tracing::debug;

use super::{AreaDataProvider, AreaQuery, AreaRecord, AreaType, AreaTypeProvider, ProviderError};

// =============================================================================
// CLIENT
// =============================================================================

/// Connect and request timeouts for the area API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

pub struct HttpAreaProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAreaProvider {
    /// Build a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ProviderError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<String, ProviderError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, params = query.len(), "area API request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ProviderError::Response { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AreaTypeProvider for HttpAreaProvider {
    async fn area_types(&self) -> Result<Vec<AreaType>, ProviderError> {
        let text = self.get("/geo/types", &[]).await?;
        parse_area_types(&text)
    }
}

#[async_trait::async_trait]
impl AreaDataProvider for HttpAreaProvider {
    async fn areas(&self, query: &AreaQuery) -> Result<Vec<AreaRecord>, ProviderError> {
        let text = self.get("/geo/areas", &query_pairs(query)).await?;
        parse_areas(&text)
    }
}

// =============================================================================
// WIRE HELPERS
// =============================================================================

/// Query string pairs for an area request. `id_type` repeats once per type.
#[must_use]
pub fn query_pairs(query: &AreaQuery) -> Vec<(&'static str, String)> {
    let mut pairs: Vec<(&'static str, String)> = query.type_ids.iter().map(|id| ("id_type", id.to_string())).collect();
    if let Some(name) = &query.area_name {
        pairs.push(("area_name", name.clone()));
    }
    pairs.push(("limit", query.limit.to_string()));
    pairs.push(("simplify", query.simplify.to_string()));
    pairs
}

/// Decode the `/geo/types` body.
///
/// # Errors
///
/// Returns [`ProviderError::Parse`] if the body is not a list of area types.
pub fn parse_area_types(json: &str) -> Result<Vec<AreaType>, ProviderError> {
    serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Decode the `/geo/areas` body. Geometries stay raw until validated.
///
/// # Errors
///
/// Returns [`ProviderError::Parse`] if the body is not a list of area records.
pub fn parse_areas(json: &str) -> Result<Vec<AreaRecord>, ProviderError> {
    serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
