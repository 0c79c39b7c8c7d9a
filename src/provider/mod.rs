//! Area sources: reference data and geometries behind async traits.
//!
//! DESIGN
//! ======
//! The compositor never talks to the network directly. Area types are loaded
//! once through [`AreaTypeProvider`]; geometries are requested per toggle
//! through [`AreaDataProvider`]. [`http::HttpAreaProvider`] implements both
//! against a GeoNature-style REST API; tests plug in in-memory fakes.
//!
//! Raw records are validated into [`Geometry`] by [`validate_records`] as soon
//! as they arrive. Malformed records are dropped one by one and counted; a
//! single bad area never fails the whole layer.

pub mod http;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::TypeId;
use crate::error::ErrorCode;
use crate::geometry::Geometry;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or its body not read.
    #[error("area request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("area API error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("area response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_AREA_REQUEST",
            Self::Response { .. } => "E_AREA_RESPONSE",
            Self::Parse(_) => "E_AREA_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// Area type reference data (`ref_geo.bib_areas_types`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaType {
    #[serde(rename = "id_type")]
    pub id: TypeId,
    /// Minimum map zoom at which layers of this type may be displayed.
    #[serde(default)]
    pub zoom_min: Option<f64>,
    #[serde(rename = "type_name", default)]
    pub label: String,
}

/// One area as returned by the data provider. The geometry is still raw.
///
/// The API sends the geometry as `geojson_4326`; `geometry` is accepted too.
/// When both are present and non-null, `geojson_4326` wins. A record with
/// neither keeps a `Null` geometry and is dropped by [`validate_records`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireAreaRecord")]
pub struct AreaRecord {
    pub id_area: Option<i64>,
    pub area_name: Option<String>,
    /// GeoJSON geometry, either embedded as a string or inline.
    pub geometry: serde_json::Value,
}

#[derive(Deserialize)]
struct WireAreaRecord {
    #[serde(default)]
    id_area: Option<i64>,
    #[serde(default)]
    area_name: Option<String>,
    #[serde(default)]
    geojson_4326: serde_json::Value,
    #[serde(default)]
    geometry: serde_json::Value,
}

impl From<WireAreaRecord> for AreaRecord {
    fn from(wire: WireAreaRecord) -> Self {
        let geometry = if wire.geojson_4326.is_null() { wire.geometry } else { wire.geojson_4326 };
        Self { id_area: wire.id_area, area_name: wire.area_name, geometry }
    }
}

/// Parameters of an area geometry request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaQuery {
    pub type_ids: Vec<TypeId>,
    pub area_name: Option<String>,
    pub limit: u32,
    pub simplify: bool,
}

impl AreaQuery {
    /// All areas of one type.
    #[must_use]
    pub fn for_type(type_id: TypeId, limit: u32, simplify: bool) -> Self {
        Self { type_ids: vec![type_id], area_name: None, limit, simplify }
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Source of area type reference data.
#[async_trait::async_trait]
pub trait AreaTypeProvider: Send + Sync {
    /// Fetch every known area type.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the request fails or the body is malformed.
    async fn area_types(&self) -> Result<Vec<AreaType>, ProviderError>;
}

/// Source of area geometries.
#[async_trait::async_trait]
pub trait AreaDataProvider: Send + Sync {
    /// Fetch the areas matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the request fails or the body is malformed.
    async fn areas(&self, query: &AreaQuery) -> Result<Vec<AreaRecord>, ProviderError>;
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Geometries that passed validation, and how many records were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedAreas {
    pub geometries: Vec<Geometry>,
    pub skipped: usize,
}

/// Parse every record's geometry, dropping the ones that are malformed.
#[must_use]
pub fn validate_records(type_id: TypeId, records: Vec<AreaRecord>) -> ValidatedAreas {
    let mut out = ValidatedAreas { geometries: Vec::with_capacity(records.len()), skipped: 0 };
    for record in records {
        match Geometry::from_value(record.geometry) {
            Ok(geometry) => out.geometries.push(geometry),
            Err(e) => {
                warn!(type_id, id_area = ?record.id_area, error = %e, code = e.error_code(), "skipping malformed area");
                out.skipped += 1;
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
