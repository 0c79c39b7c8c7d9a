//! Validated area geometries.
//!
//! Area payloads arrive from the provider as GeoJSON, either as an embedded
//! string or an inline object. They are parsed into [`Geometry`] once, at the
//! provider boundary, so the compositor never touches untyped JSON. Anything
//! that is not a polygon or multipolygon with numeric `[lng, lat, ...]`
//! positions is a [`GeometryError`] and is dropped for that one area only.
//! Altitudes are accepted and discarded.
//!
//! Bounding boxes are computed from the outer ring of the first polygon part
//! only. Holes and further parts are ignored for culling; a multipolygon whose
//! first part is off-screen while a later part is visible will be culled.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::bounds::BoundingBox;
use crate::error::ErrorCode;

/// A `[lng, lat]` coordinate pair. Altitude and further members are dropped on input.
pub type Position = [f64; 2];

/// A closed ring of positions.
pub type Ring = Vec<Position>;

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("geometry parse failed: {0}")]
    Parse(String),
    #[error("unsupported geometry type: {0}")]
    UnsupportedType(String),
    #[error("geometry has no outer ring")]
    EmptyOuterRing,
}

impl ErrorCode for GeometryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_GEOMETRY_PARSE",
            Self::UnsupportedType(_) => "E_GEOMETRY_TYPE",
            Self::EmptyOuterRing => "E_GEOMETRY_EMPTY",
        }
    }
}

/// Polygonal area geometry, serialised as a GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Outer ring followed by holes.
    Polygon(#[serde(deserialize_with = "polygon_coordinates")] Vec<Ring>),
    /// One polygon (outer ring + holes) per part.
    MultiPolygon(#[serde(deserialize_with = "multipolygon_coordinates")] Vec<Vec<Ring>>),
}

// =============================================================================
// COORDINATES
// =============================================================================

type RawRing = Vec<Vec<f64>>;

fn to_position<E: serde::de::Error>(raw: &[f64]) -> Result<Position, E> {
    match raw {
        [lng, lat, ..] => Ok([*lng, *lat]),
        _ => Err(E::invalid_length(raw.len(), &"a position of at least 2 numbers")),
    }
}

fn to_rings<E: serde::de::Error>(raw: &[RawRing]) -> Result<Vec<Ring>, E> {
    raw.iter()
        .map(|ring| ring.iter().map(|p| to_position::<E>(p)).collect::<Result<Ring, E>>())
        .collect()
}

fn polygon_coordinates<'de, D>(deserializer: D) -> Result<Vec<Ring>, D::Error>
where
    D: Deserializer<'de>,
{
    to_rings(&Vec::<RawRing>::deserialize(deserializer)?)
}

fn multipolygon_coordinates<'de, D>(deserializer: D) -> Result<Vec<Vec<Ring>>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Vec<RawRing>>::deserialize(deserializer)?
        .iter()
        .map(|part| to_rings::<D::Error>(part))
        .collect()
}

impl Geometry {
    /// Parse a GeoJSON geometry string.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Parse`] for invalid JSON or coordinates, and
    /// [`GeometryError::UnsupportedType`] for non-polygonal geometries.
    pub fn parse(raw: &str) -> Result<Self, GeometryError> {
        let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| GeometryError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Convert an already-decoded GeoJSON geometry object.
    ///
    /// A JSON string is accepted too and parsed as embedded GeoJSON.
    ///
    /// # Errors
    ///
    /// Same as [`Geometry::parse`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, GeometryError> {
        if let serde_json::Value::String(raw) = &value {
            return Self::parse(raw);
        }
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| GeometryError::Parse("missing geometry type".into()))?;
        if kind != "Polygon" && kind != "MultiPolygon" {
            return Err(GeometryError::UnsupportedType(kind.to_string()));
        }
        serde_json::from_value(value).map_err(|e| GeometryError::Parse(e.to_string()))
    }

    /// Outer ring of the first polygon part, if there is one.
    #[must_use]
    pub fn outer_ring(&self) -> Option<&[Position]> {
        let ring = match self {
            Self::Polygon(rings) => rings.first(),
            Self::MultiPolygon(parts) => parts.first().and_then(|rings| rings.first()),
        };
        ring.map(Vec::as_slice)
    }

    /// Bounding box of the outer ring of the first polygon part.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyOuterRing`] when there is no ring or it has no positions.
    pub fn bounding_box(&self) -> Result<BoundingBox, GeometryError> {
        self.outer_ring()
            .and_then(BoundingBox::enclosing)
            .ok_or(GeometryError::EmptyOuterRing)
    }
}
