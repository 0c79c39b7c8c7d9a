//! Map widget configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Everything has a default so the widget starts with an empty environment.
//! Values that are present but malformed are errors rather than silently
//! replaced, except the HTTP timeouts, which fall back to their defaults.
//!
//! Basemap entries may use the legacy flat layout (`layer` instead of `url`,
//! tile options mixed in at the top level); [`normalize_basemap`] rewrites
//! them into `{ name, url, service, options }`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::color::Color;
use crate::consts::{DEFAULT_AREA_LIMIT, DEFAULT_INVALIDATE_DELAY_MS, DEFAULT_PALETTE};
use crate::error::ErrorCode;
use crate::provider::http::HttpTimeouts;
use crate::viewport::Viewport;

pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_CENTER: (f64, f64) = (46.528_634_695_271_67, 2.438_964_843_75);
pub const DEFAULT_ZOOM: f64 = 6.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const OSM_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Parse { key: &'static str, value: String },
    #[error("invalid basemap: {0}")]
    Basemap(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "E_CONFIG_PARSE",
            Self::Basemap(_) => "E_CONFIG_BASEMAP",
        }
    }
}

// =============================================================================
// BASEMAPS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasemapService {
    #[default]
    Tile,
    Wms,
    Wmts,
}

/// A base tile layer offered by the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basemap {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub service: BasemapService,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Basemap {
    #[must_use]
    pub fn openstreetmap() -> Self {
        let mut options = serde_json::Map::new();
        options.insert("attribution".into(), OSM_ATTRIBUTION.into());
        Self { name: "OpenStreetMap".into(), url: OSM_URL.into(), service: BasemapService::Tile, options }
    }
}

/// Rewrite a possibly-legacy basemap entry into a [`Basemap`].
///
/// `layer` is renamed to `url`; any key other than `url`, `layer`, `name`,
/// `service` and `options` moves into `options`.
///
/// # Errors
///
/// Returns [`ConfigError::Basemap`] if the entry is not an object, lacks a
/// name or url, or names an unknown service.
pub fn normalize_basemap(raw: serde_json::Value) -> Result<Basemap, ConfigError> {
    let serde_json::Value::Object(entry) = raw else {
        return Err(ConfigError::Basemap("entry is not an object".into()));
    };

    let mut normalized = serde_json::Map::new();
    let mut options = serde_json::Map::new();
    for (key, value) in entry {
        match key.as_str() {
            "layer" => {
                normalized.entry("url").or_insert(value);
            }
            "url" | "name" | "service" => {
                normalized.insert(key, value);
            }
            "options" => {
                let serde_json::Value::Object(explicit) = value else {
                    return Err(ConfigError::Basemap("options is not an object".into()));
                };
                for (k, v) in explicit {
                    options.entry(k).or_insert(v);
                }
            }
            _ => {
                options.insert(key, value);
            }
        }
    }
    if matches!(normalized.get("service"), Some(serde_json::Value::Null)) {
        normalized.remove("service");
    }
    normalized.insert("options".into(), serde_json::Value::Object(options));

    serde_json::from_value(serde_json::Value::Object(normalized)).map_err(|e| ConfigError::Basemap(e.to_string()))
}

/// Parse and normalise a JSON array of basemap entries.
///
/// # Errors
///
/// Returns [`ConfigError::Basemap`] if the JSON is invalid or any entry is.
pub fn parse_basemaps(json: &str) -> Result<Vec<Basemap>, ConfigError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json).map_err(|e| ConfigError::Basemap(e.to_string()))?;
    entries.into_iter().map(normalize_basemap).collect()
}

// =============================================================================
// MAP CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub api_endpoint: String,
    /// Initial center as `(lat, lng)`.
    pub center: (f64, f64),
    pub zoom: f64,
    pub area_limit: u32,
    pub simplify: bool,
    pub invalidate_delay_ms: u64,
    pub palette: Vec<Color>,
    pub basemaps: Vec<Basemap>,
    pub timeouts: HttpTimeouts,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.into(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            area_limit: DEFAULT_AREA_LIMIT,
            simplify: true,
            invalidate_delay_ms: DEFAULT_INVALIDATE_DELAY_MS,
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
            basemaps: vec![Basemap::openstreetmap()],
            timeouts: HttpTimeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl MapConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `AREAMAP_API_ENDPOINT`: API base URL
    /// - `AREAMAP_CENTER`: `lat,lng`
    /// - `AREAMAP_ZOOM`: initial zoom
    /// - `AREAMAP_AREA_LIMIT`: max areas per toggle (default 100000)
    /// - `AREAMAP_SIMPLIFY`: `true` (default) or `false`
    /// - `AREAMAP_INVALIDATE_DELAY_MS`: default 50
    /// - `AREAMAP_PALETTE`: comma-separated colors
    /// - `AREAMAP_BASEMAPS`: JSON array of basemap entries
    /// - `AREAMAP_REQUEST_TIMEOUT_SECS` / `AREAMAP_CONNECT_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any present but malformed value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`MapConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_endpoint = lookup("AREAMAP_API_ENDPOINT")
            .map_or(defaults.api_endpoint, |v| v.trim_end_matches('/').to_string());
        let center = match lookup("AREAMAP_CENTER") {
            Some(raw) => parse_center(&raw)?,
            None => defaults.center,
        };
        let zoom = parse_or("AREAMAP_ZOOM", lookup("AREAMAP_ZOOM"), defaults.zoom)?;
        let area_limit = parse_or("AREAMAP_AREA_LIMIT", lookup("AREAMAP_AREA_LIMIT"), defaults.area_limit)?;
        let simplify = parse_or("AREAMAP_SIMPLIFY", lookup("AREAMAP_SIMPLIFY"), defaults.simplify)?;
        let invalidate_delay_ms = parse_or(
            "AREAMAP_INVALIDATE_DELAY_MS",
            lookup("AREAMAP_INVALIDATE_DELAY_MS"),
            defaults.invalidate_delay_ms,
        )?;
        let palette = match lookup("AREAMAP_PALETTE") {
            Some(raw) => parse_palette(&raw)?,
            None => defaults.palette,
        };
        let basemaps = match lookup("AREAMAP_BASEMAPS") {
            Some(raw) => parse_basemaps(&raw)?,
            None => defaults.basemaps,
        };
        let timeouts = HttpTimeouts {
            request_secs: parse_or_default(lookup("AREAMAP_REQUEST_TIMEOUT_SECS"), defaults.timeouts.request_secs),
            connect_secs: parse_or_default(lookup("AREAMAP_CONNECT_TIMEOUT_SECS"), defaults.timeouts.connect_secs),
        };

        Ok(Self { api_endpoint, center, zoom, area_limit, simplify, invalidate_delay_ms, palette, basemaps, timeouts })
    }

    /// Approximate starting viewport: one 256px tile of extent around `center`.
    #[must_use]
    pub fn initial_viewport(&self) -> Viewport {
        let scale = 2f64.powf(self.zoom);
        let half_lng = 180.0 / scale;
        let half_lat = 90.0 / scale;
        let (lat, lng) = self.center;
        let bounds = BoundingBox::from_corners((lat - half_lat, lng - half_lng), (lat + half_lat, lng + half_lng));
        Viewport::new(bounds, self.zoom).with_center(lat, lng)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Parse { key, value }),
    }
}

fn parse_or_default<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    match raw.map(|v| v.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        _ => default,
    }
}

fn parse_center(raw: &str) -> Result<(f64, f64), ConfigError> {
    let err = || ConfigError::Parse { key: "AREAMAP_CENTER", value: raw.to_string() };
    let (lat, lng) = raw.split_once(',').ok_or_else(err)?;
    let lat = lat.trim().parse::<f64>().map_err(|_| err())?;
    let lng = lng.trim().parse::<f64>().map_err(|_| err())?;
    Ok((lat, lng))
}

fn parse_palette(raw: &str) -> Result<Vec<Color>, ConfigError> {
    let palette: Vec<Color> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if palette.is_empty() {
        return Err(ConfigError::Parse { key: "AREAMAP_PALETTE", value: raw.to_string() });
    }
    Ok(palette)
}
