//! Viewport-aware area layer compositor for the map widget.
//!
//! The widget overlays independently toggleable area-type layers on a base
//! map. This crate owns the part of that widget with real state: it assigns
//! each layer a stable color, culls geometries against the visible viewport,
//! and rebuilds one styled feature collection whenever a layer is toggled or
//! the map moves. Rendering, tiling and network transport sit behind traits
//! so the core can be driven headless in tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`orchestrator`] | Event handler wiring toggles, viewport changes and fetch completions |
//! | [`compositor`] | Full rebuild of the visible [`compositor::FeatureCollection`] |
//! | [`registry`] | Enabled layers in insertion order, pending fetch tickets |
//! | [`color`] | Stable palette colors per area type with procedural fallback |
//! | [`bounds`] | Bounding boxes and the viewport overlap test |
//! | [`geometry`] | Validated polygon / multipolygon payloads |
//! | [`viewport`] | Current visible extent and zoom |
//! | [`provider`] | Area type / area geometry sources, including the HTTP client |
//! | [`render`] | Renderer collaborator trait and a headless GeoJSON renderer |
//! | [`notify`] | User-facing notices (zoom too low, fetch failures) |
//! | [`config`] | Environment configuration and basemap normalisation |
//! | [`error`] | Crate-wide error codes and the top-level [`error::MapError`] |
//! | [`consts`] | Palette, style template and other shared constants |

pub mod bounds;
pub mod color;
pub mod compositor;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod notify;
pub mod orchestrator;
pub mod provider;
pub mod registry;
pub mod render;
pub mod viewport;

/// Database identifier of an area type (`id_type`).
pub type TypeId = i64;
