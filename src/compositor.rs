//! Feature compositor: rebuilds the visible area overlay from scratch.
//!
//! DESIGN
//! ======
//! Every trigger (toggle, fetch completion, pan/zoom) runs the same full
//! rebuild: walk the registry in insertion order, resolve each layer's
//! color, keep the geometries whose bounding box touches the viewport, and
//! wrap them in styled features. The result replaces the previous overlay in
//! the renderer wholesale. There is no diffing.
//!
//! ERROR HANDLING
//! ==============
//! A geometry without a usable outer ring is skipped and counted; the rest of
//! the layer, and every other layer, is still composed.

#[cfg(test)]
#[path = "compositor_test.rs"]
mod compositor_test;

use serde::Serialize;
use tracing::{debug, warn};

use crate::TypeId;
use crate::bounds::{self, BoundingBox};
use crate::color::{Color, ColorAssigner};
use crate::consts::{FEATURE_NAME, FILL_OPACITY, SMOOTH_FACTOR, STROKE_OPACITY};
use crate::error::ErrorCode;
use crate::geometry::Geometry;
use crate::registry::LayerRegistry;
use crate::render::{LayerHandle, Renderer};

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// Leaflet-style path options carried by each feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub color: Color,
    pub opacity: f64,
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub smooth_factor: f64,
}

impl FeatureStyle {
    /// The fixed area style template, tinted with `color`.
    #[must_use]
    pub fn area(color: &str) -> Self {
        Self {
            color: color.to_string(),
            opacity: STROKE_OPACITY,
            fill_color: color.to_string(),
            fill_opacity: FILL_OPACITY,
            smooth_factor: SMOOTH_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    pub name: &'static str,
    pub type_id: TypeId,
    pub style: FeatureStyle,
}

/// A GeoJSON `Feature`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

/// A GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self { kind: "FeatureCollection", features }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Style lookup passed to [`Renderer::add_layer`].
#[must_use]
pub fn feature_style(feature: &Feature) -> &FeatureStyle {
    &feature.properties.style
}

// =============================================================================
// COMPOSITION
// =============================================================================

/// Output of one rebuild.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub collection: FeatureCollection,
    /// Geometries dropped because their bounding box could not be computed.
    pub skipped: usize,
}

/// Build the feature collection for `registry` as seen through `viewport`.
///
/// Colors are resolved for every enabled layer, including layers with no
/// visible geometry, so palette slots follow toggle order rather than what
/// happens to be on screen.
pub fn compose(registry: &LayerRegistry, colors: &mut ColorAssigner, viewport: &BoundingBox) -> Composition {
    let mut features = Vec::new();
    let mut skipped = 0;

    for entry in registry.entries() {
        let color = colors.assign(entry.type_id);
        for geometry in &entry.geometries {
            let bbox = match geometry.bounding_box() {
                Ok(bbox) => bbox,
                Err(e) => {
                    warn!(type_id = entry.type_id, error = %e, code = e.error_code(), "skipping geometry");
                    skipped += 1;
                    continue;
                }
            };
            if !bounds::intersects(&bbox, viewport) {
                continue;
            }
            features.push(Feature {
                kind: "Feature",
                geometry: geometry.clone(),
                properties: FeatureProperties {
                    name: FEATURE_NAME,
                    type_id: entry.type_id,
                    style: FeatureStyle::area(&color),
                },
            });
        }
    }

    Composition { collection: FeatureCollection::new(features), skipped }
}

/// Owns the overlay currently on the map and swaps it on every rebuild.
#[derive(Default)]
pub struct FeatureCompositor {
    handle: Option<LayerHandle>,
    current: Composition,
    rebuilds: u64,
}

impl FeatureCompositor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the overlay and swap it into `renderer`.
    ///
    /// The caller is expected to schedule [`Renderer::invalidate_size`]
    /// shortly afterwards; the container size may be stale right after the swap.
    pub fn recompute(
        &mut self,
        registry: &LayerRegistry,
        colors: &mut ColorAssigner,
        viewport: &BoundingBox,
        renderer: &mut dyn Renderer,
    ) -> &FeatureCollection {
        let composition = compose(registry, colors, viewport);

        if let Some(old) = self.handle.take() {
            renderer.remove_layer(old);
        }
        self.handle = Some(renderer.add_layer(&composition.collection, feature_style));
        self.rebuilds += 1;

        debug!(
            layers = registry.len(),
            features = composition.collection.len(),
            skipped = composition.skipped,
            rebuild = self.rebuilds,
            "overlay recomposed"
        );
        self.current = composition;
        &self.current.collection
    }

    /// The collection currently on the map.
    #[must_use]
    pub fn current(&self) -> &FeatureCollection {
        &self.current.collection
    }

    /// Geometries skipped during the last rebuild.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.current.skipped
    }

    /// Handle of the overlay currently on the map.
    #[must_use]
    pub fn handle(&self) -> Option<LayerHandle> {
        self.handle
    }

    /// Number of rebuilds since creation.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}
