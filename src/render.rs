//! Renderer collaborator and a headless GeoJSON implementation.
//!
//! The real renderer is the host map library. The compositor only needs to
//! read the visible extent, swap one overlay layer for another, and nudge
//! the map to re-measure its container after the swap.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;
use tracing::warn;

use crate::bounds::BoundingBox;
use crate::compositor::{Feature, FeatureCollection, FeatureStyle};
use crate::config::Basemap;
use crate::viewport::Viewport;

/// Opaque id of a layer added to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LayerHandle(pub u64);

/// Per-feature style lookup handed to the renderer with each collection.
pub type StyleFn = fn(&Feature) -> &FeatureStyle;

pub trait Renderer {
    /// Visible bounding box.
    fn current_bounds(&self) -> BoundingBox;

    /// Current zoom level.
    fn current_zoom(&self) -> f64;

    /// Current map center as `(lat, lng)`.
    fn current_center(&self) -> (f64, f64) {
        self.current_bounds().center()
    }

    /// Add an overlay built from `collection`, styled per feature by `style`.
    fn add_layer(&mut self, collection: &FeatureCollection, style: StyleFn) -> LayerHandle;

    /// Remove an overlay previously returned by [`Renderer::add_layer`].
    fn remove_layer(&mut self, handle: LayerHandle);

    /// Re-measure the map container.
    fn invalidate_size(&mut self);

    /// Register the available base maps; the first one is shown.
    fn install_basemaps(&mut self, _basemaps: &[Basemap]) {}

    /// Viewport as the renderer currently sees it.
    fn viewport(&self) -> Viewport {
        let (lat, lng) = self.current_center();
        Viewport::new(self.current_bounds(), self.current_zoom()).with_center(lat, lng)
    }
}

// =============================================================================
// GEOJSON RENDERER
// =============================================================================

#[derive(Serialize)]
struct LayerLine<'a> {
    layer: LayerHandle,
    collection: &'a FeatureCollection,
}

/// Headless renderer that writes every added collection as one JSON line.
pub struct GeoJsonRenderer<W: Write> {
    out: W,
    viewport: Viewport,
    layers: HashMap<LayerHandle, usize>,
    next_handle: u64,
    invalidations: usize,
    basemaps: Vec<String>,
}

impl<W: Write> GeoJsonRenderer<W> {
    #[must_use]
    pub fn new(out: W, viewport: Viewport) -> Self {
        Self { out, viewport, layers: HashMap::new(), next_handle: 0, invalidations: 0, basemaps: Vec::new() }
    }

    /// Move the simulated map.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Feature count of every layer currently on the map.
    #[must_use]
    pub fn live_layers(&self) -> &HashMap<LayerHandle, usize> {
        &self.layers
    }

    #[must_use]
    pub fn invalidations(&self) -> usize {
        self.invalidations
    }

    /// Names of the installed base maps, active one first.
    #[must_use]
    pub fn basemaps(&self) -> &[String] {
        &self.basemaps
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for GeoJsonRenderer<W> {
    fn current_bounds(&self) -> BoundingBox {
        self.viewport.bounds
    }

    fn current_zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn current_center(&self) -> (f64, f64) {
        self.viewport.center()
    }

    fn add_layer(&mut self, collection: &FeatureCollection, _style: StyleFn) -> LayerHandle {
        self.next_handle += 1;
        let handle = LayerHandle(self.next_handle);
        self.layers.insert(handle, collection.features.len());

        let line = LayerLine { layer: handle, collection };
        let written = serde_json::to_writer(&mut self.out, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, layer = handle.0, "failed to write layer");
        }
        handle
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        if self.layers.remove(&handle).is_none() {
            warn!(layer = handle.0, "remove of unknown layer");
        }
    }

    fn invalidate_size(&mut self) {
        self.invalidations += 1;
    }

    fn install_basemaps(&mut self, basemaps: &[Basemap]) {
        self.basemaps = basemaps.iter().map(|b| b.name.clone()).collect();
    }
}
