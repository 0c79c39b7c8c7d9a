//! Orchestrator: the single event handler behind the map widget.
//!
//! DESIGN
//! ======
//! All state (viewport, colors, registry, current overlay) is owned here and
//! mutated from the event handlers. Work that has to wait (area fetches, the
//! post-swap layout invalidation) runs in spawned tasks whose only effect is
//! to post a completion back onto the orchestrator's channel. Completions are
//! crate-private: a [`MapHandle`] can only post [`MapEvent`]s, so nothing
//! outside can fake a fetch result or unbalance the in-flight count.
//! Messages are handled one at a time, so a rebuild always runs to completion
//! before the next one is looked at.
//!
//! ```text
//! Toggle ──► zoom floor ──► spawn fetch ──► AreasFetched ──► registry ──► rebuild
//! ViewportChanged ──► tracker ──────────────────────────────────────────► rebuild
//! rebuild ──► renderer swap ──► (delay) ──► InvalidateLayout ──► invalidate_size
//! ```
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. A rejected toggle and a failed fetch become
//! notices; malformed areas are dropped individually; a fetch that resolves
//! after its layer was unchecked is discarded.
//!
//! Handlers spawn tokio tasks, so they must run inside a tokio runtime.

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod orchestrator_test;

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::TypeId;
use crate::color::ColorAssigner;
use crate::compositor::{FeatureCollection, FeatureCompositor};
use crate::config::{Basemap, MapConfig};
use crate::consts::{NOTICE_AREA_TYPES_FETCH_ERROR, NOTICE_AREAS_FETCH_ERROR, NOTICE_ZOOM_TOO_LOW};
use crate::error::{ErrorCode, MapError};
use crate::notify::{Notice, Notifier};
use crate::provider::{
    AreaDataProvider, AreaQuery, AreaRecord, AreaTypeProvider, ProviderError, validate_records,
};
use crate::registry::{Completion, LayerRegistry, Ticket, ToggleOutcome};
use crate::render::Renderer;
use crate::viewport::{Viewport, ViewportTracker};

// =============================================================================
// EVENTS
// =============================================================================

/// Input to the orchestrator.
#[derive(Debug)]
pub enum MapEvent {
    /// A layer checkbox changed.
    Toggle { type_id: TypeId, checked: bool },
    /// The host map finished a move or zoom, reporting the new extent.
    ViewportChanged(Viewport),
    /// The host map finished a move or zoom; read the extent from the renderer.
    ViewportFromRenderer,
    /// Stop [`Orchestrator::run`] once in-flight work has drained.
    Shutdown,
}

/// What travels on the orchestrator's channel.
#[derive(Debug)]
enum Inbox {
    Event(MapEvent),
    /// A geometry fetch started by a toggle resolved.
    AreasFetched { type_id: TypeId, ticket: Ticket, result: Result<Vec<AreaRecord>, ProviderError> },
    /// Deferred container re-measure after an overlay swap.
    InvalidateLayout,
}

/// A UI command in its serialised form, one JSON object per line.
///
/// `{"toggle":{"type_id":25,"checked":true}}`, `{"viewport":{...}}` or `"refresh"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapCommand {
    Toggle { type_id: TypeId, checked: bool },
    Viewport(Viewport),
    Refresh,
}

impl From<MapCommand> for MapEvent {
    fn from(command: MapCommand) -> Self {
        match command {
            MapCommand::Toggle { type_id, checked } => Self::Toggle { type_id, checked },
            MapCommand::Viewport(viewport) => Self::ViewportChanged(viewport),
            MapCommand::Refresh => Self::ViewportFromRenderer,
        }
    }
}

/// Parse one command line.
///
/// # Errors
///
/// Returns [`MapError::Command`] if the line is not a valid command.
pub fn parse_command(line: &str) -> Result<MapCommand, MapError> {
    serde_json::from_str(line.trim()).map_err(|e| MapError::Command(e.to_string()))
}

/// Cloneable sender for posting events from UI callbacks.
#[derive(Clone)]
pub struct MapHandle {
    tx: mpsc::UnboundedSender<Inbox>,
}

impl MapHandle {
    /// Post an event. Returns false if the orchestrator is gone.
    pub fn send(&self, event: MapEvent) -> bool {
        self.tx.send(Inbox::Event(event)).is_ok()
    }

    pub fn toggle(&self, type_id: TypeId, checked: bool) -> bool {
        self.send(MapEvent::Toggle { type_id, checked })
    }

    pub fn viewport_changed(&self, viewport: Viewport) -> bool {
        self.send(MapEvent::ViewportChanged(viewport))
    }

    pub fn shutdown(&self) -> bool {
        self.send(MapEvent::Shutdown)
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

pub struct Orchestrator {
    tracker: ViewportTracker,
    colors: ColorAssigner,
    registry: LayerRegistry,
    compositor: FeatureCompositor,
    renderer: Box<dyn Renderer>,
    areas: Arc<dyn AreaDataProvider>,
    notifier: Arc<dyn Notifier>,
    basemaps: Vec<Basemap>,
    area_limit: u32,
    simplify: bool,
    invalidate_delay: Duration,
    tx: mpsc::UnboundedSender<Inbox>,
    rx: mpsc::UnboundedReceiver<Inbox>,
    /// Spawned fetches and timers whose event has not been handled yet.
    in_flight: usize,
    closing: bool,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        config: &MapConfig,
        renderer: Box<dyn Renderer>,
        areas: Arc<dyn AreaDataProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = ViewportTracker::new(renderer.viewport());
        Self {
            tracker,
            colors: ColorAssigner::new(config.palette.clone()),
            registry: LayerRegistry::new(),
            compositor: FeatureCompositor::new(),
            renderer,
            areas,
            notifier,
            basemaps: config.basemaps.clone(),
            area_limit: config.area_limit,
            simplify: config.simplify,
            invalidate_delay: Duration::from_millis(config.invalidate_delay_ms),
            tx,
            rx,
            in_flight: 0,
            closing: false,
        }
    }

    /// Replace the color assigner, e.g. with a seeded one.
    #[must_use]
    pub fn with_colors(mut self, colors: ColorAssigner) -> Self {
        self.colors = colors;
        self
    }

    /// Sender for UI callbacks.
    #[must_use]
    pub fn handle(&self) -> MapHandle {
        MapHandle { tx: self.tx.clone() }
    }

    /// Install basemaps and load area type reference data.
    ///
    /// A failure is reported to the notifier; the widget keeps working, with
    /// no zoom floors enforced.
    ///
    /// # Errors
    ///
    /// Returns the provider error after notifying.
    pub async fn initialize(&mut self, types: &dyn AreaTypeProvider) -> Result<(), ProviderError> {
        self.renderer.install_basemaps(&self.basemaps);
        match types.area_types().await {
            Ok(area_types) => {
                self.registry.set_area_types(area_types);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "area types unavailable");
                self.notifier.notify(Notice::error(NOTICE_AREA_TYPES_FETCH_ERROR, e.to_string()));
                Err(e)
            }
        }
    }

    // --- Event loop ---

    /// Handle events until [`MapEvent::Shutdown`] arrives and in-flight work drains.
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            self.receive(message);
            if self.closing && self.in_flight == 0 {
                break;
            }
        }
        info!(rebuilds = self.compositor.rebuilds(), "map orchestrator stopped");
    }

    /// Receive and handle one message. Returns false if the channel closed.
    pub async fn step(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.receive(message);
                true
            }
            None => false,
        }
    }

    /// Handle events until no fetch or timer is outstanding.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            if !self.step().await {
                break;
            }
        }
    }

    /// Handle a single event.
    pub fn dispatch(&mut self, event: MapEvent) {
        match event {
            MapEvent::Toggle { type_id, checked } => {
                self.toggle(type_id, checked);
            }
            MapEvent::ViewportChanged(viewport) => self.set_viewport(viewport),
            MapEvent::ViewportFromRenderer => self.on_viewport_change(),
            MapEvent::Shutdown => self.closing = true,
        }
    }

    /// Handle a channel message. Completions settle one unit of in-flight work.
    fn receive(&mut self, message: Inbox) {
        match message {
            Inbox::Event(event) => self.dispatch(event),
            Inbox::AreasFetched { type_id, ticket, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.on_areas_fetched(type_id, ticket, result);
            }
            Inbox::InvalidateLayout => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.renderer.invalidate_size();
            }
        }
    }

    // --- UI entry points ---

    /// Enable or disable the layer for `type_id`.
    ///
    /// Enabling starts a fetch; the layer appears once the matching
    /// fetch completes and is handled by [`Orchestrator::step`] or [`Orchestrator::run`].
    pub fn toggle(&mut self, type_id: TypeId, checked: bool) -> ToggleOutcome {
        let outcome = self.registry.request(type_id, checked, self.tracker.zoom());
        match outcome {
            ToggleOutcome::Rejected { zoom_min, zoom } => {
                warn!(type_id, zoom_min, zoom, "layer unavailable at this zoom");
                self.notifier.notify(Notice::warning(
                    NOTICE_ZOOM_TOO_LOW,
                    format!("type {type_id} needs zoom {zoom_min}, map is at {zoom}"),
                ));
            }
            ToggleOutcome::FetchRequired(ticket) => self.spawn_fetch(type_id, ticket),
            ToggleOutcome::Removed => {
                info!(type_id, "layer disabled");
                self.recompose();
            }
            ToggleOutcome::Unchanged => debug!(type_id, "disable of absent layer"),
        }
        outcome
    }

    /// Re-read the extent from the renderer and rebuild.
    pub fn on_viewport_change(&mut self) {
        let viewport = self.renderer.viewport();
        self.set_viewport(viewport);
    }

    /// Track `viewport` and rebuild.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.tracker.update(viewport);
        self.recompose();
    }

    // --- Internals ---

    fn spawn_fetch(&mut self, type_id: TypeId, ticket: Ticket) {
        let query = AreaQuery::for_type(type_id, self.area_limit, self.simplify);
        let areas = Arc::clone(&self.areas);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = areas.areas(&query).await;
            if tx.send(Inbox::AreasFetched { type_id, ticket, result }).is_err() {
                debug!(type_id, ticket, "orchestrator gone before fetch resolved");
            }
        });
    }

    fn on_areas_fetched(&mut self, type_id: TypeId, ticket: Ticket, result: Result<Vec<AreaRecord>, ProviderError>) {
        let records = match result {
            Ok(records) => records,
            Err(e) => {
                if self.registry.abandon(type_id, ticket) {
                    warn!(type_id, ticket, error = %e, code = e.error_code(), "area fetch failed");
                    self.notifier.notify(Notice::error(NOTICE_AREAS_FETCH_ERROR, e.to_string()));
                } else {
                    debug!(type_id, ticket, error = %e, "superseded fetch failed");
                }
                return;
            }
        };

        if !self.registry.is_pending(type_id) {
            info!(type_id, ticket, "discarding areas for disabled layer");
            return;
        }

        let validated = validate_records(type_id, records);
        match self.registry.complete(type_id, ticket, validated.geometries) {
            Completion::Discarded => info!(type_id, ticket, "discarding superseded areas"),
            Completion::Inserted | Completion::Replaced => {
                info!(type_id, ticket, skipped = validated.skipped, "layer enabled");
                self.recompose();
            }
        }
    }

    fn recompose(&mut self) {
        let bounds = self.tracker.current_bounds();
        self.compositor
            .recompute(&self.registry, &mut self.colors, &bounds, self.renderer.as_mut());
        self.schedule_invalidate();
    }

    fn schedule_invalidate(&mut self) {
        let tx = self.tx.clone();
        let delay = self.invalidate_delay;
        self.in_flight += 1;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Inbox::InvalidateLayout).is_err() {
                debug!("orchestrator gone before layout invalidation");
            }
        });
    }

    // --- Queries ---

    /// The overlay currently on the map.
    #[must_use]
    pub fn current(&self) -> &FeatureCollection {
        self.compositor.current()
    }

    #[must_use]
    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    #[must_use]
    pub fn colors(&self) -> &ColorAssigner {
        &self.colors
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.tracker.current()
    }

    #[must_use]
    pub fn compositor(&self) -> &FeatureCompositor {
        &self.compositor
    }

    /// Fetches and timers not yet handled.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
