//! Enabled area layers and the bookkeeping for in-flight fetches.
//!
//! DESIGN
//! ======
//! Entries are kept in a `Vec` so iteration follows insertion order; that
//! order decides which palette slot each layer receives, so it must be
//! stable. There is at most one entry per type id.
//!
//! Enabling a layer is two-phase. [`LayerRegistry::request`] checks the zoom
//! floor and hands back a ticket; the geometry fetch runs elsewhere and
//! reports back through [`LayerRegistry::complete`]. A result is applied only
//! if its ticket is still the pending one for that type, so a fetch that
//! resolves after the user unchecked the layer (or re-checked it, starting a
//! newer fetch) is discarded instead of resurrecting stale state.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use tracing::{debug, info};

use crate::TypeId;
use crate::geometry::Geometry;
use crate::provider::AreaType;

/// Identifies one toggle-on request.
pub type Ticket = u64;

/// A toggled-on area type and its fetched geometries.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEntry {
    pub type_id: TypeId,
    pub geometries: Vec<Geometry>,
}

/// Result of a toggle request against the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleOutcome {
    /// Below the type's minimum zoom. Nothing changed.
    Rejected { zoom_min: f64, zoom: f64 },
    /// Geometries must be fetched; report them back with this ticket.
    FetchRequired(Ticket),
    /// The layer was enabled and has been removed.
    Removed,
    /// Disable for a layer that was not present.
    Unchanged,
}

/// Result of reporting a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A new entry was appended.
    Inserted,
    /// An existing entry for the type was replaced in place.
    Replaced,
    /// The ticket is no longer pending; the geometries were dropped.
    Discarded,
}

#[derive(Default)]
pub struct LayerRegistry {
    entries: Vec<LayerEntry>,
    area_types: HashMap<TypeId, AreaType>,
    pending: HashMap<TypeId, Ticket>,
    next_ticket: Ticket,
}

impl LayerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the area type reference data.
    pub fn set_area_types(&mut self, types: Vec<AreaType>) {
        self.area_types = types.into_iter().map(|t| (t.id, t)).collect();
        info!(count = self.area_types.len(), "area types loaded");
    }

    #[must_use]
    pub fn area_type(&self, type_id: TypeId) -> Option<&AreaType> {
        self.area_types.get(&type_id)
    }

    /// Minimum zoom for `type_id`. `None` when the type is unknown or has no floor.
    #[must_use]
    pub fn zoom_min(&self, type_id: TypeId) -> Option<f64> {
        self.area_types.get(&type_id).and_then(|t| t.zoom_min)
    }

    /// Start a toggle for `type_id` at the current map `zoom`.
    pub fn request(&mut self, type_id: TypeId, enabled: bool, zoom: f64) -> ToggleOutcome {
        if !enabled {
            self.pending.remove(&type_id);
            return if self.remove(type_id) { ToggleOutcome::Removed } else { ToggleOutcome::Unchanged };
        }

        if let Some(zoom_min) = self.zoom_min(type_id) {
            if zoom < zoom_min {
                return ToggleOutcome::Rejected { zoom_min, zoom };
            }
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending.insert(type_id, ticket);
        debug!(type_id, ticket, "layer fetch requested");
        ToggleOutcome::FetchRequired(ticket)
    }

    /// Apply the geometries fetched for `ticket`.
    pub fn complete(&mut self, type_id: TypeId, ticket: Ticket, geometries: Vec<Geometry>) -> Completion {
        if self.pending.get(&type_id) != Some(&ticket) {
            return Completion::Discarded;
        }
        self.pending.remove(&type_id);

        let entry = LayerEntry { type_id, geometries };
        if let Some(slot) = self.entries.iter_mut().find(|e| e.type_id == type_id) {
            *slot = entry;
            Completion::Replaced
        } else {
            self.entries.push(entry);
            Completion::Inserted
        }
    }

    /// Drop the pending request for `ticket` without touching entries.
    ///
    /// Returns false if the ticket had already been superseded.
    pub fn abandon(&mut self, type_id: TypeId, ticket: Ticket) -> bool {
        if self.pending.get(&type_id) == Some(&ticket) {
            self.pending.remove(&type_id);
            true
        } else {
            false
        }
    }

    /// Remove the entry for `type_id`. Returns whether one was present.
    pub fn remove(&mut self, type_id: TypeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.type_id != type_id);
        self.entries.len() != before
    }

    /// Enabled layers in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LayerEntry] {
        &self.entries
    }

    #[must_use]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.entries.iter().any(|e| e.type_id == type_id)
    }

    #[must_use]
    pub fn is_pending(&self, type_id: TypeId) -> bool {
        self.pending.contains_key(&type_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
