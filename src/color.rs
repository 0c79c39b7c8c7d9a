//! Stable per-layer colors.
//!
//! DESIGN
//! ======
//! Colors are handed out lazily, the first time a layer is composed. The
//! palette is scanned in order and the first entry no existing assignment
//! uses wins; once the palette is exhausted a random 24-bit color is
//! generated instead. Assignments are never removed, so a layer toggled off
//! and back on gets its old color back for the lifetime of the widget.
//!
//! TRADE-OFFS
//! ==========
//! Generated colors are not checked for collisions with the palette or with
//! each other. Two layers may end up visually identical once more than
//! `palette.len()` types are in play.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::TypeId;
use crate::consts::{DEFAULT_PALETTE, RGB_SPACE};

/// CSS color string (`#rrggbb`).
pub type Color = String;

pub struct ColorAssigner {
    palette: Vec<Color>,
    assignments: HashMap<TypeId, Color>,
    rng: StdRng,
}

impl ColorAssigner {
    /// Assigner over `palette`, seeding the fallback generator from the OS.
    #[must_use]
    pub fn new(palette: Vec<Color>) -> Self {
        Self::with_rng(palette, StdRng::from_os_rng())
    }

    /// Assigner with an explicit generator, for reproducible fallback colors.
    #[must_use]
    pub fn with_rng(palette: Vec<Color>, rng: StdRng) -> Self {
        Self { palette, assignments: HashMap::new(), rng }
    }

    /// Color for `type_id`, allocating one on first request.
    pub fn assign(&mut self, type_id: TypeId) -> Color {
        if let Some(color) = self.assignments.get(&type_id) {
            return color.clone();
        }

        let color = self
            .palette
            .iter()
            .find(|candidate| !self.assignments.values().any(|used| used == *candidate))
            .cloned()
            .unwrap_or_else(|| random_color(&mut self.rng));

        tracing::debug!(type_id, %color, "color assigned");
        self.assignments.insert(type_id, color.clone());
        color
    }

    /// Previously assigned color, without allocating.
    #[must_use]
    pub fn get(&self, type_id: TypeId) -> Option<&str> {
        self.assignments.get(&type_id).map(String::as_str)
    }

    #[must_use]
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Number of type ids that have ever received a color.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect())
    }
}

/// Random `#rrggbb` color: a fraction in `[0, 1)` scaled into 24-bit RGB.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn random_color(rng: &mut StdRng) -> Color {
    let fraction: f64 = rng.random();
    let rgb = (fraction * RGB_SPACE) as u32;
    format!("#{rgb:06x}")
}
