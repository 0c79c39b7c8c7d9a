//! Shared constants for the compositor.

// ── Colors ──────────────────────────────────────────────────────

/// Palette handed out, in order, before falling back to generated colors.
pub const DEFAULT_PALETTE: [&str; 5] = ["#6B8E23", "#8B0000", "#FF8C00", "#800080", "#4682B4"];

/// Size of the 24-bit RGB space used by the fallback color generator.
pub const RGB_SPACE: f64 = 16_777_215.0;

// ── Feature style template ──────────────────────────────────────

/// Stroke opacity applied to every area outline.
pub const STROKE_OPACITY: f64 = 0.4;

/// Fill opacity applied to every area interior.
pub const FILL_OPACITY: f64 = 0.1;

/// Polyline simplification factor passed through to the renderer.
pub const SMOOTH_FACTOR: f64 = 0.1;

/// `properties.name` stamped on every composed feature.
pub const FEATURE_NAME: &str = "Multipolygon";

// ── Timing / limits ─────────────────────────────────────────────

/// Delay before asking the renderer to re-measure its container after a layer swap.
pub const DEFAULT_INVALIDATE_DELAY_MS: u64 = 50;

/// Maximum number of areas requested per toggle.
pub const DEFAULT_AREA_LIMIT: u32 = 100_000;

// ── Notice keys ─────────────────────────────────────────────────

/// Translation key for a toggle attempted below the type's minimum zoom.
pub const NOTICE_ZOOM_TOO_LOW: &str = "Map.ZoomTooLow";

/// Translation key for a failed geometry fetch.
pub const NOTICE_AREAS_FETCH_ERROR: &str = "Map.AreasFetchError";

/// Translation key for a failed area-type fetch.
pub const NOTICE_AREA_TYPES_FETCH_ERROR: &str = "Map.AreaTypesFetchError";
