//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Maximum distance in pixels between a query point and a segment or
/// polyline stroke for the point to count as a hit.
pub const HIT_TOLERANCE_PX: f64 = 3.0;

// ── Color ───────────────────────────────────────────────────────

/// Mask selecting the RGB bits of a packed color.
pub const RGB_MASK: u32 = 0x00FF_FFFF;

/// Opaque alpha channel applied when a color is packed for the wire.
pub const OPAQUE_ALPHA: u32 = 0xFF00_0000;
