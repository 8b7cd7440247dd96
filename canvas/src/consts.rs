//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Viewport-space tolerance in pixels for corner and edge handles.
pub const HANDLE_SIZE_PX: f64 = 10.0;

/// Viewport distance a pressed pointer must travel before a click becomes a drag.
pub const MOVE_THRESHOLD_PX: f64 = 3.0;

// ── Box sizes ───────────────────────────────────────────────────

/// Smallest width/height a resized box may have, in image pixels.
pub const MIN_BOX_PX: f64 = 4.0;

/// Drawn boxes narrower or shorter than this (viewport pixels) are discarded.
pub const MIN_DRAW_PX: f64 = 5.0;

// ── Filtering ───────────────────────────────────────────────────

/// Confidence threshold applied to model boxes until the user changes it.
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

// ── Camera ──────────────────────────────────────────────────────

/// Lower zoom bound.
pub const MIN_ZOOM: f64 = 0.05;

/// Upper zoom bound.
pub const MAX_ZOOM: f64 = 40.0;

/// Zoom multiplier applied per 100 pixels of wheel delta.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
