//! Input model: tools, modifier keys, pointer buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the canvas controller. `Tool` and
//! `Modifiers` capture the user's intent at the time of an event. `InputState`
//! is the active gesture tracked between pointer-down and pointer-up, carrying
//! everything needed to compute the live preview and the single committed
//! mutation on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::DEFAULT_CONFIDENCE;
use crate::geometry::Rect;
use crate::hit::HitPart;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, move and resize existing boxes (default).
    #[default]
    Select,
    /// Drags on empty canvas draw new boxes.
    Draw,
}

/// Keyboard/mouse modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Any other button; the canvas ignores it.
    Other,
}

/// A keyboard key, named the way the host toolkit reports it (e.g. `"Delete"`, `"z"`, `"3"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }

    /// Class id selected by a digit key: `1`..`9` map to 0..8, `0` maps to 9.
    #[must_use]
    pub fn digit_class(&self) -> Option<u32> {
        let mut chars = self.0.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        match c.to_digit(10)? {
            0 => Some(9),
            d => Some(d - 1),
        }
    }
}

/// Vertical wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Index of the selected box, if any.
    pub selected: Option<usize>,
    /// Class assigned to newly drawn boxes.
    pub default_class: u32,
    /// Boxes scoring below this are hidden and unselectable.
    pub confidence_threshold: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Select,
            selected: None,
            default_class: 0,
            confidence_threshold: DEFAULT_CONFIDENCE,
        }
    }
}

/// A move or resize gesture on one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Index of the box being edited.
    pub index: usize,
    /// Body (move) or the resize handle that was grabbed.
    pub part: HitPart,
    /// Viewport position of the pointer-down, used for the move threshold.
    pub start_viewport: Point,
    /// Image-space position of the pointer-down; deltas are measured from here.
    pub start_image: Point,
    /// Box rectangle (image pixels) when the gesture began.
    pub original: Rect,
    /// Live preview rectangle (image pixels), not yet committed.
    pub current: Rect,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down on a box but has not moved past the drag threshold.
    Selecting { session: DragSession },
    /// Moving a box.
    DraggingBody { session: DragSession },
    /// Resizing a box through one of its handles.
    DraggingHandle { session: DragSession },
    /// Drawing a new box from an anchor corner.
    DrawingNewBox {
        /// Image-space corner where the drag started.
        anchor_image: Point,
        /// Image-space position of the latest pointer event.
        current_image: Point,
    },
}

impl InputState {
    /// Whether a pointer gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
