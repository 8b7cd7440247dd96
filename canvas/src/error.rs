//! Error kinds shared by the annotation store and the undo history.
//!
//! None of these are meant to reach the user as a failure. The controller
//! treats each one as "nothing happened" and logs it.

use std::fmt;

/// Which history stack an undo/redo request targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undo => f.write_str("undo"),
            Self::Redo => f.write_str("redo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// A mutation referenced a box that does not exist.
    #[error("box index {index} out of range (set has {len} boxes)")]
    InvalidIndex { index: usize, len: usize },
    /// A box would be stored with a non-positive or non-finite size.
    #[error("degenerate box geometry: width={width}, height={height}")]
    DegenerateGeometry { width: f64, height: f64 },
    /// A box lies entirely outside the image and would clamp to zero size.
    #[error("box centered at ({cx}, {cy}) lies outside the image")]
    OutOfFrame { cx: f64, cy: f64 },
    /// Undo or redo was requested with nothing on the stack.
    #[error("nothing to {0}")]
    EmptyHistory(HistoryDirection),
}
