//! Bounding-box editing core for Label Mender.
//!
//! This crate owns everything between raw input events and the annotation
//! data for one image: translating pointer and key events into box edits,
//! camera state for zoom and pan, hit-testing boxes and their resize handles,
//! and the undo/redo history behind every mutation. The host UI is responsible
//! only for wiring toolkit events to the controller, painting the
//! [`render::Scene`], and file I/O.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::CanvasController`]: the gesture state machine and host API |
//! | [`annotations`] | Box type and the authoritative [`annotations::AnnotationManager`] |
//! | [`history`] | Snapshot-based undo/redo |
//! | [`camera`] | Zoom/pan camera and image↔viewport conversions |
//! | [`geometry`] | Pixel rectangles, normalized boxes, resize and clamp math |
//! | [`hit`] | Hit-testing boxes and resize handles |
//! | [`input`] | Input event types and gesture states |
//! | [`render`] | Pure scene builder for renderers |
//! | [`yolo`] | YOLO text line codec |
//! | [`classes`] | Class-name lists from YAML or text |
//! | [`config`] | Tuning parsed from the environment |
//! | [`consts`] | Shared numeric defaults |
//! | [`error`] | Edit error kinds |

pub mod annotations;
pub mod camera;
pub mod classes;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod render;
pub mod yolo;
