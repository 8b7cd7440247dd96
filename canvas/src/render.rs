//! Scene building: everything a renderer needs for one frame, in viewport pixels.
//!
//! The core never draws. [`build_scene`] reads the controller's state and
//! produces plain values that any toolkit can paint: box outlines with labels,
//! handle squares for the selected box, the live preview of a gesture, and the
//! left-to-right reading text. It does not mutate any state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::classes::ClassNames;
use crate::engine::{CanvasController, Preview};
use crate::geometry::{Rect, denormalize_box};
use crate::hit::ResizeAnchor;

/// One visible box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxView {
    /// Index in the annotation set.
    pub index: usize,
    /// Outline in viewport pixels (reflects an in-progress drag).
    pub rect: Rect,
    pub class_id: u32,
    /// `"{class name} {score:.2}"`.
    pub label: String,
    pub selected: bool,
}

/// A resize handle square on the selected box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleView {
    pub anchor: ResizeAnchor,
    pub rect: Rect,
}

/// Dashed outline of a box being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPreview {
    pub rect: Rect,
    /// `"New: {class name}"`.
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Where the image itself lands in the viewport.
    pub image_rect: Rect,
    /// Visible boxes in set order (later boxes paint on top).
    pub boxes: Vec<BoxView>,
    /// Handles of the selected box; empty when nothing is selected.
    pub handles: Vec<HandleView>,
    pub drawing: Option<DrawPreview>,
    /// Class names of visible boxes read left to right.
    pub reading: String,
}

/// Build the frame for the controller's current state.
#[must_use]
pub fn build_scene(controller: &CanvasController, names: &ClassNames) -> Scene {
    let camera = controller.camera();
    let (image_w, image_h) = controller.image_size();
    let threshold = controller.ui().confidence_threshold;
    let selected = controller.selection();
    let preview = controller.preview();

    let boxes: Vec<BoxView> = controller
        .annotations()
        .boxes()
        .iter()
        .enumerate()
        .filter(|(_, ann)| ann.is_visible(threshold))
        .map(|(index, ann)| {
            let image_rect = match preview {
                Some(Preview::Edit { index: editing, rect }) if editing == index => rect,
                _ => denormalize_box(ann.bbox, image_w, image_h),
            };
            BoxView {
                index,
                rect: camera.rect_to_viewport(image_rect),
                class_id: ann.class_id,
                label: format!("{} {:.2}", names.name(ann.class_id), ann.score()),
                selected: selected == Some(index),
            }
        })
        .collect();

    let half = controller.config().handle_size_px / 2.0;
    let handles = boxes
        .iter()
        .find(|view| view.selected)
        .map(|view| {
            ResizeAnchor::ALL
                .iter()
                .map(|&anchor| {
                    let p = anchor.position(&view.rect);
                    HandleView { anchor, rect: Rect::new(p.x - half, p.y - half, p.x + half, p.y + half) }
                })
                .collect()
        })
        .unwrap_or_default();

    let drawing = match preview {
        Some(Preview::Draw { rect }) => Some(DrawPreview {
            rect: camera.rect_to_viewport(rect),
            label: format!("New: {}", names.name(controller.ui().default_class)),
        }),
        _ => None,
    };

    Scene {
        image_rect: camera.rect_to_viewport(Rect::new(0.0, 0.0, image_w, image_h)),
        boxes,
        handles,
        drawing,
        reading: controller.annotations().reading_text(names, threshold),
    }
}
