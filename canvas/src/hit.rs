#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::annotations::Annotation;
use crate::camera::{Camera, Point};
use crate::geometry::{Rect, denormalize_box};

/// Which part of a box was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Inside the box, away from any handle: moves the box.
    Body,
    /// One of the eight resize handles.
    Handle(ResizeAnchor),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// All anchors, corners first, in hit-test priority order.
    pub const ALL: [ResizeAnchor; 8] = [Self::Nw, Self::Ne, Self::Sw, Self::Se, Self::N, Self::S, Self::W, Self::E];

    /// Viewport position of this handle on `rect`.
    #[must_use]
    pub fn position(self, rect: &Rect) -> Point {
        let c = rect.center();
        match self {
            Self::N => Point::new(c.x, rect.top),
            Self::Ne => Point::new(rect.right, rect.top),
            Self::E => Point::new(rect.right, c.y),
            Self::Se => Point::new(rect.right, rect.bottom),
            Self::S => Point::new(c.x, rect.bottom),
            Self::Sw => Point::new(rect.left, rect.bottom),
            Self::W => Point::new(rect.left, c.y),
            Self::Nw => Point::new(rect.left, rect.top),
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub index: usize,
    pub part: HitPart,
}

/// Everything needed to hit-test the current annotation set from the viewport.
#[derive(Debug, Clone, Copy)]
pub struct HitContext<'a> {
    pub boxes: &'a [Annotation],
    pub camera: &'a Camera,
    pub image_width: f64,
    pub image_height: f64,
    /// Boxes scoring below this are invisible and cannot be hit.
    pub confidence_threshold: f64,
    /// Handle tolerance in viewport pixels.
    pub handle_size: f64,
}

impl HitContext<'_> {
    /// Viewport rectangle of the box at `index`, if it exists.
    #[must_use]
    pub fn viewport_rect(&self, index: usize) -> Option<Rect> {
        let ann = self.boxes.get(index)?;
        let rect = denormalize_box(ann.bbox, self.image_width, self.image_height);
        Some(self.camera.rect_to_viewport(rect))
    }
}

/// Classify `pt` against a single viewport rectangle.
///
/// Corners are checked first, then edges, then the body, so a point sitting on
/// an edge resolves to the handle rather than to a move.
#[must_use]
pub fn hit_test_rect(pt: Point, rect: &Rect, handle_size: f64) -> Option<HitPart> {
    let hs = handle_size;
    let near = |a: f64, b: f64| (a - b).abs() <= hs;
    let within_x = pt.x >= rect.left && pt.x <= rect.right;
    let within_y = pt.y >= rect.top && pt.y <= rect.bottom;

    let anchor = if near(pt.x, rect.left) && near(pt.y, rect.top) {
        Some(ResizeAnchor::Nw)
    } else if near(pt.x, rect.right) && near(pt.y, rect.top) {
        Some(ResizeAnchor::Ne)
    } else if near(pt.x, rect.left) && near(pt.y, rect.bottom) {
        Some(ResizeAnchor::Sw)
    } else if near(pt.x, rect.right) && near(pt.y, rect.bottom) {
        Some(ResizeAnchor::Se)
    } else if within_x && near(pt.y, rect.top) {
        Some(ResizeAnchor::N)
    } else if within_x && near(pt.y, rect.bottom) {
        Some(ResizeAnchor::S)
    } else if within_y && near(pt.x, rect.left) {
        Some(ResizeAnchor::W)
    } else if within_y && near(pt.x, rect.right) {
        Some(ResizeAnchor::E)
    } else {
        None
    };

    match anchor {
        Some(anchor) => Some(HitPart::Handle(anchor)),
        None if rect.contains(pt) => Some(HitPart::Body),
        None => None,
    }
}

/// Test which box (if any) is under the viewport point `pt`.
///
/// The selected box wins when it is hit at all, including its handle zones
/// just outside the outline. Other boxes are tried topmost first (the last one
/// in the set draws on top) and only count when `pt` lies inside them. Boxes
/// hidden by the confidence filter are skipped entirely.
#[must_use]
pub fn hit_test(pt: Point, ctx: &HitContext<'_>, selected: Option<usize>) -> Option<Hit> {
    let visible = |index: usize| {
        ctx.boxes
            .get(index)
            .is_some_and(|ann| ann.is_visible(ctx.confidence_threshold))
    };

    if let Some(index) = selected.filter(|&i| visible(i)) {
        if let Some(part) = ctx
            .viewport_rect(index)
            .and_then(|rect| hit_test_rect(pt, &rect, ctx.handle_size))
        {
            return Some(Hit { index, part });
        }
    }

    (0..ctx.boxes.len())
        .rev()
        .filter(|&i| Some(i) != selected && visible(i))
        .find_map(|index| {
            let rect = ctx.viewport_rect(index).filter(|rect| rect.contains(pt))?;
            let part = hit_test_rect(pt, &rect, ctx.handle_size)?;
            Some(Hit { index, part })
        })
}
