//! Box geometry: pixel rectangles, normalized YOLO boxes, and the resize math.
//!
//! Two representations are used throughout the crate:
//!
//! - [`Rect`] holds edges in image pixel space. All drag and resize math happens
//!   here because the minimum box size is expressed in pixels.
//! - [`NormBox`] holds the YOLO center/size form normalized to `[0, 1]`. This is
//!   what the annotation store keeps and what gets written to disk.
//!
//! Conversions clamp to the image so that a pointer dragged outside the frame
//! can never produce out-of-range stored coordinates.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::error::EditError;
use crate::hit::{HitPart, ResizeAnchor};

/// Axis-aligned rectangle in image pixel coordinates. `left <= right`, `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rectangle spanning two arbitrary corner points.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// A YOLO box: center and size normalized to the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormBox {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl NormBox {
    #[must_use]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self { cx, cy, w, h }
    }

    /// Reject boxes that cannot be stored: non-finite values, a non-positive
    /// size, or an extent that misses the unit square and so clamps to nothing.
    pub fn validate(&self) -> Result<(), EditError> {
        let finite = [self.cx, self.cy, self.w, self.h].iter().all(|v| v.is_finite());
        if !finite || self.w <= 0.0 || self.h <= 0.0 {
            return Err(EditError::DegenerateGeometry { width: self.w, height: self.h });
        }
        let (half_w, half_h) = (self.w / 2.0, self.h / 2.0);
        let overlaps_x = self.cx - half_w < 1.0 && self.cx + half_w > 0.0;
        let overlaps_y = self.cy - half_h < 1.0 && self.cy + half_h > 0.0;
        if !overlaps_x || !overlaps_y {
            return Err(EditError::OutOfFrame { cx: self.cx, cy: self.cy });
        }
        Ok(())
    }

    /// Left edge in normalized units.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.cx - self.w / 2.0
    }
}

/// Convert a pixel rectangle into a normalized box, clamping it to the image.
#[must_use]
pub fn normalize_box(rect: Rect, image_width: f64, image_height: f64) -> NormBox {
    if image_width <= 0.0 || image_height <= 0.0 {
        return NormBox::default();
    }
    let left = rect.left.clamp(0.0, image_width) / image_width;
    let right = rect.right.clamp(0.0, image_width) / image_width;
    let top = rect.top.clamp(0.0, image_height) / image_height;
    let bottom = rect.bottom.clamp(0.0, image_height) / image_height;
    NormBox {
        cx: (left + right) / 2.0,
        cy: (top + bottom) / 2.0,
        w: right - left,
        h: bottom - top,
    }
}

/// Convert a normalized box into a pixel rectangle, clamping it to the image.
#[must_use]
pub fn denormalize_box(norm: NormBox, image_width: f64, image_height: f64) -> Rect {
    let left = (norm.cx - norm.w / 2.0) * image_width;
    let right = (norm.cx + norm.w / 2.0) * image_width;
    let top = (norm.cy - norm.h / 2.0) * image_height;
    let bottom = (norm.cy + norm.h / 2.0) * image_height;
    Rect {
        left: left.clamp(0.0, image_width.max(0.0)),
        top: top.clamp(0.0, image_height.max(0.0)),
        right: right.clamp(0.0, image_width.max(0.0)),
        bottom: bottom.clamp(0.0, image_height.max(0.0)),
    }
}

/// Apply a pointer delta (image pixels) to a box through the given hit part.
///
/// `Body` translates the whole box. A resize anchor moves only its edge(s).
/// When a dragged edge crosses the opposite edge the box flips instead of
/// inverting, and neither dimension ever drops below `min_size`.
#[must_use]
pub fn resize_box(rect: Rect, part: HitPart, delta: Point, min_size: f64) -> Rect {
    let min_size = if min_size.is_finite() && min_size > 0.0 { min_size } else { f64::EPSILON };
    let anchor = match part {
        HitPart::Body => return rect.translate(delta.x, delta.y),
        HitPart::Handle(anchor) => anchor,
    };

    let (left, right) = match anchor {
        ResizeAnchor::W | ResizeAnchor::Nw | ResizeAnchor::Sw => span(rect.left + delta.x, rect.right, min_size),
        ResizeAnchor::E | ResizeAnchor::Ne | ResizeAnchor::Se => span(rect.right + delta.x, rect.left, min_size),
        ResizeAnchor::N | ResizeAnchor::S => (rect.left, rect.right),
    };
    let (top, bottom) = match anchor {
        ResizeAnchor::N | ResizeAnchor::Nw | ResizeAnchor::Ne => span(rect.top + delta.y, rect.bottom, min_size),
        ResizeAnchor::S | ResizeAnchor::Sw | ResizeAnchor::Se => span(rect.bottom + delta.y, rect.top, min_size),
        ResizeAnchor::E | ResizeAnchor::W => (rect.top, rect.bottom),
    };
    Rect { left, top, right, bottom }
}

/// Order a moving edge against a fixed one, keeping them at least `min_size` apart.
fn span(moving: f64, fixed: f64, min_size: f64) -> (f64, f64) {
    if moving < fixed {
        (moving.min(fixed - min_size), fixed)
    } else {
        (fixed, moving.max(fixed + min_size))
    }
}

/// Clamp a rectangle into the image while keeping at least `min_size` on each axis.
#[must_use]
pub fn clamp_rect(rect: Rect, image_width: f64, image_height: f64, min_size: f64) -> Rect {
    let (left, right) = clamp_span(rect.left, rect.right, image_width, min_size);
    let (top, bottom) = clamp_span(rect.top, rect.bottom, image_height, min_size);
    Rect { left, top, right, bottom }
}

fn clamp_span(lo: f64, hi: f64, limit: f64, min_size: f64) -> (f64, f64) {
    let limit = limit.max(0.0);
    let min_size = min_size.min(limit);
    let mut lo = lo.clamp(0.0, limit);
    let mut hi = hi.clamp(0.0, limit);
    if hi - lo < min_size {
        if lo + min_size <= limit {
            hi = lo + min_size;
        } else {
            lo = limit - min_size;
            hi = limit;
        }
    }
    (lo, hi)
}

/// Move a rectangle by `(dx, dy)` and shift it back inside the image, preserving its size.
#[must_use]
pub fn translate_within(rect: Rect, dx: f64, dy: f64, image_width: f64, image_height: f64) -> Rect {
    let (left, right) = shift_span(rect.left, rect.right, dx, image_width);
    let (top, bottom) = shift_span(rect.top, rect.bottom, dy, image_height);
    Rect { left, top, right, bottom }
}

fn shift_span(lo: f64, hi: f64, d: f64, limit: f64) -> (f64, f64) {
    let size = hi - lo;
    if size >= limit {
        return (0.0, limit.max(0.0));
    }
    let lo = (lo + d).clamp(0.0, limit - size);
    (lo, lo + size)
}
