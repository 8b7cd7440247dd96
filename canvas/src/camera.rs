#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::geometry::Rect;

/// A point in either viewport or image space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }

    /// Euclidean length of the vector from the origin.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Camera state mapping image pixels onto the viewport.
///
/// `pan_x` / `pan_y` are the viewport position of the image origin.
/// `zoom` is viewport pixels per image pixel (1.0 = actual size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Fit an image inside a viewport, keeping its aspect ratio and centering it.
    ///
    /// Degenerate sizes yield the identity camera.
    #[must_use]
    pub fn fit(image_width: f64, image_height: f64, viewport_width: f64, viewport_height: f64) -> Self {
        if image_width <= 0.0 || image_height <= 0.0 || viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Self::default();
        }
        let zoom = (viewport_width / image_width).min(viewport_height / image_height);
        Self {
            pan_x: (viewport_width - image_width * zoom) / 2.0,
            pan_y: (viewport_height - image_height * zoom) / 2.0,
            zoom,
        }
    }

    /// Convert a viewport-space point to image pixel coordinates.
    #[must_use]
    pub fn viewport_to_image(&self, viewport: Point) -> Point {
        Point {
            x: (viewport.x - self.pan_x) / self.zoom,
            y: (viewport.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert an image-space point to viewport coordinates.
    #[must_use]
    pub fn image_to_viewport(&self, image: Point) -> Point {
        Point {
            x: image.x * self.zoom + self.pan_x,
            y: image.y * self.zoom + self.pan_y,
        }
    }

    /// Scale the zoom by `factor`, keeping the image point under `anchor` fixed.
    ///
    /// A fitted zoom already outside `[MIN_ZOOM, MAX_ZOOM]` widens the range, so
    /// zooming out never jumps in and zooming in never jumps out.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let pinned = self.viewport_to_image(anchor);
        let (floor, ceiling) = (MIN_ZOOM.min(self.zoom), MAX_ZOOM.max(self.zoom));
        self.zoom = (self.zoom * factor).clamp(floor, ceiling);
        self.pan_x = anchor.x - pinned.x * self.zoom;
        self.pan_y = anchor.y - pinned.y * self.zoom;
    }
}

impl Camera {
    /// Map an image-space rectangle into viewport space.
    #[must_use]
    pub fn rect_to_viewport(&self, rect: Rect) -> Rect {
        let tl = self.image_to_viewport(Point::new(rect.left, rect.top));
        let br = self.image_to_viewport(Point::new(rect.right, rect.bottom));
        Rect::from_corners(tl, br)
    }
}
