#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn rect_approx_eq(a: Rect, b: Rect) -> bool {
    approx_eq(a.left, b.left) && approx_eq(a.top, b.top) && approx_eq(a.right, b.right) && approx_eq(a.bottom, b.bottom)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

const ALL_PARTS: [HitPart; 9] = [
    HitPart::Body,
    HitPart::Handle(ResizeAnchor::N),
    HitPart::Handle(ResizeAnchor::Ne),
    HitPart::Handle(ResizeAnchor::E),
    HitPart::Handle(ResizeAnchor::Se),
    HitPart::Handle(ResizeAnchor::S),
    HitPart::Handle(ResizeAnchor::Sw),
    HitPart::Handle(ResizeAnchor::W),
    HitPart::Handle(ResizeAnchor::Nw),
];

// =============================================================
// Rect
// =============================================================

#[test]
fn rect_from_corners_orders_edges() {
    let r = Rect::from_corners(pt(50.0, 10.0), pt(20.0, 40.0));
    assert_eq!(r, Rect::new(20.0, 10.0, 50.0, 40.0));
    assert_eq!(r.width(), 30.0);
    assert_eq!(r.height(), 30.0);
}

#[test]
fn rect_contains_is_inclusive() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(pt(10.0, 10.0)));
    assert!(r.contains(pt(0.0, 5.0)));
    assert!(!r.contains(pt(10.01, 5.0)));
}

// =============================================================
// NormBox validation
// =============================================================

#[test]
fn validate_accepts_positive_size() {
    assert!(NormBox::new(0.5, 0.5, 0.1, 0.1).validate().is_ok());
}

#[test]
fn validate_rejects_zero_and_negative_size() {
    assert!(matches!(
        NormBox::new(0.5, 0.5, 0.0, 0.1).validate(),
        Err(EditError::DegenerateGeometry { .. })
    ));
    assert!(NormBox::new(0.5, 0.5, 0.1, -0.1).validate().is_err());
}

#[test]
fn validate_rejects_box_outside_unit_square() {
    for (cx, cy) in [(1.5, 0.5), (-0.5, 0.5), (0.5, 1.2), (0.5, -0.2), (1.1, 1.1)] {
        let err = NormBox::new(cx, cy, 0.2, 0.2).validate().unwrap_err();
        assert!(matches!(err, EditError::OutOfFrame { .. }), "({cx}, {cy}) gave {err:?}");
    }
}

#[test]
fn validate_rejects_box_touching_frame_from_outside() {
    // Left edge exactly at 1.0 clamps to a zero-width rect.
    assert!(NormBox::new(1.1, 0.5, 0.2, 0.2).validate().is_err());
}

#[test]
fn validate_accepts_box_straddling_frame() {
    assert!(NormBox::new(0.95, 0.5, 0.2, 0.2).validate().is_ok());
    assert!(NormBox::new(0.0, 0.0, 0.1, 0.1).validate().is_ok());
}

#[test]
fn validate_rejects_non_finite() {
    assert!(NormBox::new(f64::NAN, 0.5, 0.1, 0.1).validate().is_err());
    assert!(NormBox::new(0.5, 0.5, f64::INFINITY, 0.1).validate().is_err());
}

// =============================================================
// normalize / denormalize
// =============================================================

#[test]
fn normalize_converts_to_center_format() {
    let n = normalize_box(Rect::new(40.0, 20.0, 60.0, 60.0), 100.0, 200.0);
    assert!(approx_eq(n.cx, 0.5));
    assert!(approx_eq(n.cy, 0.2));
    assert!(approx_eq(n.w, 0.2));
    assert!(approx_eq(n.h, 0.2));
}

#[test]
fn normalize_clamps_out_of_frame_rect() {
    let n = normalize_box(Rect::new(-50.0, -10.0, 50.0, 300.0), 100.0, 200.0);
    assert!(approx_eq(n.left(), 0.0));
    assert!(approx_eq(n.w, 0.5));
    assert!(approx_eq(n.cy, 0.5));
    assert!(approx_eq(n.h, 1.0));
}

#[test]
fn normalize_zero_image_is_degenerate() {
    let n = normalize_box(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 100.0);
    assert!(n.validate().is_err());
}

#[test]
fn denormalize_clamps_to_image() {
    let r = denormalize_box(NormBox::new(0.95, 0.5, 0.2, 0.2), 100.0, 100.0);
    assert!(rect_approx_eq(r, Rect::new(85.0, 40.0, 100.0, 60.0)));
}

#[test]
fn normalize_denormalize_round_trip() {
    let sizes = [(640.0, 480.0), (1.0, 1.0), (1920.0, 1080.0), (37.0, 913.0)];
    let fractions = [(0.0, 0.0, 1.0, 1.0), (0.1, 0.2, 0.3, 0.9), (0.45, 0.45, 0.55, 0.55), (0.7, 0.01, 0.99, 0.02)];
    for &(w, h) in &sizes {
        for &(l, t, r, b) in &fractions {
            let rect = Rect::new(l * w, t * h, r * w, b * h);
            let back = denormalize_box(normalize_box(rect, w, h), w, h);
            assert!(rect_approx_eq(back, rect), "image {w}x{h}: {rect:?} -> {back:?}");
        }
    }
}

// =============================================================
// resize_box
// =============================================================

#[test]
fn resize_body_translates() {
    let r = resize_box(Rect::new(10.0, 10.0, 20.0, 30.0), HitPart::Body, pt(5.0, -5.0), 4.0);
    assert_eq!(r, Rect::new(15.0, 5.0, 25.0, 25.0));
}

#[test]
fn resize_edge_moves_only_its_edge() {
    let r = resize_box(Rect::new(10.0, 10.0, 20.0, 30.0), HitPart::Handle(ResizeAnchor::E), pt(7.0, 99.0), 4.0);
    assert_eq!(r, Rect::new(10.0, 10.0, 27.0, 30.0));
    let r = resize_box(Rect::new(10.0, 10.0, 20.0, 30.0), HitPart::Handle(ResizeAnchor::N), pt(99.0, -3.0), 4.0);
    assert_eq!(r, Rect::new(10.0, 7.0, 20.0, 30.0));
}

#[test]
fn resize_corner_moves_two_edges() {
    let r = resize_box(Rect::new(10.0, 10.0, 20.0, 30.0), HitPart::Handle(ResizeAnchor::Nw), pt(-2.0, -4.0), 4.0);
    assert_eq!(r, Rect::new(8.0, 6.0, 20.0, 30.0));
}

#[test]
fn resize_se_past_nw_flips() {
    // Box (0.5, 0.5, 0.2, 0.2) on a 100x100 image.
    let original = Rect::new(40.0, 40.0, 60.0, 60.0);
    let r = resize_box(original, HitPart::Handle(ResizeAnchor::Se), pt(-40.0, -40.0), 4.0);
    assert!(r.width() > 0.0 && r.height() > 0.0);
    // The dragged corner is now the top-left; the old top-left is now the bottom-right.
    assert_eq!(r, Rect::new(20.0, 20.0, 40.0, 40.0));
}

#[test]
fn resize_to_opposite_edge_keeps_min_size() {
    let r = resize_box(Rect::new(10.0, 10.0, 20.0, 20.0), HitPart::Handle(ResizeAnchor::W), pt(9.0, 0.0), 4.0);
    assert!(approx_eq(r.width(), 4.0));
    assert_eq!(r.right, 20.0);
}

#[test]
fn resize_never_produces_non_positive_size() {
    let original = Rect::new(40.0, 40.0, 60.0, 60.0);
    let deltas = [-100.0, -40.0, -20.0, -19.999, -10.0, -0.5, 0.0, 0.5, 10.0, 20.0, 40.0, 100.0];
    for part in ALL_PARTS {
        for &dx in &deltas {
            for &dy in &deltas {
                let r = resize_box(original, part, pt(dx, dy), 4.0);
                assert!(r.width() > 0.0, "{part:?} ({dx},{dy}) -> {r:?}");
                assert!(r.height() > 0.0, "{part:?} ({dx},{dy}) -> {r:?}");
                if part != HitPart::Body {
                    assert!(r.width() >= 4.0 - EPSILON && r.height() >= 4.0 - EPSILON);
                }
            }
        }
    }
}

#[test]
fn resize_with_invalid_min_size_still_positive() {
    let r = resize_box(Rect::new(0.0, 0.0, 10.0, 10.0), HitPart::Handle(ResizeAnchor::E), pt(-10.0, 0.0), f64::NAN);
    assert!(r.width() > 0.0);
}

// =============================================================
// clamp_rect / translate_within
// =============================================================

#[test]
fn clamp_rect_keeps_inside_image() {
    let r = clamp_rect(Rect::new(-10.0, 5.0, 50.0, 120.0), 100.0, 100.0, 4.0);
    assert_eq!(r, Rect::new(0.0, 5.0, 50.0, 100.0));
}

#[test]
fn clamp_rect_restores_min_size_at_border() {
    let r = clamp_rect(Rect::new(-20.0, 98.0, -10.0, 130.0), 100.0, 100.0, 4.0);
    assert_eq!(r, Rect::new(0.0, 96.0, 4.0, 100.0));
}

#[test]
fn translate_within_preserves_size() {
    let r = translate_within(Rect::new(10.0, 10.0, 30.0, 20.0), -50.0, 200.0, 100.0, 100.0);
    assert_eq!(r, Rect::new(0.0, 90.0, 20.0, 100.0));
}

#[test]
fn translate_within_oversized_box_fills_image() {
    let r = translate_within(Rect::new(0.0, 0.0, 150.0, 10.0), 5.0, 0.0, 100.0, 100.0);
    assert_eq!(r, Rect::new(0.0, 0.0, 100.0, 10.0));
}
