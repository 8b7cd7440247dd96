#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn ann(class_id: u32, cx: f64) -> Annotation {
    Annotation::new(class_id, NormBox::new(cx, 0.5, 0.1, 0.1))
}

fn manager_with(boxes: &[Annotation]) -> AnnotationManager {
    let mut m = AnnotationManager::new();
    for b in boxes {
        m.add_box(*b).unwrap();
    }
    m
}

fn digits() -> ClassNames {
    ClassNames::from_text("zero\none\ntwo\nthree\n")
}

// =============================================================
// Annotation
// =============================================================

#[test]
fn manual_box_scores_one() {
    let a = ann(0, 0.5);
    assert_eq!(a.confidence, None);
    assert_eq!(a.score(), 1.0);
    assert!(a.is_visible(1.0));
}

#[test]
fn model_box_visibility_follows_threshold() {
    let a = ann(0, 0.5).with_confidence(0.4);
    assert!(a.is_visible(0.4));
    assert!(!a.is_visible(0.41));
}

#[test]
fn annotation_serializes_flat() {
    let json = serde_json::to_value(ann(3, 0.25)).unwrap();
    assert_eq!(json["class_id"], 3);
    assert_eq!(json["cx"], 0.25);
    assert!(json.get("confidence").is_none());
}

// =============================================================
// add / remove / update
// =============================================================

#[test]
fn add_box_returns_insertion_index() {
    let mut m = AnnotationManager::new();
    assert_eq!(m.add_box(ann(0, 0.1)).unwrap(), 0);
    assert_eq!(m.add_box(ann(1, 0.2)).unwrap(), 1);
    assert_eq!(m.len(), 2);
}

#[test]
fn add_box_rejects_degenerate() {
    let mut m = AnnotationManager::new();
    let bad = Annotation::new(0, NormBox::new(0.5, 0.5, 0.0, 0.1));
    assert!(matches!(m.add_box(bad), Err(EditError::DegenerateGeometry { .. })));
    assert!(m.is_empty());
}

#[test]
fn add_box_rejects_box_off_the_image() {
    let mut m = AnnotationManager::new();
    let off = Annotation::new(0, NormBox::new(1.5, 0.5, 0.2, 0.2));
    assert!(matches!(m.add_box(off), Err(EditError::OutOfFrame { .. })));
    assert!(m.is_empty());
}

#[test]
fn replace_all_rejects_box_off_the_image() {
    let mut m = manager_with(&[ann(0, 0.1)]);
    let off = Annotation::new(1, NormBox::new(0.5, -0.3, 0.2, 0.2));
    assert!(m.replace_all(vec![ann(2, 0.2), off]).is_err());
    assert_eq!(m.boxes(), &[ann(0, 0.1)]);
}

#[test]
fn remove_box_shifts_later_boxes() {
    let mut m = manager_with(&[ann(0, 0.1), ann(1, 0.2), ann(2, 0.3)]);
    let removed = m.remove_box(1).unwrap();
    assert_eq!(removed.class_id, 1);
    assert_eq!(m.boxes().iter().map(|a| a.class_id).collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn out_of_range_index_is_rejected_without_change() {
    let mut m = manager_with(&[ann(0, 0.1)]);
    let before = m.clone();
    assert_eq!(m.remove_box(1), Err(EditError::InvalidIndex { index: 1, len: 1 }));
    assert_eq!(m.update_box(5, ann(9, 0.9)), Err(EditError::InvalidIndex { index: 5, len: 1 }));
    assert_eq!(m.set_class(2, 4), Err(EditError::InvalidIndex { index: 2, len: 1 }));
    assert_eq!(m, before);
}

#[test]
fn update_box_replaces_in_place() {
    let mut m = manager_with(&[ann(0, 0.1), ann(1, 0.2)]);
    m.update_box(0, ann(7, 0.6)).unwrap();
    assert_eq!(m.get(0), Some(&ann(7, 0.6)));
    assert_eq!(m.get(1), Some(&ann(1, 0.2)));
}

#[test]
fn update_box_rejects_degenerate_without_change() {
    let mut m = manager_with(&[ann(0, 0.1)]);
    let bad = Annotation::new(0, NormBox::new(0.5, 0.5, 0.1, -1.0));
    assert!(m.update_box(0, bad).is_err());
    assert_eq!(m.get(0), Some(&ann(0, 0.1)));
}

// =============================================================
// set_class
// =============================================================

#[test]
fn set_class_changes_only_class_id() {
    let original = Annotation::new(2, NormBox::new(0.123_456_789, 0.987_654_321, 0.011, 0.333)).with_confidence(0.77);
    let mut m = manager_with(&[original]);
    m.set_class(0, 5).unwrap();
    let after = *m.get(0).unwrap();
    assert_eq!(after.class_id, 5);
    assert_eq!(after.bbox.cx.to_bits(), original.bbox.cx.to_bits());
    assert_eq!(after.bbox.cy.to_bits(), original.bbox.cy.to_bits());
    assert_eq!(after.bbox.w.to_bits(), original.bbox.w.to_bits());
    assert_eq!(after.bbox.h.to_bits(), original.bbox.h.to_bits());
    assert_eq!(after.confidence.map(f64::to_bits), original.confidence.map(f64::to_bits));
}

// =============================================================
// replace_all
// =============================================================

#[test]
fn replace_all_swaps_set() {
    let mut m = manager_with(&[ann(0, 0.1)]);
    m.replace_all(vec![ann(4, 0.4), ann(5, 0.5)]).unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(0).map(|a| a.class_id), Some(4));
}

#[test]
fn replace_all_is_all_or_nothing() {
    let mut m = manager_with(&[ann(0, 0.1)]);
    let bad = Annotation::new(0, NormBox::new(0.5, 0.5, f64::NAN, 0.1));
    assert!(m.replace_all(vec![ann(4, 0.4), bad]).is_err());
    assert_eq!(m.boxes(), &[ann(0, 0.1)]);
}

// =============================================================
// sort / reading text
// =============================================================

#[test]
fn sort_by_x_orders_by_left_edge() {
    let mut m = manager_with(&[ann(3, 0.8), ann(1, 0.2), ann(2, 0.5)]);
    m.sort_by_x();
    assert_eq!(m.boxes().iter().map(|a| a.class_id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn sort_by_x_uses_left_edge_not_center() {
    let wide = Annotation::new(0, NormBox::new(0.5, 0.5, 0.8, 0.1));
    let narrow = Annotation::new(1, NormBox::new(0.3, 0.5, 0.1, 0.1));
    let mut m = manager_with(&[narrow, wide]);
    m.sort_by_x();
    assert_eq!(m.get(0).map(|a| a.class_id), Some(0));
}

#[test]
fn reading_text_reads_left_to_right_without_reordering() {
    let m = manager_with(&[ann(3, 0.8), ann(1, 0.2), ann(2, 0.5)]);
    assert_eq!(m.reading_text(&digits(), 0.0), "one two three");
    assert_eq!(m.get(0).map(|a| a.class_id), Some(3));
}

#[test]
fn reading_text_skips_filtered_and_falls_back_for_unknown_names() {
    let m = manager_with(&[ann(1, 0.2), ann(2, 0.5).with_confidence(0.1), ann(42, 0.9)]);
    assert_eq!(m.reading_text(&digits(), 0.5), "one Class 42");
}

#[test]
fn reading_text_empty_set() {
    assert_eq!(AnnotationManager::new().reading_text(&digits(), 0.0), "");
}
