//! Annotation model and the authoritative store for the open image.
//!
//! [`AnnotationManager`] owns the ordered box list. Order is insertion order and
//! carries no meaning beyond keeping selection indices stable between redraws.
//! Every mutation validates its arguments before touching the list, so a failed
//! call leaves the set exactly as it was. Undo granularity is not decided here:
//! callers wrap mutations with [`crate::history::History::record`].

#[cfg(test)]
#[path = "annotations_test.rs"]
mod annotations_test;

use serde::{Deserialize, Serialize};

use crate::classes::ClassNames;
use crate::error::EditError;
use crate::geometry::NormBox;

/// One annotated region of the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Index into the external class-name list.
    pub class_id: u32,
    /// Normalized YOLO geometry.
    #[serde(flatten)]
    pub bbox: NormBox,
    /// Model score; `None` for manually drawn boxes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Annotation {
    #[must_use]
    pub fn new(class_id: u32, bbox: NormBox) -> Self {
        Self { class_id, bbox, confidence: None }
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Score used for filtering and labels. Manual boxes count as fully confident.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.confidence.unwrap_or(1.0)
    }

    /// Whether this box passes a confidence filter.
    #[must_use]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.score() >= threshold
    }
}

/// The annotation set for the current image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationManager {
    boxes: Vec<Annotation>,
}

impl AnnotationManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a box and return its index.
    pub fn add_box(&mut self, ann: Annotation) -> Result<usize, EditError> {
        ann.bbox.validate()?;
        self.boxes.push(ann);
        Ok(self.boxes.len() - 1)
    }

    /// Remove the box at `index`, returning it.
    pub fn remove_box(&mut self, index: usize) -> Result<Annotation, EditError> {
        self.check_index(index)?;
        Ok(self.boxes.remove(index))
    }

    /// Replace the box at `index` wholesale.
    pub fn update_box(&mut self, index: usize, ann: Annotation) -> Result<(), EditError> {
        self.check_index(index)?;
        ann.bbox.validate()?;
        self.boxes[index] = ann;
        Ok(())
    }

    /// Reassign the class of the box at `index`. Geometry and confidence are untouched.
    pub fn set_class(&mut self, index: usize, class_id: u32) -> Result<(), EditError> {
        self.check_index(index)?;
        self.boxes[index].class_id = class_id;
        Ok(())
    }

    /// Install a whole new set. Nothing changes if any box is invalid.
    pub fn replace_all(&mut self, boxes: Vec<Annotation>) -> Result<(), EditError> {
        for ann in &boxes {
            ann.bbox.validate()?;
        }
        self.boxes = boxes;
        Ok(())
    }

    /// Reorder boxes left to right by their left edge. Ties keep their relative order.
    pub fn sort_by_x(&mut self) {
        self.boxes.sort_by(|a, b| a.bbox.left().total_cmp(&b.bbox.left()));
    }

    /// Class names of the boxes passing `threshold`, read left to right, space separated.
    ///
    /// This is the plate reading shown over the image when boxes are characters.
    #[must_use]
    pub fn reading_text(&self, names: &ClassNames, threshold: f64) -> String {
        let mut ordered: Vec<&Annotation> = self.boxes.iter().filter(|ann| ann.is_visible(threshold)).collect();
        ordered.sort_by(|a, b| a.bbox.left().total_cmp(&b.bbox.left()));
        ordered
            .iter()
            .map(|ann| names.name(ann.class_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Copy of the current set, used for history snapshots.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Annotation> {
        self.boxes.clone()
    }

    /// Swap in a previously captured snapshot without re-validating it.
    pub(crate) fn restore(&mut self, boxes: Vec<Annotation>) -> Vec<Annotation> {
        std::mem::replace(&mut self.boxes, boxes)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.boxes.get(index)
    }

    #[must_use]
    pub fn boxes(&self) -> &[Annotation] {
        &self.boxes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.boxes.len() {
            Ok(())
        } else {
            Err(EditError::InvalidIndex { index, len: self.boxes.len() })
        }
    }
}
