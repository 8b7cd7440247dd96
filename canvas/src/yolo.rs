//! YOLO text annotation codec.
//!
//! One box per line: `class_id center_x center_y width height`, all spatial
//! values normalized. Model exports may append a sixth column with the
//! confidence score, which is read but never written back.

#[cfg(test)]
#[path = "yolo_test.rs"]
mod yolo_test;

use crate::annotations::Annotation;
use crate::error::EditError;
use crate::geometry::NormBox;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum YoloError {
    #[error("line {line}: expected at least 5 fields, found {found}")]
    MissingFields { line: usize, found: usize },
    #[error("line {line}: invalid class id `{value}`")]
    InvalidClass { line: usize, value: String },
    #[error("line {line}: invalid number `{value}`")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: box has non-positive size")]
    Degenerate { line: usize },
    #[error("line {line}: box lies outside the image")]
    OutOfFrame { line: usize },
}

/// Parse a whole annotation file. Blank lines are skipped.
pub fn parse(text: &str) -> Result<Vec<Annotation>, YoloError> {
    text.lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(i, raw)| parse_line(raw, i + 1))
        .collect()
}

/// Parse a single non-empty line. `line` is 1-based and only used in errors.
pub fn parse_line(raw: &str, line: usize) -> Result<Annotation, YoloError> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(YoloError::MissingFields { line, found: fields.len() });
    }

    let class_id = fields[0]
        .parse::<u32>()
        .map_err(|_| YoloError::InvalidClass { line, value: fields[0].to_string() })?;
    let number = |s: &str| match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(YoloError::InvalidNumber { line, value: s.to_string() }),
    };

    let bbox = NormBox::new(number(fields[1])?, number(fields[2])?, number(fields[3])?, number(fields[4])?);
    match bbox.validate() {
        Ok(()) => {}
        Err(EditError::OutOfFrame { .. }) => return Err(YoloError::OutOfFrame { line }),
        Err(_) => return Err(YoloError::Degenerate { line }),
    }

    let mut ann = Annotation::new(class_id, bbox);
    if let Some(conf) = fields.get(5) {
        ann.confidence = Some(number(conf)?);
    }
    Ok(ann)
}

/// Serialize boxes in YOLO line format with six decimals per value.
#[must_use]
pub fn format(boxes: &[Annotation]) -> String {
    boxes
        .iter()
        .map(|ann| {
            let b = ann.bbox;
            format!("{} {:.6} {:.6} {:.6} {:.6}\n", ann.class_id, b.cx, b.cy, b.w, b.h)
        })
        .collect()
}
