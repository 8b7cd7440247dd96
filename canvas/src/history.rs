//! Linear undo/redo history over annotation-set mutations.
//!
//! DESIGN
//! ======
//! Each entry is a whole-set snapshot taken before the mutation, so undo and
//! redo swap complete sets and never replay individual edits. The controller
//! commits once per completed gesture, never per pointer-move frame.
//!
//! Depth is unbounded within an image session. [`History::reset`] establishes a
//! new baseline on image load and on save, so undo never crosses images.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::annotations::{Annotation, AnnotationManager};
use crate::error::{EditError, HistoryDirection};

#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Vec<Annotation>>,
    redo_stack: Vec<Vec<Annotation>>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a pre-mutation snapshot and invalidate the redo branch.
    pub fn commit(&mut self, before: Vec<Annotation>) {
        self.undo_stack.push(before);
        self.redo_stack.clear();
        tracing::debug!(undo_depth = self.undo_stack.len(), "history commit");
    }

    /// Run `op` against `annotations` as one undoable unit.
    ///
    /// The snapshot is only committed when `op` succeeds; mutations are
    /// all-or-nothing, so a failed `op` leaves both the set and the history
    /// untouched.
    pub fn record<T>(
        &mut self,
        annotations: &mut AnnotationManager,
        op: impl FnOnce(&mut AnnotationManager) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let before = annotations.snapshot();
        let out = op(annotations)?;
        self.commit(before);
        Ok(out)
    }

    /// Restore the most recent snapshot, moving the current set onto the redo stack.
    pub fn undo<'a>(&mut self, annotations: &'a mut AnnotationManager) -> Result<&'a [Annotation], EditError> {
        let previous = self
            .undo_stack
            .pop()
            .ok_or(EditError::EmptyHistory(HistoryDirection::Undo))?;
        let current = annotations.restore(previous);
        self.redo_stack.push(current);
        tracing::debug!(undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo");
        Ok(annotations.boxes())
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo<'a>(&mut self, annotations: &'a mut AnnotationManager) -> Result<&'a [Annotation], EditError> {
        let next = self
            .redo_stack
            .pop()
            .ok_or(EditError::EmptyHistory(HistoryDirection::Redo))?;
        let current = annotations.restore(next);
        self.undo_stack.push(current);
        tracing::debug!(undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo");
        Ok(annotations.boxes())
    }

    /// Drop both stacks.
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
