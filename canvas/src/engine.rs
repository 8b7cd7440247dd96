//! Canvas controller: turns pointer and key events into box edits.
//!
//! Every handler is a transition of the gesture state machine in
//! [`crate::input::InputState`]. Handlers mutate the annotation set through
//! [`History::record`] at most once per completed gesture and return the side
//! effects the host must carry out as a list of [`Action`]s. Nothing here draws;
//! renderers read the accessors or call [`crate::render::build_scene`].

use crate::annotations::{Annotation, AnnotationManager};
use crate::camera::{Camera, Point};
use crate::config::CanvasConfig;
use crate::consts::WHEEL_ZOOM_STEP;
use crate::error::EditError;
use crate::geometry::{Rect, clamp_rect, denormalize_box, normalize_box, resize_box, translate_within};
use crate::hit::{HitContext, HitPart, ResizeAnchor, hit_test};
use crate::history::History;
use crate::input::{Button, DragSession, InputState, Key, Modifiers, Tool, UiState, WheelDelta};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Side effects returned from event handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The scene changed and should be redrawn.
    RenderNeeded,
    /// The pointer cursor should change.
    SetCursor(Cursor),
    /// The selected box changed.
    SelectionChanged(Option<usize>),
    /// A box was appended at `index`.
    BoxAdded { index: usize },
    /// The box at `index` got new geometry.
    BoxUpdated { index: usize },
    /// The box at `index` was removed; later indices shifted down.
    BoxRemoved { index: usize },
    /// The box at `index` was reassigned to `class_id`.
    ClassChanged { index: usize, class_id: u32 },
    /// The whole set was replaced (undo, redo, sort, detections).
    SetReplaced,
    /// Draw mode was switched on or off.
    DrawModeChanged(bool),
}

/// Pointer cursor shapes the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Move,
    /// Diagonal resize (NW/SE corners).
    ResizeNwse,
    /// Diagonal resize (NE/SW corners).
    ResizeNesw,
    /// Vertical resize (N/S edges).
    ResizeNs,
    /// Horizontal resize (E/W edges).
    ResizeEw,
}

impl Cursor {
    #[must_use]
    pub fn for_part(part: HitPart) -> Self {
        match part {
            HitPart::Body => Self::Move,
            HitPart::Handle(ResizeAnchor::Nw | ResizeAnchor::Se) => Self::ResizeNwse,
            HitPart::Handle(ResizeAnchor::Ne | ResizeAnchor::Sw) => Self::ResizeNesw,
            HitPart::Handle(ResizeAnchor::N | ResizeAnchor::S) => Self::ResizeNs,
            HitPart::Handle(ResizeAnchor::E | ResizeAnchor::W) => Self::ResizeEw,
        }
    }
}

/// Uncommitted geometry shown while a gesture is in progress (image pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview {
    /// An existing box being moved or resized.
    Edit { index: usize, rect: Rect },
    /// A new box being drawn.
    Draw { rect: Rect },
}

/// The only stateful, input-facing component of the core.
pub struct CanvasController {
    annotations: AnnotationManager,
    history: History,
    camera: Camera,
    ui: UiState,
    input: InputState,
    config: CanvasConfig,
    cursor: Cursor,
    image_width: f64,
    image_height: f64,
    viewport_width: f64,
    viewport_height: f64,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasController {
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            annotations: AnnotationManager::new(),
            history: History::new(),
            camera: Camera::default(),
            ui: UiState { confidence_threshold: config.confidence_threshold, ..UiState::default() },
            input: InputState::Idle,
            config,
            cursor: Cursor::Default,
            image_width: 0.0,
            image_height: 0.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    // --- Data inputs ---

    /// Open a new image with its stored boxes. History starts from this baseline.
    ///
    /// Nothing changes if any box is degenerate.
    pub fn load_image(&mut self, width: f64, height: f64, boxes: Vec<Annotation>) -> Result<Vec<Action>, EditError> {
        self.annotations.replace_all(boxes)?;
        self.history.reset();
        self.input = InputState::Idle;
        self.image_width = width.max(0.0);
        self.image_height = height.max(0.0);
        self.refit_camera();
        tracing::debug!(width, height, boxes = self.annotations.len(), "image loaded");

        let mut actions = Vec::new();
        if self.ui.selected.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::SetReplaced);
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Install a finished batch of model detections as one undoable replacement.
    pub fn install_detections(&mut self, boxes: Vec<Annotation>) -> Result<Vec<Action>, EditError> {
        let mut actions = self.cancel_gesture();
        let count = boxes.len();
        self.history.record(&mut self.annotations, |set| set.replace_all(boxes))?;
        tracing::debug!(count, "detections installed");
        if self.ui.selected.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::SetReplaced);
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// The current set was written to disk; make it the new undo baseline.
    pub fn mark_saved(&mut self) {
        self.history.reset();
    }

    // --- View / mode ---

    /// Update viewport dimensions and refit the image into them.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.refit_camera();
        vec![Action::RenderNeeded]
    }

    pub fn set_draw_mode(&mut self, enabled: bool) -> Vec<Action> {
        let tool = if enabled { Tool::Draw } else { Tool::Select };
        if self.ui.tool == tool {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if !enabled && matches!(self.input, InputState::DrawingNewBox { .. }) {
            actions.extend(self.cancel_gesture());
        }
        self.ui.tool = tool;
        actions.push(Action::DrawModeChanged(enabled));
        actions.extend(self.set_cursor(if enabled { Cursor::Crosshair } else { Cursor::Default }));
        actions
    }

    /// Class given to boxes drawn from now on.
    pub fn set_default_class(&mut self, class_id: u32) {
        self.ui.default_class = class_id;
    }

    /// Change the confidence filter. Hidden boxes stay in the set.
    pub fn set_confidence_threshold(&mut self, threshold: f64) -> Vec<Action> {
        let threshold = if threshold.is_nan() { 0.0 } else { threshold.clamp(0.0, 1.0) };
        self.ui.confidence_threshold = threshold;

        let mut actions = Vec::new();
        if let Some(session) = self.session() {
            if !self.is_visible(session.index) {
                actions.extend(self.cancel_gesture());
            }
        }
        actions.extend(self.revalidate_selection());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select a box from outside the canvas (e.g. a list widget).
    pub fn select(&mut self, index: Option<usize>) -> Vec<Action> {
        let index = index.filter(|&i| self.is_visible(i));
        if self.ui.selected == index {
            return Vec::new();
        }
        self.ui.selected = index;
        vec![Action::SelectionChanged(index), Action::RenderNeeded]
    }

    // --- Edits ---

    /// Reassign the selected box's class as one undoable step.
    pub fn set_selected_class(&mut self, class_id: u32) -> Vec<Action> {
        let Some(index) = self.ui.selected else {
            return Vec::new();
        };
        if self.annotations.get(index).is_some_and(|ann| ann.class_id == class_id) {
            return Vec::new();
        }
        let mut actions = self.cancel_gesture();
        if self
            .record("set_class", |set| set.set_class(index, class_id))
            .is_some()
        {
            actions.push(Action::ClassChanged { index, class_id });
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Remove the selected box as one undoable step.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(index) = self.ui.selected else {
            return Vec::new();
        };
        let mut actions = self.cancel_gesture();
        if self.record("remove_box", |set| set.remove_box(index)).is_some() {
            self.ui.selected = None;
            actions.push(Action::BoxRemoved { index });
            actions.push(Action::SelectionChanged(None));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Reorder boxes left to right as one undoable step.
    pub fn sort_left_to_right(&mut self) -> Vec<Action> {
        let before = self.annotations.snapshot();
        self.annotations.sort_by_x();
        if self.annotations.boxes() == before.as_slice() {
            return Vec::new();
        }
        let mut actions = self.cancel_gesture();
        self.history.commit(before);
        if self.ui.selected.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::SetReplaced);
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        match self.history.undo(&mut self.annotations) {
            Ok(_) => actions.extend(self.after_restore()),
            Err(e) => tracing::debug!(error = %e, "undo ignored"),
        }
        actions
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        match self.history.redo(&mut self.annotations) {
            Ok(_) => actions.extend(self.after_restore()),
            Err(e) => tracing::debug!(error = %e, "redo ignored"),
        }
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || self.input.is_active() || !self.has_image() {
            return Vec::new();
        }

        if let Some(hit) = hit_test(screen_pt, &self.hit_context(), self.ui.selected) {
            let Some(ann) = self.annotations.get(hit.index) else {
                return Vec::new();
            };
            let original = denormalize_box(ann.bbox, self.image_width, self.image_height);
            let session = DragSession {
                index: hit.index,
                part: hit.part,
                start_viewport: screen_pt,
                start_image: self.camera.viewport_to_image(screen_pt),
                original,
                current: original,
            };
            self.input = InputState::Selecting { session };

            let mut actions = Vec::new();
            if self.ui.selected != Some(hit.index) {
                self.ui.selected = Some(hit.index);
                actions.push(Action::SelectionChanged(Some(hit.index)));
            }
            actions.extend(self.set_cursor(Cursor::for_part(hit.part)));
            actions.push(Action::RenderNeeded);
            return actions;
        }

        if self.ui.tool == Tool::Draw {
            let anchor = self.clamp_to_image(self.camera.viewport_to_image(screen_pt));
            self.input = InputState::DrawingNewBox { anchor_image: anchor, current_image: anchor };
            return vec![Action::RenderNeeded];
        }

        if self.ui.selected.take().is_some() {
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        }
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Idle => self.hover(screen_pt),
            InputState::Selecting { session } => {
                let travelled = screen_pt.delta_from(session.start_viewport).length();
                if travelled < self.config.move_threshold_px {
                    return Vec::new();
                }
                self.input = match session.part {
                    HitPart::Body => InputState::DraggingBody { session },
                    HitPart::Handle(_) => InputState::DraggingHandle { session },
                };
                self.update_drag(screen_pt);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingBody { .. } | InputState::DraggingHandle { .. } => {
                self.update_drag(screen_pt);
                vec![Action::RenderNeeded]
            }
            InputState::DrawingNewBox { anchor_image, .. } => {
                let current_image = self.clamp_to_image(self.camera.viewport_to_image(screen_pt));
                self.input = InputState::DrawingNewBox { anchor_image, current_image };
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if matches!(self.input, InputState::DraggingBody { .. } | InputState::DraggingHandle { .. }) {
            self.update_drag(screen_pt);
        }

        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Selecting { .. } => Vec::new(),
            InputState::DraggingBody { session } | InputState::DraggingHandle { session } => self.finish_drag(session),
            InputState::DrawingNewBox { anchor_image, .. } => {
                let current = self.clamp_to_image(self.camera.viewport_to_image(screen_pt));
                self.finish_draw(anchor_image, current)
            }
        }
    }

    /// Zoom around the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy.abs() < f64::EPSILON || !delta.dy.is_finite() {
            return Vec::new();
        }
        let factor = WHEEL_ZOOM_STEP.powf(-delta.dy / 100.0);
        self.camera.zoom_at(screen_pt, factor);
        if self.input.is_active() {
            self.update_drag(screen_pt);
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            if key.is("z") && !modifiers.shift {
                return self.undo();
            }
            if key.is("y") || (key.is("z") && modifiers.shift) {
                return self.redo();
            }
            return Vec::new();
        }

        if key.is("Escape") {
            if self.input.is_active() {
                return self.cancel_gesture();
            }
            if self.ui.tool == Tool::Draw {
                return self.set_draw_mode(false);
            }
            return self.select(None);
        }
        if key.is("Delete") || key.is("Backspace") {
            return self.delete_selected();
        }
        if key.is("w") {
            return self.set_draw_mode(self.ui.tool != Tool::Draw);
        }
        if let Some(class_id) = key.digit_class() {
            return self.set_selected_class(class_id);
        }
        Vec::new()
    }

    // --- Queries ---

    #[must_use]
    pub fn annotations(&self) -> &AnnotationManager {
        &self.annotations
    }

    /// The currently selected box index, if any.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        self.ui.selected
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Image dimensions in pixels; zero before the first image is loaded.
    #[must_use]
    pub fn image_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether the box at `index` exists and passes the confidence filter.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.annotations
            .get(index)
            .is_some_and(|ann| ann.is_visible(self.ui.confidence_threshold))
    }

    /// Live geometry of the gesture in progress, if it changes anything on screen.
    #[must_use]
    pub fn preview(&self) -> Option<Preview> {
        match self.input {
            InputState::Idle | InputState::Selecting { .. } => None,
            InputState::DraggingBody { session } | InputState::DraggingHandle { session } => {
                Some(Preview::Edit { index: session.index, rect: session.current })
            }
            InputState::DrawingNewBox { anchor_image, current_image } => {
                Some(Preview::Draw { rect: Rect::from_corners(anchor_image, current_image) })
            }
        }
    }

    #[must_use]
    pub fn hit_context(&self) -> HitContext<'_> {
        HitContext {
            boxes: self.annotations.boxes(),
            camera: &self.camera,
            image_width: self.image_width,
            image_height: self.image_height,
            confidence_threshold: self.ui.confidence_threshold,
            handle_size: self.config.handle_size_px,
        }
    }

    // --- Internals ---

    fn has_image(&self) -> bool {
        self.image_width > 0.0 && self.image_height > 0.0
    }

    fn refit_camera(&mut self) {
        self.camera = Camera::fit(self.image_width, self.image_height, self.viewport_width, self.viewport_height);
    }

    fn clamp_to_image(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.image_width), p.y.clamp(0.0, self.image_height))
    }

    fn session(&self) -> Option<DragSession> {
        match self.input {
            InputState::Selecting { session }
            | InputState::DraggingBody { session }
            | InputState::DraggingHandle { session } => Some(session),
            InputState::Idle | InputState::DrawingNewBox { .. } => None,
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) -> Vec<Action> {
        if self.cursor == cursor {
            return Vec::new();
        }
        self.cursor = cursor;
        vec![Action::SetCursor(cursor)]
    }

    fn hover(&mut self, screen_pt: Point) -> Vec<Action> {
        let cursor = match hit_test(screen_pt, &self.hit_context(), self.ui.selected) {
            Some(hit) => Cursor::for_part(hit.part),
            None if self.ui.tool == Tool::Draw => Cursor::Crosshair,
            None => Cursor::Default,
        };
        self.set_cursor(cursor)
    }

    /// Recompute the live preview rectangle for a move/resize gesture.
    fn update_drag(&mut self, screen_pt: Point) {
        let pointer = self.camera.viewport_to_image(screen_pt);
        let (w, h, min) = (self.image_width, self.image_height, self.config.min_box_px);
        match &mut self.input {
            InputState::DraggingBody { session } => {
                let delta = pointer.delta_from(session.start_image);
                session.current = translate_within(session.original, delta.x, delta.y, w, h);
            }
            InputState::DraggingHandle { session } => {
                let delta = pointer.delta_from(session.start_image);
                session.current = clamp_rect(resize_box(session.original, session.part, delta, min), w, h, min);
            }
            InputState::DrawingNewBox { current_image, .. } => {
                *current_image = Point::new(pointer.x.clamp(0.0, w), pointer.y.clamp(0.0, h));
            }
            InputState::Idle | InputState::Selecting { .. } => {}
        }
    }

    fn finish_drag(&mut self, session: DragSession) -> Vec<Action> {
        if session.current == session.original {
            return vec![Action::RenderNeeded];
        }
        let Some(&before) = self.annotations.get(session.index) else {
            return vec![Action::RenderNeeded];
        };
        let bbox = normalize_box(session.current, self.image_width, self.image_height);
        let index = session.index;
        let after = Annotation { bbox, ..before };

        let mut actions = Vec::new();
        if self.record("update_box", |set| set.update_box(index, after)).is_some() {
            tracing::debug!(index, part = ?session.part, "drag committed");
            actions.push(Action::BoxUpdated { index });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn finish_draw(&mut self, anchor: Point, current: Point) -> Vec<Action> {
        let rect = Rect::from_corners(anchor, current);
        let min = self.config.min_draw_px;
        if rect.width() * self.camera.zoom < min || rect.height() * self.camera.zoom < min {
            tracing::debug!(width = rect.width(), height = rect.height(), "drawn box too small, discarded");
            return vec![Action::RenderNeeded];
        }

        let bbox = normalize_box(rect, self.image_width, self.image_height);
        let ann = Annotation::new(self.ui.default_class, bbox);
        let mut actions = Vec::new();
        if let Some(index) = self.record("add_box", |set| set.add_box(ann)) {
            tracing::debug!(index, class_id = ann.class_id, "box drawn");
            self.ui.selected = Some(index);
            actions.push(Action::BoxAdded { index });
            actions.push(Action::SelectionChanged(Some(index)));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abandon the gesture in progress without committing anything.
    fn cancel_gesture(&mut self) -> Vec<Action> {
        if !self.input.is_active() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::RenderNeeded]
    }

    fn after_restore(&mut self) -> Vec<Action> {
        let mut actions = self.revalidate_selection();
        actions.push(Action::SetReplaced);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Drop the selection if its box no longer exists or is filtered out.
    fn revalidate_selection(&mut self) -> Vec<Action> {
        match self.ui.selected {
            Some(index) if !self.is_visible(index) => {
                self.ui.selected = None;
                vec![Action::SelectionChanged(None)]
            }
            _ => Vec::new(),
        }
    }

    /// Run one undoable mutation, logging and swallowing rejections.
    fn record<T>(
        &mut self,
        op_name: &'static str,
        op: impl FnOnce(&mut AnnotationManager) -> Result<T, EditError>,
    ) -> Option<T> {
        match self.history.record(&mut self.annotations, op) {
            Ok(out) => Some(out),
            Err(e) => {
                tracing::warn!(op = op_name, error = %e, "edit rejected");
                None
            }
        }
    }
}
