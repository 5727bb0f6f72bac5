//! The editing session: one template, its history and the UI cursor state.

use tracing::debug;

use super::drag::{self, DragState, Point, Target};
use crate::error::Result;
use crate::history::History;
use crate::model::{EmployeeResource, FieldUpdate, LayerKind, LayerUpdate, Side, SideKind, Template};

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;

/// What the operator currently has selected. Field and layer selection are
/// mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Field(String),
    Layer(LayerKind),
}

impl From<&Target> for Selection {
    fn from(target: &Target) -> Self {
        match target {
            Target::Field(id) => Selection::Field(id.clone()),
            Target::Layer(kind) => Selection::Layer(*kind),
        }
    }
}

/// Owns all mutable editor state for a single operator.
///
/// Every edit goes through the active side. Attribute edits push one history
/// snapshot each; drag gestures push one snapshot on pointer-up regardless
/// of how many moves happened in between.
#[derive(Debug, Clone)]
pub struct EditorSession {
    template: Template,
    history: History,
    selection: Selection,
    active_side: SideKind,
    zoom: f64,
    snap: bool,
    drag: DragState,
}

impl EditorSession {
    pub fn new(template: Template) -> Self {
        let history = History::new(template.front.clone(), template.back.clone());
        Self {
            template,
            history,
            selection: Selection::None,
            active_side: SideKind::Front,
            zoom: 1.0,
            snap: false,
            drag: DragState::Idle,
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Give the template back, e.g. to persist it.
    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_side(&self) -> SideKind {
        self.active_side
    }

    pub fn side(&self) -> &Side {
        self.template.side(self.active_side)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn snap(&self) -> bool {
        self.snap
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Switch the editing focus. Selection and any drag in progress are dropped.
    pub fn set_active_side(&mut self, kind: SideKind) {
        if kind != self.active_side {
            self.active_side = kind;
            self.selection = Selection::None;
            self.drag = DragState::Idle;
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
    }

    pub fn set_snap(&mut self, snap: bool) {
        self.snap = snap;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a field of the active side. Returns false if it does not exist.
    pub fn select_field(&mut self, id: &str) -> bool {
        if self.side().field(id).is_some() {
            self.selection = Selection::Field(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn select_layer(&mut self, kind: LayerKind) {
        self.selection = Selection::Layer(kind);
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    // ------------------------------------------------------------------
    // Pointer gestures
    // ------------------------------------------------------------------

    /// Begin a drag on `target`, or clear the selection when the pointer
    /// landed on empty canvas (or on something hidden).
    ///
    /// Returns true if a drag started.
    pub fn pointer_down(&mut self, pointer: Point, target: Option<Target>) -> bool {
        let anchor = target
            .as_ref()
            .and_then(|t| drag::screen_anchor(self.side(), t, self.zoom).map(|a| (t, a)));

        match anchor {
            Some((target, anchor)) => {
                self.selection = Selection::from(target);
                self.drag = DragState::Dragging {
                    target: target.clone(),
                    offset: Point::new(pointer.x - anchor.x, pointer.y - anchor.y),
                };
                debug!(?target, "drag started");
                true
            }
            None => {
                self.selection = Selection::None;
                self.drag = DragState::Idle;
                false
            }
        }
    }

    /// Move the dragged entity. No history is recorded here.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let DragState::Dragging { target, offset } = &self.drag else {
            return false;
        };
        let (x, y) = drag::percent_from_pointer(pointer, *offset, self.zoom, self.snap);
        let target = target.clone();
        let side = self.active_side;
        drag::apply_position(self.side_mut(side), &target, x, y);
        true
    }

    /// Finish the gesture and record exactly one snapshot.
    pub fn pointer_up(&mut self) -> bool {
        if !self.drag.is_dragging() {
            return false;
        }
        self.drag = DragState::Idle;
        self.commit();
        true
    }

    // ------------------------------------------------------------------
    // Attribute edits
    // ------------------------------------------------------------------

    pub fn update_field(&mut self, id: &str, update: &FieldUpdate) -> Result<()> {
        self.template.update_field(self.active_side, id, update)?;
        self.commit();
        Ok(())
    }

    pub fn update_layer(&mut self, kind: LayerKind, update: &LayerUpdate) {
        self.template.update_layer(self.active_side, kind, update);
        self.commit();
    }

    pub fn set_background(&mut self, image_ref: Option<String>) {
        self.template.set_background(self.active_side, image_ref);
        self.commit();
    }

    /// Fill tagged fields on both sides from an employee record.
    pub fn autofill(&mut self, employee: &EmployeeResource) -> usize {
        let changed = self.template.autofill(employee);
        if changed > 0 {
            self.commit();
        }
        changed
    }

    pub fn set_template_name(&mut self, name: &str) {
        self.template.name = name.to_string();
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.template.restore(snapshot.front, snapshot.back);
        self.after_restore();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.template.restore(snapshot.front, snapshot.back);
        self.after_restore();
        true
    }

    fn after_restore(&mut self) {
        self.drag = DragState::Idle;
        if let Selection::Field(id) = &self.selection
            && self.side().field(id).is_none()
        {
            self.selection = Selection::None;
        }
    }

    fn commit(&mut self) {
        self.history
            .push(self.template.front.clone(), self.template.back.clone());
        debug!(len = self.history.len(), index = self.history.index(), "history snapshot");
    }

    fn side_mut(&mut self, kind: SideKind) -> &mut Side {
        match kind {
            SideKind::Front => &mut self.template.front,
            SideKind::Back => &mut self.template.back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_CAPACITY;
    use crate::model::{Align, Typography};

    fn session() -> EditorSession {
        EditorSession::new(Template::new("Test", "Acme"))
    }

    fn photo_anchor(s: &EditorSession) -> Point {
        drag::screen_anchor(s.side(), &Target::Layer(LayerKind::Photo), s.zoom()).unwrap()
    }

    #[test]
    fn test_drag_pushes_one_snapshot_per_gesture() {
        let mut s = session();
        let start = photo_anchor(&s);

        s.pointer_down(start, Some(Target::Layer(LayerKind::Photo)));
        for i in 1..=25 {
            s.pointer_move(Point::new(start.x + i as f64, start.y + i as f64 * 2.0));
        }
        s.pointer_up();
        assert_eq!(s.history().len(), 2);

        s.pointer_down(start, Some(Target::Layer(LayerKind::Photo)));
        s.pointer_move(Point::new(start.x - 10.0, start.y));
        s.pointer_up();
        assert_eq!(s.history().len(), 3);
    }

    #[test]
    fn test_stationary_drag_still_records() {
        let mut s = session();
        let start = photo_anchor(&s);
        let before = s.side().photo.clone();
        assert!(s.pointer_down(start, Some(Target::Layer(LayerKind::Photo))));
        assert!(s.pointer_up());
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.side().photo, before);
        assert!(s.undo());
        assert_eq!(s.side().photo, before);
    }

    #[test]
    fn test_drag_without_drift_across_zoom() {
        let mut s = session();
        s.set_zoom(2.0);
        let anchor = photo_anchor(&s);
        let grab = Point::new(anchor.x + 12.0, anchor.y + 5.0);
        s.pointer_down(grab, Some(Target::Layer(LayerKind::Photo)));
        // 60 screen px at zoom 2 on a 300-wide card = 10%
        s.pointer_move(Point::new(grab.x + 60.0, grab.y));
        s.pointer_up();
        assert!((s.side().photo.x - 60.0).abs() < 1e-9);
        assert!((s.side().photo.y - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_clamps_and_snaps() {
        let mut s = session();
        s.set_snap(true);
        let anchor = photo_anchor(&s);
        s.pointer_down(anchor, Some(Target::Layer(LayerKind::Photo)));
        s.pointer_move(Point::new(anchor.x + 13.0, anchor.y + 4000.0));
        assert_eq!(s.side().photo.y, 100.0);
        assert_eq!(s.side().photo.x % 5.0, 0.0);
        s.pointer_up();
    }

    #[test]
    fn test_moves_without_drag_do_nothing() {
        let mut s = session();
        let before = s.template().clone();
        assert!(!s.pointer_move(Point::new(10.0, 10.0)));
        assert!(!s.pointer_up());
        assert_eq!(s.template(), &before);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut s = session();
        assert!(s.select_field("fullname"));
        s.select_layer(LayerKind::Signature);
        assert_eq!(s.selection(), &Selection::Layer(LayerKind::Signature));

        let anchor = drag::screen_anchor(s.side(), &Target::Field("nickname".into()), 1.0).unwrap();
        s.pointer_down(anchor, Some(Target::Field("nickname".into())));
        s.pointer_up();
        assert_eq!(s.selection(), &Selection::Field("nickname".into()));

        s.pointer_down(Point::new(1.0, 1.0), None);
        assert_eq!(s.selection(), &Selection::None);
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_hidden_target_is_not_draggable() {
        let mut s = session();
        s.set_active_side(SideKind::Back);
        assert!(!s.pointer_down(Point::new(150.0, 150.0), Some(Target::Layer(LayerKind::Photo))));
        assert_eq!(s.selection(), &Selection::None);
    }

    #[test]
    fn test_switching_side_drops_focus() {
        let mut s = session();
        s.select_field("fullname");
        s.set_active_side(SideKind::Back);
        assert_eq!(s.selection(), &Selection::None);
        assert_eq!(s.side(), &s.template().back);
    }

    #[test]
    fn test_undo_redo_and_branch_truncation() {
        let mut s = session();
        let original = s.side().field("fullname").unwrap().value.clone();

        s.update_field("fullname", &FieldUpdate::Text { value: "A".into() })
            .unwrap();
        assert!(s.undo());
        assert_eq!(s.side().field("fullname").unwrap().value, original);
        assert!(s.redo());
        assert_eq!(s.side().field("fullname").unwrap().value, "A");

        s.undo();
        s.update_field("fullname", &FieldUpdate::Text { value: "B".into() })
            .unwrap();
        assert!(!s.redo());
        assert_eq!(s.side().field("fullname").unwrap().value, "B");
    }

    #[test]
    fn test_edits_apply_to_active_side() {
        let mut s = session();
        s.set_active_side(SideKind::Back);
        s.update_field(
            "fullname",
            &FieldUpdate::Typography(Typography {
                align: Some(Align::Left),
                ..Default::default()
            }),
        )
        .unwrap();
        assert_eq!(s.template().back.field("fullname").unwrap().align, Align::Left);
        assert_eq!(s.template().front.field("fullname").unwrap().align, Align::Center);
    }

    #[test]
    fn test_failed_edit_records_nothing() {
        let mut s = session();
        assert!(s.update_field("ghost", &FieldUpdate::Text { value: "x".into() }).is_err());
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_history_stays_bounded() {
        let mut s = session();
        for i in 0..60 {
            s.update_layer(
                LayerKind::Photo,
                &LayerUpdate::Position {
                    x: i as f64,
                    y: 10.0,
                },
            );
        }
        assert_eq!(s.history().len(), HISTORY_CAPACITY);
        let mut undos = 0;
        while s.undo() {
            undos += 1;
        }
        assert_eq!(undos, HISTORY_CAPACITY - 1);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut s = session();
        s.set_zoom(100.0);
        assert_eq!(s.zoom(), MAX_ZOOM);
        s.set_zoom(f64::NAN);
        assert_eq!(s.zoom(), 1.0);
    }
}
