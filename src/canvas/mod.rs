//! Interactive box editor: viewport, box store and the gesture state machine.
//!
//! Nothing in here draws. The UI layer converts input into [`CanvasEvent`]s
//! and reads the state back every frame.

mod hit_test;
mod store;
mod viewport;

pub use hit_test::{Handle, find_box_at, find_handle_at};
pub use store::BoxStore;
pub use viewport::{MAX_SCALE, MIN_SCALE, Viewport};

use eframe::egui::{Pos2, Rect, Vec2};

use crate::models::BoundingBox;

pub const DEFAULT_HANDLE_SIZE: f32 = 8.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Pan and zoom only.
    #[default]
    Navigate,
    /// Draw new boxes.
    Mark,
    /// Select, move, resize and delete boxes.
    Select,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 3] = [
        InteractionMode::Navigate,
        InteractionMode::Mark,
        InteractionMode::Select,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::Navigate => "Navigate (pan/zoom)",
            InteractionMode::Mark => "Mark (draw boxes)",
            InteractionMode::Select => "Select (move, resize, delete)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Input to the editor. Positions are in widget space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasEvent {
    PointerDown { pos: Pos2, button: PointerButton },
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2, button: PointerButton },
    /// `delta` in wheel angle units, positive zooms in.
    Wheel { pos: Pos2, delta: f32 },
    DeleteSelected,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
    Idle,
    /// Last pointer position in widget space.
    Panning { last: Pos2 },
    /// Image-space corners of the rectangle being drawn.
    Drawing { start: Pos2, current: Pos2 },
    /// Last pointer position in image space.
    DraggingBox { last: Pos2 },
    Resizing { handle: Handle },
}

/// What an event changed, so the host knows what to refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanvasResponse {
    /// Box geometry or membership changed; the image's annotation is dirty.
    pub boxes_changed: bool,
    pub selection_changed: bool,
    pub viewport_changed: bool,
}

impl CanvasResponse {
    fn boxes() -> Self {
        Self {
            boxes_changed: true,
            ..Default::default()
        }
    }

    fn viewport() -> Self {
        Self {
            viewport_changed: true,
            ..Default::default()
        }
    }

    fn selection(changed: bool) -> Self {
        Self {
            selection_changed: changed,
            ..Default::default()
        }
    }

    pub fn merge(&mut self, other: CanvasResponse) {
        self.boxes_changed |= other.boxes_changed;
        self.selection_changed |= other.selection_changed;
        self.viewport_changed |= other.viewport_changed;
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    viewport: Viewport,
    store: BoxStore,
    mode: InteractionMode,
    gesture: Gesture,
    /// Selected box as it was when the current drag or resize began.
    gesture_origin: Option<BoundingBox>,
    /// Class given to boxes committed in mark mode.
    pub new_box_class: u32,
    handle_size: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Viewport::default(), DEFAULT_HANDLE_SIZE)
    }
}

impl Canvas {
    pub fn new(viewport: Viewport, handle_size: f32) -> Self {
        Self {
            viewport,
            store: BoxStore::default(),
            mode: InteractionMode::default(),
            gesture: Gesture::Idle,
            gesture_origin: None,
            new_box_class: 0,
            handle_size,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn store(&self) -> &BoxStore {
        &self.store
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        self.store.boxes()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn handle_size(&self) -> f32 {
        self.handle_size
    }

    /// Handle hit zone in image pixels, constant on screen.
    pub fn handle_tolerance(&self) -> f32 {
        self.viewport.to_image_len(self.handle_size)
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn active_handle(&self) -> Option<Handle> {
        match self.gesture {
            Gesture::Resizing { handle } => Some(handle),
            _ => None,
        }
    }

    /// Switches mode and drops any unfinished gesture. A box that was being
    /// moved or resized goes back to where the gesture started.
    pub fn set_mode(&mut self, mode: InteractionMode) -> CanvasResponse {
        self.mode = mode;
        let interrupted = matches!(
            self.gesture,
            Gesture::DraggingBox { .. } | Gesture::Resizing { .. }
        );
        self.gesture = Gesture::Idle;
        let origin = self.gesture_origin.take();
        match (interrupted, origin, self.store.selected_mut()) {
            (true, Some(origin), Some(bbox)) if *bbox != origin => {
                *bbox = origin;
                CanvasResponse::boxes()
            }
            _ => CanvasResponse::default(),
        }
    }

    /// Shows a new image's boxes. Resets the view and any gesture.
    pub fn load_boxes(&mut self, boxes: Vec<BoundingBox>) {
        self.store.replace_all(boxes);
        self.viewport.reset();
        self.gesture = Gesture::Idle;
        self.gesture_origin = None;
    }

    pub fn snapshot_boxes(&self) -> Vec<BoundingBox> {
        self.store.boxes().to_vec()
    }

    /// Rectangle currently being drawn in mark mode, not yet normalized.
    pub fn pending_box(&self) -> Option<BoundingBox> {
        match self.gesture {
            Gesture::Drawing { start, current } if self.mode == InteractionMode::Mark => {
                Some(BoundingBox::from_corners(self.new_box_class, start, current))
            }
            _ => None,
        }
    }

    /// Handle of the selected box under `widget_pos`, for cursor feedback.
    pub fn hover_handle(&self, widget_pos: Pos2) -> Option<Handle> {
        if self.mode != InteractionMode::Select {
            return None;
        }
        let pos = self.viewport.to_image(widget_pos);
        self.store
            .selected()
            .and_then(|b| find_handle_at(pos, b, self.handle_tolerance()))
    }

    /// Widget-space rectangle of a box.
    pub fn widget_rect(&self, bbox: &BoundingBox) -> Rect {
        let rect = bbox.rect();
        Rect::from_min_max(
            self.viewport.to_widget(rect.min),
            self.viewport.to_widget(rect.max),
        )
    }

    pub fn select(&mut self, index: Option<usize>) -> CanvasResponse {
        CanvasResponse::selection(self.store.select(index))
    }

    pub fn set_selected_class(&mut self, class_id: u32) -> CanvasResponse {
        if self.store.set_selected_class(class_id) {
            CanvasResponse::boxes()
        } else {
            CanvasResponse::default()
        }
    }

    pub fn handle(&mut self, event: CanvasEvent) -> CanvasResponse {
        match event {
            CanvasEvent::PointerDown { pos, button } => self.pointer_down(pos, button),
            CanvasEvent::PointerMove { pos } => self.pointer_move(pos),
            CanvasEvent::PointerUp { pos, button } => self.pointer_up(pos, button),
            CanvasEvent::Wheel { pos, delta } => self.wheel(pos, delta),
            CanvasEvent::DeleteSelected => self.delete_selected(),
        }
    }

    fn pointer_down(&mut self, pos: Pos2, button: PointerButton) -> CanvasResponse {
        if self.gesture != Gesture::Idle {
            return CanvasResponse::default();
        }
        match (self.mode, button) {
            (InteractionMode::Navigate, PointerButton::Primary | PointerButton::Middle)
            | (InteractionMode::Select, PointerButton::Middle) => {
                self.gesture = Gesture::Panning { last: pos };
                CanvasResponse::default()
            }
            (InteractionMode::Mark, PointerButton::Primary) => {
                let start = self.viewport.to_image(pos);
                self.gesture = Gesture::Drawing {
                    start,
                    current: start,
                };
                CanvasResponse::default()
            }
            (InteractionMode::Select, PointerButton::Primary) => self.select_press(pos),
            _ => CanvasResponse::default(),
        }
    }

    fn select_press(&mut self, pos: Pos2) -> CanvasResponse {
        let pos = self.viewport.to_image(pos);
        let tolerance = self.handle_tolerance();

        if let Some(handle) = self
            .store
            .selected()
            .and_then(|b| find_handle_at(pos, b, tolerance))
        {
            log::debug!("Resizing from the {} handle", handle.name());
            self.gesture_origin = self.store.selected().cloned();
            self.gesture = Gesture::Resizing { handle };
            return CanvasResponse::default();
        }

        let hit = find_box_at(pos, self.store.boxes());
        let changed = self.store.select(hit);
        if hit.is_some() {
            self.gesture_origin = self.store.selected().cloned();
            self.gesture = Gesture::DraggingBox { last: pos };
        }
        CanvasResponse::selection(changed)
    }

    fn pointer_move(&mut self, pos: Pos2) -> CanvasResponse {
        match self.gesture {
            Gesture::Idle => CanvasResponse::default(),
            Gesture::Panning { last } => {
                self.viewport.pan(pos - last);
                self.gesture = Gesture::Panning { last: pos };
                CanvasResponse::viewport()
            }
            Gesture::Drawing { start, .. } => {
                self.gesture = Gesture::Drawing {
                    start,
                    current: self.viewport.to_image(pos),
                };
                CanvasResponse::default()
            }
            Gesture::DraggingBox { last } => {
                let pos = self.viewport.to_image(pos);
                let delta: Vec2 = pos - last;
                self.gesture = Gesture::DraggingBox { last: pos };
                match self.store.selected_mut() {
                    Some(bbox) => {
                        bbox.translate(delta.x, delta.y);
                        CanvasResponse::boxes()
                    }
                    None => CanvasResponse::default(),
                }
            }
            Gesture::Resizing { handle } => {
                let pos = self.viewport.to_image(pos);
                match self.store.selected_mut() {
                    Some(bbox) => {
                        handle.apply(bbox, pos);
                        CanvasResponse::boxes()
                    }
                    None => CanvasResponse::default(),
                }
            }
        }
    }

    fn pointer_up(&mut self, pos: Pos2, button: PointerButton) -> CanvasResponse {
        match (self.gesture, button) {
            (Gesture::Panning { .. }, _) => {
                self.gesture = Gesture::Idle;
                CanvasResponse::default()
            }
            (Gesture::Drawing { start, .. }, PointerButton::Primary) => {
                self.gesture = Gesture::Idle;
                let current = self.viewport.to_image(pos);
                let bbox =
                    BoundingBox::from_corners(self.new_box_class, start, current).normalized();
                if bbox.is_degenerate() {
                    return CanvasResponse::default();
                }
                self.store.add(bbox);
                CanvasResponse::boxes()
            }
            (Gesture::DraggingBox { .. } | Gesture::Resizing { .. }, PointerButton::Primary) => {
                self.gesture = Gesture::Idle;
                self.gesture_origin = None;
                CanvasResponse::default()
            }
            _ => CanvasResponse::default(),
        }
    }

    fn wheel(&mut self, pos: Pos2, delta: f32) -> CanvasResponse {
        if self.mode == InteractionMode::Mark || delta == 0.0 {
            return CanvasResponse::default();
        }
        self.viewport.zoom(pos, Viewport::wheel_factor(delta));
        CanvasResponse::viewport()
    }

    fn delete_selected(&mut self) -> CanvasResponse {
        if self.mode != InteractionMode::Select || self.store.remove_selected().is_none() {
            return CanvasResponse::default();
        }
        self.gesture = Gesture::Idle;
        self.gesture_origin = None;
        CanvasResponse::boxes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn down(x: f32, y: f32) -> CanvasEvent {
        CanvasEvent::PointerDown {
            pos: pos2(x, y),
            button: PointerButton::Primary,
        }
    }

    fn moved(x: f32, y: f32) -> CanvasEvent {
        CanvasEvent::PointerMove { pos: pos2(x, y) }
    }

    fn up(x: f32, y: f32) -> CanvasEvent {
        CanvasEvent::PointerUp {
            pos: pos2(x, y),
            button: PointerButton::Primary,
        }
    }

    fn drag(canvas: &mut Canvas, from: (f32, f32), to: (f32, f32)) -> CanvasResponse {
        let mut response = canvas.handle(down(from.0, from.1));
        response.merge(canvas.handle(moved(to.0, to.1)));
        response.merge(canvas.handle(up(to.0, to.1)));
        response
    }

    fn canvas_with_box() -> Canvas {
        let mut canvas = Canvas::default();
        canvas.load_boxes(vec![BoundingBox::new(2, 10.0, 10.0, 50.0, 40.0)]);
        canvas.set_mode(InteractionMode::Select);
        canvas
    }

    #[test]
    fn mark_commits_drawn_box_with_current_class() {
        let mut canvas = Canvas::default();
        canvas.set_mode(InteractionMode::Mark);
        canvas.new_box_class = 4;

        let response = drag(&mut canvas, (10.0, 10.0), (50.0, 40.0));

        assert!(response.boxes_changed);
        assert_eq!(canvas.boxes(), &[BoundingBox::new(4, 10.0, 10.0, 50.0, 40.0)]);
        assert!(canvas.pending_box().is_none());
    }

    #[test]
    fn mark_normalizes_backwards_drag() {
        let mut canvas = Canvas::default();
        canvas.set_mode(InteractionMode::Mark);
        canvas.new_box_class = 1;

        drag(&mut canvas, (50.0, 40.0), (10.0, 10.0));

        assert_eq!(canvas.boxes(), &[BoundingBox::new(1, 10.0, 10.0, 50.0, 40.0)]);
    }

    #[test]
    fn mark_uses_image_coordinates() {
        let mut canvas = Canvas::default();
        canvas.viewport_mut().pan(vec2(100.0, 100.0));
        canvas.viewport_mut().zoom(pos2(100.0, 100.0), 2.0);
        canvas.set_mode(InteractionMode::Mark);

        drag(&mut canvas, (120.0, 120.0), (200.0, 180.0));

        assert_eq!(canvas.boxes(), &[BoundingBox::new(0, 10.0, 10.0, 50.0, 40.0)]);
    }

    #[test]
    fn degenerate_drawing_is_discarded() {
        let mut canvas = Canvas::default();
        canvas.set_mode(InteractionMode::Mark);

        let response = drag(&mut canvas, (10.0, 10.0), (10.0, 60.0));

        assert!(!response.boxes_changed);
        assert!(canvas.boxes().is_empty());
    }

    #[test]
    fn pending_box_tracks_pointer_unnormalized() {
        let mut canvas = Canvas::default();
        canvas.set_mode(InteractionMode::Mark);
        canvas.handle(down(50.0, 40.0));
        canvas.handle(moved(10.0, 10.0));

        let pending = canvas.pending_box().unwrap();
        assert_eq!((pending.x1, pending.y1, pending.x2, pending.y2), (50.0, 40.0, 10.0, 10.0));
    }

    #[test]
    fn mode_switch_discards_unfinished_rectangle() {
        let mut canvas = Canvas::default();
        canvas.set_mode(InteractionMode::Mark);
        canvas.handle(down(10.0, 10.0));
        canvas.handle(moved(50.0, 40.0));

        canvas.set_mode(InteractionMode::Select);
        canvas.set_mode(InteractionMode::Mark);
        let response = canvas.handle(up(50.0, 40.0));

        assert!(!response.boxes_changed);
        assert!(canvas.boxes().is_empty());
        assert!(canvas.is_idle());
    }

    #[test]
    fn mode_switch_keeps_committed_box() {
        let mut canvas = Canvas::default();
        canvas.set_mode(InteractionMode::Mark);
        drag(&mut canvas, (10.0, 10.0), (50.0, 40.0));
        canvas.set_mode(InteractionMode::Navigate);
        assert_eq!(canvas.boxes().len(), 1);
    }

    #[test]
    fn mode_switch_mid_drag_restores_box() {
        let mut canvas = canvas_with_box();
        canvas.handle(down(30.0, 25.0));
        canvas.handle(moved(37.0, 20.0));
        assert_eq!(canvas.boxes()[0], BoundingBox::new(2, 17.0, 5.0, 57.0, 35.0));

        let response = canvas.set_mode(InteractionMode::Navigate);

        assert!(response.boxes_changed);
        assert!(canvas.is_idle());
        assert_eq!(canvas.boxes()[0], BoundingBox::new(2, 10.0, 10.0, 50.0, 40.0));
    }

    #[test]
    fn mode_switch_mid_resize_restores_box() {
        let mut canvas = canvas_with_box();
        canvas.select(Some(0));
        canvas.handle(down(50.0, 25.0));
        canvas.handle(moved(80.0, 25.0));
        assert_eq!(canvas.boxes()[0].x2, 80.0);

        let response = canvas.set_mode(InteractionMode::Mark);

        assert!(response.boxes_changed);
        assert_eq!(canvas.active_handle(), None);
        assert_eq!(canvas.boxes()[0], BoundingBox::new(2, 10.0, 10.0, 50.0, 40.0));
    }

    #[test]
    fn mode_switch_after_finished_drag_keeps_geometry() {
        let mut canvas = canvas_with_box();
        drag(&mut canvas, (30.0, 25.0), (37.0, 20.0));

        let response = canvas.set_mode(InteractionMode::Navigate);

        assert!(!response.boxes_changed);
        assert_eq!(canvas.boxes()[0], BoundingBox::new(2, 17.0, 5.0, 57.0, 35.0));
    }

    #[test]
    fn dragging_selected_box_translates_it() {
        let mut canvas = canvas_with_box();

        let response = drag(&mut canvas, (30.0, 25.0), (37.0, 20.0));

        assert!(response.boxes_changed);
        assert!(response.selection_changed);
        let b = &canvas.boxes()[0];
        assert_eq!(*b, BoundingBox::new(2, 17.0, 5.0, 57.0, 35.0));
        assert_eq!((b.width(), b.height()), (40.0, 30.0));
        assert_eq!(canvas.store().selected_index(), Some(0));
    }

    #[test]
    fn drag_delta_is_in_image_space() {
        let mut canvas = canvas_with_box();
        canvas.viewport_mut().zoom(Pos2::ZERO, 2.0);

        drag(&mut canvas, (60.0, 50.0), (80.0, 50.0));

        assert_eq!(canvas.boxes()[0], BoundingBox::new(2, 20.0, 10.0, 60.0, 40.0));
    }

    #[test]
    fn clicking_empty_space_clears_selection() {
        let mut canvas = canvas_with_box();
        canvas.handle(down(30.0, 25.0));
        canvas.handle(up(30.0, 25.0));
        assert_eq!(canvas.store().selected_index(), Some(0));

        let response = canvas.handle(down(300.0, 300.0));
        assert!(response.selection_changed);
        assert_eq!(canvas.store().selected_index(), None);
        assert!(canvas.is_idle());
    }

    #[test]
    fn top_left_handle_moves_two_edges() {
        let mut canvas = canvas_with_box();
        canvas.select(Some(0));

        let response = drag(&mut canvas, (10.0, 10.0), (5.0, 5.0));

        assert!(response.boxes_changed);
        assert_eq!(canvas.boxes()[0], BoundingBox::new(2, 5.0, 5.0, 50.0, 40.0));
    }

    #[test]
    fn right_handle_moves_one_edge() {
        let mut canvas = canvas_with_box();
        canvas.select(Some(0));

        canvas.handle(down(50.0, 25.0));
        assert_eq!(canvas.active_handle(), Some(Handle::Right));
        canvas.handle(moved(80.0, 31.0));
        canvas.handle(up(80.0, 31.0));

        assert_eq!(canvas.boxes()[0], BoundingBox::new(2, 10.0, 10.0, 80.0, 40.0));
    }

    #[test]
    fn handle_tolerance_is_constant_on_screen() {
        let mut canvas = canvas_with_box();
        canvas.select(Some(0));
        canvas.viewport_mut().zoom(Pos2::ZERO, 4.0);

        // 6 widget pixels left of the left edge at x = 40
        assert_eq!(canvas.hover_handle(pos2(34.0, 100.0)), Some(Handle::Left));
        // 10 widget pixels is outside the 8 pixel zone
        assert_eq!(canvas.hover_handle(pos2(30.0, 100.0)), None);
    }

    #[test]
    fn resize_through_zero_leaves_box_inverted() {
        let mut canvas = canvas_with_box();
        canvas.select(Some(0));

        drag(&mut canvas, (50.0, 25.0), (0.0, 25.0));

        let b = &canvas.boxes()[0];
        assert_eq!(*b, BoundingBox::new(2, 10.0, 10.0, 0.0, 40.0));
        assert!(b.width() < 0.0);
        assert_eq!(b.normalized(), BoundingBox::new(2, 0.0, 10.0, 10.0, 40.0));
        // still selectable through its normalized rectangle
        assert_eq!(find_box_at(pos2(5.0, 20.0), canvas.boxes()), Some(0));
    }

    #[test]
    fn delete_removes_only_selected_box() {
        let mut canvas = Canvas::default();
        canvas.load_boxes(vec![
            BoundingBox::new(0, 0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(1, 20.0, 20.0, 30.0, 30.0),
            BoundingBox::new(2, 40.0, 40.0, 50.0, 50.0),
        ]);
        canvas.set_mode(InteractionMode::Select);
        canvas.select(Some(1));

        let response = canvas.handle(CanvasEvent::DeleteSelected);

        assert!(response.boxes_changed);
        let classes: Vec<_> = canvas.boxes().iter().map(|b| b.class_id).collect();
        assert_eq!(classes, [0, 2]);
        assert_eq!(canvas.store().selected_index(), None);
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut canvas = canvas_with_box();
        let response = canvas.handle(CanvasEvent::DeleteSelected);
        assert_eq!(response, CanvasResponse::default());
        assert_eq!(canvas.boxes().len(), 1);
    }

    #[test]
    fn navigate_pans_with_primary_or_middle() {
        let mut canvas = Canvas::default();
        drag(&mut canvas, (0.0, 0.0), (15.0, -5.0));
        assert_eq!(canvas.viewport().offset(), vec2(15.0, -5.0));

        canvas.handle(CanvasEvent::PointerDown {
            pos: pos2(0.0, 0.0),
            button: PointerButton::Middle,
        });
        canvas.handle(moved(5.0, 5.0));
        canvas.handle(CanvasEvent::PointerUp {
            pos: pos2(5.0, 5.0),
            button: PointerButton::Middle,
        });
        assert_eq!(canvas.viewport().offset(), vec2(20.0, 0.0));
        assert!(canvas.is_idle());
    }

    #[test]
    fn select_mode_pans_with_middle_button() {
        let mut canvas = canvas_with_box();
        canvas.handle(CanvasEvent::PointerDown {
            pos: pos2(30.0, 25.0),
            button: PointerButton::Middle,
        });
        assert!(canvas.is_panning());
        let response = canvas.handle(moved(40.0, 25.0));
        assert!(response.viewport_changed);
        assert_eq!(canvas.boxes()[0].x1, 10.0);
    }

    #[test]
    fn wheel_is_ignored_in_mark_mode() {
        let mut canvas = Canvas::default();
        canvas.set_mode(InteractionMode::Mark);
        let response = canvas.handle(CanvasEvent::Wheel {
            pos: pos2(10.0, 10.0),
            delta: 120.0,
        });
        assert!(!response.viewport_changed);
        assert_eq!(canvas.viewport().scale(), 1.0);

        canvas.set_mode(InteractionMode::Select);
        canvas.handle(CanvasEvent::Wheel {
            pos: pos2(10.0, 10.0),
            delta: 120.0,
        });
        assert!((canvas.viewport().scale() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn loading_boxes_resets_view_and_selection() {
        let mut canvas = canvas_with_box();
        canvas.select(Some(0));
        canvas.viewport_mut().pan(vec2(3.0, 3.0));
        canvas.load_boxes(Vec::new());
        assert_eq!(canvas.viewport().offset(), Vec2::ZERO);
        assert_eq!(canvas.store().selected_index(), None);
    }
}
