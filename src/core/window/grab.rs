//! The single interactive move/resize grab.

use super::resize::ResizeEdges;
use crate::core::WindowId;
use crate::util::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Passthrough,
    Move,
    Resize,
}

/// Process-wide gesture state. Starting a new gesture replaces the old one,
/// so at most one window is ever grabbed.
#[derive(Debug, Clone, Default)]
pub struct GestureGrab {
    pub mode: CursorMode,
    pub window: Option<WindowId>,
    /// Cursor offset from the anchor: the surface origin for a move, the
    /// dragged edges for a resize.
    pub origin: Point,
    /// Window geometry box in layout space when the resize started.
    pub geometry: Rect,
    pub edges: ResizeEdges,
}

impl GestureGrab {
    pub fn begin_move(&mut self, window_id: WindowId, cursor: Point, current: Rect) {
        *self = Self {
            mode: CursorMode::Move,
            window: Some(window_id),
            origin: Point::new(cursor.x - current.x as f64, cursor.y - current.y as f64),
            geometry: current,
            edges: ResizeEdges::empty(),
        };
    }

    pub fn begin_resize(&mut self, window_id: WindowId, cursor: Point, geo_box: Rect, edges: ResizeEdges) {
        let anchor_x = geo_box.x.saturating_add(if edges.contains(ResizeEdges::RIGHT) { geo_box.width } else { 0 });
        let anchor_y = geo_box.y.saturating_add(if edges.contains(ResizeEdges::BOTTOM) { geo_box.height } else { 0 });
        *self = Self {
            mode: CursorMode::Resize,
            window: Some(window_id),
            origin: Point::new(cursor.x - anchor_x as f64, cursor.y - anchor_y as f64),
            geometry: geo_box,
            edges,
        };
    }

    pub fn is_active(&self) -> bool {
        self.mode != CursorMode::Passthrough
    }

    pub fn is_grabbing(&self, window_id: WindowId) -> bool {
        self.is_active() && self.window == Some(window_id)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Surface position for a move grab at `cursor`. The top edge never goes
    /// above the layout.
    pub fn move_target(&self, cursor: Point) -> (i32, i32) {
        let x = (cursor.x - self.origin.x).round() as i32;
        let y = (cursor.y - self.origin.y).max(0.0).round() as i32;
        (x, y)
    }
}
