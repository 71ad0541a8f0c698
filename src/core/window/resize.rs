//! Interactive resize math.

use bitflags::bitflags;

use super::grab::GestureGrab;
use super::window::Window;
use crate::util::geometry::{clamp_dimension, Point, Rect};

bitflags! {
    /// Edges moved by an interactive resize.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResizeEdges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

/// Closest horizontal and vertical edge of `geo_box` to the cursor.
/// Ties go to the left and top edges.
pub fn nearest_edges(geo_box: &Rect, cursor: Point) -> ResizeEdges {
    let left = (cursor.x - geo_box.x as f64).abs() as i32;
    let right = (cursor.x - geo_box.right() as f64).abs() as i32;
    let top = (cursor.y - geo_box.y as f64).abs() as i32;
    let bottom = (cursor.y - geo_box.bottom() as f64).abs() as i32;

    let mut edges = ResizeEdges::empty();
    edges |= if left <= right { ResizeEdges::LEFT } else { ResizeEdges::RIGHT };
    edges |= if top <= bottom { ResizeEdges::TOP } else { ResizeEdges::BOTTOM };
    edges
}

/// Compute the window's new surface rectangle for a resize grab.
///
/// Dragged edges never cross their opposite edge. Position only follows
/// the axis whose size actually changed after clamping, so a window pinned
/// at its minimum does not slide.
pub fn compute_resize(grab: &GestureGrab, cursor: Point, window: &Window) -> Rect {
    let border_x = (cursor.x - grab.origin.x).round() as i32;
    let border_y = (cursor.y - grab.origin.y).round() as i32;
    let start = grab.geometry;

    let mut new_left = start.x;
    let mut new_right = start.right();
    let mut new_top = start.y;
    let mut new_bottom = start.bottom();

    if grab.edges.contains(ResizeEdges::TOP) {
        new_top = border_y;
        if new_top >= new_bottom {
            new_top = new_bottom - 1;
        }
    } else if grab.edges.contains(ResizeEdges::BOTTOM) {
        new_bottom = border_y;
        if new_bottom <= new_top {
            new_bottom = new_top + 1;
        }
    }

    if grab.edges.contains(ResizeEdges::LEFT) {
        new_left = border_x;
        if new_left >= new_right {
            new_left = new_right - 1;
        }
    } else if grab.edges.contains(ResizeEdges::RIGHT) {
        new_right = border_x;
        if new_right <= new_left {
            new_right = new_left + 1;
        }
    }

    let min = window.min_size();
    let max = window.max_size();
    let width = clamp_dimension(new_right.saturating_sub(new_left), min.width, max.width);
    let height = clamp_dimension(new_bottom.saturating_sub(new_top), min.height, max.height);

    let geo = window.geometry();
    let x = if width == window.current.width { window.current.x } else { new_left - geo.x };
    let y = if height == window.current.height { window.current.y } else { new_top - geo.y };

    Rect::new(x, y, width, height)
}
