//! Pointer locks and confinements.
//!
//! A constraint belongs to a surface and is active only while that surface
//! has pointer focus. Motion handling consults the active constraint
//! before moving the cursor.

use super::*;
use crate::core::input::{ConstraintKind, PointerConstraint};
use crate::util::geometry::{Point, Rect};
use crate::util::logging::SEAT;

impl CompositorState {
    /// Install a lock or confinement, replacing any previous one on the
    /// same surface.
    pub fn set_pointer_constraint(&mut self, constraint: PointerConstraint) -> Result<()> {
        let surface_id = constraint.surface_id;
        if !self.surfaces.contains_key(&surface_id) {
            return Err(CoreError::InvalidSurfaceId(surface_id));
        }
        crate::slog!(SEAT, "Surface {} requested {:?} of the pointer", surface_id, constraint.kind);
        self.constraints.insert(surface_id, constraint);
        Ok(())
    }

    /// Record where the client wants the cursor once its lock ends.
    pub fn set_constraint_cursor_hint(&mut self, surface_id: SurfaceId, x: f64, y: f64) -> Result<()> {
        let constraint = self
            .constraints
            .get_mut(&surface_id)
            .ok_or(CoreError::InvalidSurfaceId(surface_id))?;
        constraint.cursor_hint = Some(Point::new(x, y));
        Ok(())
    }

    /// Drop the surface's constraint. Ending an active lock warps the
    /// cursor to its hint.
    pub fn remove_pointer_constraint(&mut self, surface_id: SurfaceId) {
        let was_active = self.active_constraint().map(|c| c.surface_id) == Some(surface_id);
        let Some(constraint) = self.constraints.remove(&surface_id) else {
            return;
        };
        if was_active && constraint.kind == ConstraintKind::Lock {
            self.warp_to_constraint(&constraint);
        }
        crate::slog!(SEAT, "Pointer constraint on surface {} removed", surface_id);
    }

    /// Constraint of the surface under pointer focus, if it has one.
    pub fn active_constraint(&self) -> Option<&PointerConstraint> {
        self.focus.pointer_focus.and_then(|surface_id| self.constraints.get(&surface_id))
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.active_constraint()
            .is_some_and(|c| c.kind == ConstraintKind::Lock)
    }

    /// Move the cursor to the constraint's hint. Only constraints on the
    /// focused window's surface carry a meaningful position.
    pub fn warp_to_constraint(&mut self, constraint: &PointerConstraint) {
        let Some(hint) = constraint.cursor_hint else {
            return;
        };
        let Some(window) = self.focus.focused_window.and_then(|id| self.windows.get(&id)) else {
            return;
        };
        if window.surface_id != constraint.surface_id {
            return;
        }

        let (x, y) = (window.current.x as f64 + hint.x, window.current.y as f64 + hint.y);
        self.pointer.move_to(x, y);
        self.pointer.set_focus_coords(hint.x, hint.y);
        crate::slog!(SEAT, "Warped cursor to constraint hint ({:.1}, {:.1})", x, y);
    }

    /// Where a cursor heading for `target` may actually go.
    pub(crate) fn constrain_motion(&self, target: Point) -> Point {
        let Some(constraint) = self.active_constraint() else {
            return target;
        };
        let Some(surface) = self.surfaces.get(&constraint.surface_id) else {
            return target;
        };

        let cursor = self.pointer.position();
        let origin = Point::new(cursor.x - self.pointer.focus_x, cursor.y - self.pointer.focus_y);
        let bounds = Rect::new(0, 0, surface.current.width, surface.current.height);
        let (dx, dy) = constraint.apply(origin, bounds, cursor, target.x - cursor.x, target.y - cursor.y);
        Point::new(cursor.x + dx, cursor.y + dy)
    }
}
