use crate::core::SurfaceId;
use crate::util::geometry::{Point, Rect};

/// Cursor image shown over the desktop and after a gesture.
pub const CURSOR_DEFAULT: &str = "left_ptr";
/// Cursor image shown while moving a window.
pub const CURSOR_MOVE: &str = "fleur";

/// Pointer state for the seat: position, focus, buttons, and cursor image.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Absolute pointer position in layout coordinates
    pub x: f64,
    pub y: f64,
    /// Surface-local coordinates of the pointer within the focused surface
    pub focus_x: f64,
    pub focus_y: f64,
    /// Number of buttons currently pressed (for implicit grab tracking)
    pub button_count: u32,
    /// Last cursor image set by the compositor. `None` once a client
    /// surface has received an enter and may have set its own.
    pub cursor_image: Option<String>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Track button press/release for implicit grab
    pub fn update_button(&mut self, pressed: bool) {
        if pressed {
            self.button_count = self.button_count.saturating_add(1);
        } else {
            self.button_count = self.button_count.saturating_sub(1);
        }
    }

    /// Whether the pointer has an implicit grab (buttons pressed)
    pub fn has_implicit_grab(&self) -> bool {
        self.button_count > 0
    }

    /// Remember a compositor-chosen cursor image. Returns false if it is
    /// already showing.
    pub fn set_cursor_image(&mut self, name: &str) -> bool {
        if self.cursor_image.as_deref() == Some(name) {
            return false;
        }
        self.cursor_image = Some(name.to_string());
        true
    }

    /// A client took over the cursor image.
    pub fn forget_cursor_image(&mut self) {
        self.cursor_image = None;
    }

    pub fn set_focus_coords(&mut self, sx: f64, sy: f64) {
        self.focus_x = sx;
        self.focus_y = sy;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// The cursor stops moving. Clients still get relative motion.
    Lock,
    /// The cursor stays inside the region.
    Confine,
}

/// A client's request to lock or confine the pointer while one of its
/// surfaces has pointer focus.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerConstraint {
    pub surface_id: SurfaceId,
    pub kind: ConstraintKind,
    /// Surface-local region. `None` covers the whole surface.
    pub region: Option<Rect>,
    /// Surface-local position the cursor should land on when a lock ends.
    pub cursor_hint: Option<Point>,
}

impl PointerConstraint {
    pub fn new(surface_id: SurfaceId, kind: ConstraintKind) -> Self {
        Self {
            surface_id,
            kind,
            region: None,
            cursor_hint: None,
        }
    }

    pub fn with_region(mut self, region: Rect) -> Self {
        self.region = Some(region);
        self
    }

    /// Clip a motion delta so the cursor stays inside the confinement area.
    ///
    /// `origin` is the surface origin in layout space and `surface` the
    /// surface size. Locks swallow the whole delta.
    pub fn apply(&self, origin: Point, surface: Rect, cursor: Point, dx: f64, dy: f64) -> (f64, f64) {
        if self.kind == ConstraintKind::Lock {
            return (0.0, 0.0);
        }
        let region = self.region.unwrap_or(surface);
        if region.is_empty() {
            return (0.0, 0.0);
        }

        let left = origin.x + region.x as f64;
        let top = origin.y + region.y as f64;
        let right = origin.x + region.right() as f64 - 1.0;
        let bottom = origin.y + region.bottom() as f64 - 1.0;
        let x = (cursor.x + dx).clamp(left, right.max(left));
        let y = (cursor.y + dy).clamp(top, bottom.max(top));
        (x - cursor.x, y - cursor.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_image_is_memoized() {
        let mut pointer = PointerState::new();
        assert!(pointer.set_cursor_image(CURSOR_DEFAULT));
        assert!(!pointer.set_cursor_image(CURSOR_DEFAULT));
        assert!(pointer.set_cursor_image(CURSOR_MOVE));

        pointer.forget_cursor_image();
        assert!(pointer.set_cursor_image(CURSOR_MOVE));
    }

    #[test]
    fn confine_clips_motion_to_region() {
        let constraint = PointerConstraint::new(1, ConstraintKind::Confine).with_region(Rect::new(10, 10, 100, 50));
        let origin = Point::new(200.0, 100.0);
        let surface = Rect::new(0, 0, 400, 300);
        let cursor = Point::new(250.0, 120.0);

        assert_eq!(constraint.apply(origin, surface, cursor, 5.0, 5.0), (5.0, 5.0));
        assert_eq!(constraint.apply(origin, surface, cursor, 500.0, -500.0), (59.0, -10.0));
    }

    #[test]
    fn whole_surface_confinement_and_lock() {
        let confine = PointerConstraint::new(1, ConstraintKind::Confine);
        let surface = Rect::new(0, 0, 400, 300);
        let cursor = Point::new(10.0, 10.0);
        assert_eq!(confine.apply(Point::new(0.0, 0.0), surface, cursor, -20.0, 1000.0), (-10.0, 289.0));

        let lock = PointerConstraint::new(1, ConstraintKind::Lock);
        assert_eq!(lock.apply(Point::new(0.0, 0.0), surface, cursor, 3.0, 4.0), (0.0, 0.0));
    }

    #[test]
    fn button_count_saturates() {
        let mut pointer = PointerState::new();
        pointer.update_button(false);
        assert!(!pointer.has_implicit_grab());
        pointer.update_button(true);
        pointer.update_button(true);
        pointer.update_button(false);
        assert!(pointer.has_implicit_grab());
    }
}
