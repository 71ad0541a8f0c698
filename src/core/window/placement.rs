//! Window placement modes.

use crate::util::geometry::{Rect, Size};

/// How a window's rectangle is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Free floating; the window remembers this rectangle for restore.
    #[default]
    Stacking,
    /// Fills the usable area of an output.
    Maximized,
    /// Fills the full area of an output.
    Fullscreen,
}

impl Placement {
    pub fn name(&self) -> &'static str {
        match self {
            Placement::Stacking => "stacking",
            Placement::Maximized => "maximized",
            Placement::Fullscreen => "fullscreen",
        }
    }
}

/// Whether a target area can be taken without violating size constraints.
pub fn area_fits(area: &Rect, min: Size, max: Size) -> bool {
    area.width >= min.width
        && area.height >= min.height
        && area.width <= max.width
        && area.height <= max.height
}
