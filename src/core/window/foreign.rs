//! Window state advertised to taskbars and docks.

use crate::core::{OutputId, SurfaceId, WindowId};
use crate::util::geometry::Rect;

/// Outside view of a window. The compositor keeps it in sync and reports
/// every change as an event; it never drives window state by itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignToplevelHandle {
    pub title: String,
    pub app_id: String,
    pub parent: Option<WindowId>,
    pub activated: bool,
    pub maximized: bool,
    pub fullscreen: bool,
    pub minimized: bool,
    pub outputs: Vec<OutputId>,
    /// Where a taskbar shows this window, used as the minimize target.
    pub rectangle: Option<(SurfaceId, Rect)>,
}

impl ForeignToplevelHandle {
    pub fn output_enter(&mut self, output_id: OutputId) {
        if !self.outputs.contains(&output_id) {
            self.outputs.push(output_id);
        }
    }

    pub fn output_leave(&mut self, output_id: OutputId) {
        self.outputs.retain(|&id| id != output_id);
    }
}

/// Request from a foreign management client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignToplevelRequest {
    Maximize(bool),
    Fullscreen(bool),
    Minimize(bool),
    Activate,
    Close,
    SetRectangle { surface_id: SurfaceId, rect: Rect },
}
