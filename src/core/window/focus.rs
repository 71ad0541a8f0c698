//! Focus management.

use crate::core::{SurfaceId, WindowId};

/// Input focus state.
///
/// Holds plain ids only. Destroying a window or surface must call the
/// matching `forget_*` helper before the object leaves its registry.
#[derive(Debug, Default)]
pub struct FocusManager {
    /// Window drawn as focused and activated.
    pub focused_window: Option<WindowId>,
    /// Surface receiving keyboard events.
    pub keyboard_focus: Option<SurfaceId>,
    /// Surface under the pointer that received an enter.
    pub pointer_focus: Option<SurfaceId>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_keyboard_focus(&self, surface_id: SurfaceId) -> bool {
        self.keyboard_focus == Some(surface_id)
    }

    pub fn is_focused(&self, window_id: WindowId) -> bool {
        self.focused_window == Some(window_id)
    }

    /// Drop every reference to a window and its surface. Returns true if
    /// the window was focused.
    pub fn forget_window(&mut self, window_id: WindowId, surface_id: SurfaceId) -> bool {
        let was_focused = self.is_focused(window_id);
        if was_focused {
            self.focused_window = None;
        }
        self.forget_surface(surface_id);
        was_focused
    }

    pub fn forget_surface(&mut self, surface_id: SurfaceId) {
        if self.keyboard_focus == Some(surface_id) {
            self.keyboard_focus = None;
        }
        if self.pointer_focus == Some(surface_id) {
            self.pointer_focus = None;
        }
    }
}
