//! Requests from clients and from foreign toplevel managers.
//!
//! Client requests are policy-checked the same way as user actions: a
//! client may only move, resize, or re-place its window while it holds
//! focus.

use super::*;
use crate::core::window::{CursorMode, ForeignToplevelRequest, Placement, ResizeEdges, ShellSurface};
use crate::util::geometry::Rect;
use crate::util::logging::WINDOW;

impl CompositorState {
    // =========================================================================
    // Client requests
    // =========================================================================

    /// The client asked for an interactive move, usually from a titlebar.
    pub fn request_move(&mut self, window_id: WindowId) -> Result<bool> {
        self.set_placement(window_id, Placement::Stacking, false)?;
        self.begin_interactive(window_id, CursorMode::Move, ResizeEdges::empty())
    }

    pub fn request_resize(&mut self, window_id: WindowId, edges: ResizeEdges) -> Result<bool> {
        self.set_placement(window_id, Placement::Stacking, false)?;
        self.begin_interactive(window_id, CursorMode::Resize, edges)
    }

    pub fn request_maximize(&mut self, window_id: WindowId) -> Result<bool> {
        let changed = self.toggle_maximize(window_id)?;
        self.flush_shell_requests(window_id);
        Ok(changed)
    }

    pub fn request_fullscreen(&mut self, window_id: WindowId) -> Result<bool> {
        let changed = self.toggle_fullscreen(window_id)?;
        self.flush_shell_requests(window_id);
        Ok(changed)
    }

    pub fn request_minimize(&mut self, window_id: WindowId) -> Result<bool> {
        let minimized = self.window_or_err(window_id)?.minimized;
        self.set_minimized(window_id, !minimized)
    }

    /// Every decoration mode request is answered with server side.
    pub fn request_decoration_mode(&mut self, window_id: WindowId) -> Result<()> {
        match &mut self.window_mut_or_err(window_id)?.shell {
            ShellSurface::Xdg(toplevel) => toplevel.negotiate_decoration(),
            ShellSurface::Xwayland(_) => return Ok(()),
        }
        self.flush_shell_requests(window_id);
        Ok(())
    }

    /// X11 clients configure themselves; the request is applied like any
    /// other geometry change.
    pub fn request_configure(&mut self, window_id: WindowId, rect: Rect) -> Result<()> {
        crate::slog!(WINDOW, "Window {} requested configure {:?}", window_id, rect);
        self.set_geometry(window_id, rect.x, rect.y, rect.width, rect.height)?;
        self.update_outputs(window_id, false)
    }

    /// An X11 client moved or resized itself. Ignored while the window is
    /// grabbed, since the gesture owns its geometry.
    pub fn configure_notify(&mut self, window_id: WindowId, rect: Rect) -> Result<()> {
        if self.grab.is_grabbing(window_id) {
            return Ok(());
        }

        let window = self.window_mut_or_err(window_id)?;
        if let ShellSurface::Xwayland(surface) = &mut window.shell {
            surface.area = rect;
        } else {
            return Ok(());
        }
        if window.placement == Placement::Stacking {
            window.previous = window.current;
        }
        window.current = rect;
        let node_id = window.node_id;
        self.scene.set_position(node_id, rect.x, rect.y);
        self.update_outputs(window_id, false)
    }

    // =========================================================================
    // Foreign toplevel management
    // =========================================================================

    pub fn handle_foreign_request(&mut self, window_id: WindowId, request: ForeignToplevelRequest) -> Result<()> {
        tracing::debug!("Foreign request {:?} for window {}", request, window_id);
        match request {
            ForeignToplevelRequest::Maximize(maximize) => {
                let target = if maximize { Placement::Maximized } else { Placement::Stacking };
                self.set_placement(window_id, target, false)?;
            }
            ForeignToplevelRequest::Fullscreen(fullscreen) => {
                let target = if fullscreen { Placement::Fullscreen } else { Placement::Stacking };
                self.set_placement(window_id, target, false)?;
            }
            ForeignToplevelRequest::Minimize(minimize) => {
                self.set_minimized(window_id, minimize)?;
            }
            ForeignToplevelRequest::Activate => {
                self.set_minimized(window_id, false)?;
                self.focus_view(Some(window_id));
            }
            ForeignToplevelRequest::Close => self.close_window(window_id)?,
            ForeignToplevelRequest::SetRectangle { surface_id, rect } => {
                self.window_mut_or_err(window_id)?.foreign.rectangle = Some((surface_id, rect));
            }
        }
        self.flush_shell_requests(window_id);
        Ok(())
    }
}
