//! Window lifecycle methods.
//!
//! Contains `CompositorState` methods for creating, mapping, unmapping,
//! closing, minimizing, and destroying windows, plus the bookkeeping that
//! keeps output membership and the foreign toplevel handle in sync.

use super::*;
use crate::core::input::pointer::CURSOR_DEFAULT;
use crate::core::render::{AnimationOptions, FinishAction, SceneLayer};
use crate::core::window::{Placement, ShellKind, ShellSurface};
use crate::util::geometry::Rect;
use crate::util::logging::{OUTPUT, WINDOW};

impl CompositorState {
    // =========================================================================
    // Creation and destruction
    // =========================================================================

    /// Give `surface_id` the toplevel role backed by `shell`. The window
    /// stays hidden until it is mapped.
    pub fn create_window(&mut self, surface_id: SurfaceId, shell: impl Into<ShellSurface>) -> Result<WindowId> {
        let id = self.next_window_id;
        let surface = self
            .surfaces
            .get_mut(&surface_id)
            .ok_or(CoreError::InvalidSurfaceId(surface_id))?;
        surface.set_role(SurfaceRole::Toplevel(id))?;
        let size = surface.current;
        self.next_window_id += 1;

        let layer = self.scene.layer(SceneLayer::Normal);
        let node_id = self.scene.create_tree(layer);
        let buffer_node_id = self.scene.create_buffer(node_id, surface_id, size.width, size.height);
        self.scene.set_enabled(node_id, false);

        let window = Window::new(id, surface_id, shell.into(), node_id, buffer_node_id, self.active_workspace);
        tracing::info!("Created {:?} window {} for surface {}", window.kind(), id, surface_id);

        self.windows.insert(id, window);
        self.surface_to_window.insert(surface_id, id);
        self.window_tree.insert(id);
        self.sync_foreign(id);
        Ok(id)
    }

    /// Remove a window and scrub every reference to it.
    pub fn destroy_window(&mut self, window_id: WindowId) {
        let Some(surface_id) = self.windows.get(&window_id).map(|w| w.surface_id) else {
            return;
        };

        // The grab must never outlive its window.
        if self.grab.window == Some(window_id) {
            self.grab.clear();
        }
        if self.pointer_focus_root() == Some(surface_id) {
            self.focus.pointer_focus = None;
        }
        self.focus.forget_window(window_id, surface_id);

        for popup_id in self.popups_rooted_at(surface_id) {
            self.destroy_popup(popup_id);
        }

        let Some(window) = self.windows.remove(&window_id) else {
            return;
        };
        self.scene.destroy(window.node_id);
        self.window_tree.remove(window_id);
        self.surface_to_window.remove(&surface_id);
        if let Some(surface) = self.surfaces.get_mut(&surface_id) {
            surface.role = SurfaceRole::None;
        }

        let orphans: Vec<WindowId> = self
            .windows
            .values()
            .filter(|w| w.foreign.parent == Some(window_id))
            .map(|w| w.id)
            .collect();
        for orphan in orphans {
            if let Some(w) = self.windows.get_mut(&orphan) {
                w.foreign.parent = None;
            }
            self.sync_foreign(orphan);
        }

        self.push_event(CompositorEvent::ForeignToplevelClosed { window_id });
        tracing::info!("Destroyed window {}", window_id);
    }

    // =========================================================================
    // Map / unmap / close
    // =========================================================================

    /// The client is ready to be shown.
    pub fn map_window(&mut self, window_id: WindowId) -> Result<()> {
        let center_usable = self
            .outputs
            .center_output()
            .and_then(|id| self.outputs.get(id))
            .map(|output| output.usable_area);

        let window = self.window_mut_or_err(window_id)?;
        let first_map = window.pending_map;
        if first_map {
            let initial = match &window.shell {
                ShellSurface::Xdg(_) => {
                    let geo = window.geometry();
                    Rect::new(0, 0, geo.width, geo.height)
                }
                ShellSurface::Xwayland(surface) => surface.area,
            };
            window.current = initial;
            window.previous = initial;
            window.pending_map = false;
        }
        window.mapped = true;
        let kind = window.kind();
        let current = window.current;
        let node_id = window.node_id;
        let requested = window.shell.inner().initial_placement();

        self.scene.set_position(node_id, current.x, current.y);
        if first_map && kind == ShellKind::Xdg {
            if let Some(usable) = center_usable {
                let center_x = usable.x + usable.width / 2;
                let center_y = usable.y + usable.height / 2;
                self.set_position(window_id, center_x - current.width / 2, center_y - current.height / 2)?;
            }
        }

        self.update_visibility(window_id);
        if let Some(placement) = requested {
            self.set_placement(window_id, placement, true)?;
        }
        self.update_outputs(window_id, true)?;
        self.focus_view(Some(window_id));

        let now = self.now_ms();
        let settings = self.animation;
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.animation.start(AnimationOptions::fade_in(), &settings, now);
        }

        self.flush_shell_requests(window_id);
        self.sync_foreign(window_id);
        tracing::info!("Mapped window {} at {:?}", window_id, self.windows.get(&window_id).map(|w| w.current));
        Ok(())
    }

    /// The client withdrew its buffer. The window keeps its state and may be
    /// mapped again.
    pub fn unmap_window(&mut self, window_id: WindowId) -> Result<()> {
        let window = self.window_mut_or_err(window_id)?;
        window.mapped = false;
        let (node_id, surface_id, activated) = (window.node_id, window.surface_id, window.activated);
        self.scene.set_enabled(node_id, false);

        if self.grab.is_grabbing(window_id) {
            self.reset_cursor_mode();
        }
        if activated {
            self.set_activated(window_id, false);
        }
        if self.focus.is_focused(window_id) {
            self.focus.focused_window = None;
        }
        if self.focus.keyboard_focus.map(|s| self.root_surface(s)) == Some(surface_id) {
            self.focus.keyboard_focus = None;
        }
        if self.pointer_focus_root() == Some(surface_id) {
            self.focus.pointer_focus = None;
        }

        tracing::info!("Unmapped window {}", window_id);
        Ok(())
    }

    /// Ask the window to close. Mapped windows fade out first and receive
    /// the close request when the fade completes.
    pub fn close_window(&mut self, window_id: WindowId) -> Result<()> {
        let now = self.now_ms();
        let settings = self.animation;
        let window = self.window_mut_or_err(window_id)?;

        let animated = window.mapped
            && window.animation.start(
                AnimationOptions::fade_out().then(FinishAction::CloseWindow(window_id)),
                &settings,
                now,
            );
        if !animated {
            window.shell.inner_mut().close();
            self.flush_shell_requests(window_id);
        }
        crate::slog!(WINDOW, "Close requested for window {} (animated: {})", window_id, animated);
        Ok(())
    }

    // =========================================================================
    // Minimize and visibility
    // =========================================================================

    /// Returns false if the window already was in the requested state.
    pub fn set_minimized(&mut self, window_id: WindowId, minimized: bool) -> Result<bool> {
        let window = self.window_mut_or_err(window_id)?;
        if window.minimized == minimized {
            return Ok(false);
        }
        window.minimized = minimized;
        window.foreign.minimized = minimized;
        window.shell.inner_mut().impl_set_minimized(minimized);
        let activated = window.activated;

        self.update_visibility(window_id);
        if minimized {
            if self.focus.is_focused(window_id) {
                self.focus_view(None);
            } else if activated {
                self.set_activated(window_id, false);
            }
        }

        self.flush_shell_requests(window_id);
        self.sync_foreign(window_id);
        tracing::debug!("Window {} minimized: {}", window_id, minimized);
        Ok(true)
    }

    /// Enable the window's node only if it should be drawn right now.
    pub(crate) fn update_visibility(&mut self, window_id: WindowId) {
        let workspace = self.active_workspace;
        if let Some(window) = self.windows.get(&window_id) {
            let visible = window.is_visible_on(workspace);
            self.scene.set_enabled(window.node_id, visible);
        }
    }

    pub(crate) fn set_activated(&mut self, window_id: WindowId, activated: bool) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.shell.inner_mut().impl_set_activated(activated);
            window.activated = activated;
            window.foreign.activated = activated;
        }
        self.flush_shell_requests(window_id);
        self.sync_foreign(window_id);
    }

    pub(crate) fn reset_cursor_mode(&mut self) {
        if self.grab.is_active() {
            tracing::debug!("Gesture on window {:?} ended", self.grab.window);
        }
        self.grab.clear();
        self.set_cursor_image(CURSOR_DEFAULT);
    }

    pub(crate) fn set_cursor_image(&mut self, name: &str) {
        if self.pointer.set_cursor_image(name) {
            self.push_event(CompositorEvent::CursorImage { name: name.to_string() });
        }
    }

    pub(crate) fn pointer_focus_root(&self) -> Option<SurfaceId> {
        self.focus.pointer_focus.map(|s| self.root_surface(s))
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Announce outputs the window started or stopped overlapping. With
    /// `ignore_previous` every overlapped output is entered again.
    pub fn update_outputs(&mut self, window_id: WindowId, ignore_previous: bool) -> Result<()> {
        let window = self.window_or_err(window_id)?;
        let now = self.outputs.intersecting(&window.current);
        let before = if ignore_previous { Vec::new() } else { window.outputs.clone() };
        let surface_id = window.surface_id;

        let entered: Vec<OutputId> = now.iter().filter(|id| !before.contains(id)).copied().collect();
        let left: Vec<OutputId> = before.iter().filter(|id| !now.contains(id)).copied().collect();

        let window = self.window_mut_or_err(window_id)?;
        for &output_id in &left {
            window.foreign.output_leave(output_id);
        }
        for &output_id in &entered {
            window.foreign.output_enter(output_id);
        }
        window.outputs = now;

        for &output_id in &left {
            crate::slog!(OUTPUT, "Window {} left output {}", window_id, output_id);
            self.push_event(CompositorEvent::OutputLeave { surface_id, output_id });
        }
        for &output_id in &entered {
            crate::slog!(OUTPUT, "Window {} entered output {}", window_id, output_id);
            self.push_event(CompositorEvent::OutputEnter { surface_id, output_id });
        }
        if !entered.is_empty() || !left.is_empty() {
            self.sync_foreign(window_id);
        }
        Ok(())
    }

    // =========================================================================
    // Foreign handle and client metadata
    // =========================================================================

    pub fn set_title(&mut self, window_id: WindowId, title: &str) -> Result<()> {
        self.window_mut_or_err(window_id)?.foreign.title = title.to_string();
        self.sync_foreign(window_id);
        Ok(())
    }

    pub fn set_app_id(&mut self, window_id: WindowId, app_id: &str) -> Result<()> {
        self.window_mut_or_err(window_id)?.foreign.app_id = app_id.to_string();
        self.sync_foreign(window_id);
        Ok(())
    }

    /// Link a dialog to its parent window. Unknown parents unlink.
    pub fn set_parent(&mut self, window_id: WindowId, parent: Option<WindowId>) -> Result<()> {
        let parent = parent.filter(|id| *id != window_id && self.windows.contains_key(id));
        self.window_mut_or_err(window_id)?.foreign.parent = parent;
        self.sync_foreign(window_id);
        Ok(())
    }

    /// Mirror placement flags into the foreign handle.
    pub(crate) fn sync_placement_flags(&mut self, window_id: WindowId) {
        if let Some(window) = self.windows.get_mut(&window_id) {
            window.foreign.maximized = window.placement == Placement::Maximized;
            window.foreign.fullscreen = window.placement == Placement::Fullscreen;
        }
        self.sync_foreign(window_id);
    }

    pub(crate) fn sync_foreign(&mut self, window_id: WindowId) {
        if let Some(handle) = self.windows.get(&window_id).map(|w| w.foreign.clone()) {
            self.push_event(CompositorEvent::ForeignToplevelChanged { window_id, handle });
        }
    }

    /// Forward requests recorded by the shell backend to the protocol glue.
    pub(crate) fn flush_shell_requests(&mut self, window_id: WindowId) {
        let Some(window) = self.windows.get_mut(&window_id) else {
            return;
        };
        let surface_id = window.surface_id;
        let requests = window.shell.inner_mut().take_requests();
        for request in requests {
            crate::slog!(WINDOW, "Window {} <- {:?}", window_id, request);
            self.push_event(CompositorEvent::Shell { window_id, surface_id, request });
        }
    }
}
