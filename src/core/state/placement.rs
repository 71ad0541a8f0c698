//! Geometry and placement methods.
//!
//! Every rectangle change goes through `set_geometry`, `set_position`, or
//! `set_size`, which clamp the size into the client's constraints, keep the
//! top edge on screen, and snapshot the restore rectangle while the window
//! is stacking.

use super::*;
use crate::core::window::placement::area_fits;
use crate::core::window::Placement;
use crate::util::geometry::Rect;
use crate::util::logging::PLACEMENT;

/// Which output rectangle a placement fills.
#[derive(Clone, Copy)]
enum TargetArea {
    Usable,
    Full,
}

impl CompositorState {
    // =========================================================================
    // Rectangle mutators
    // =========================================================================

    pub fn set_geometry(&mut self, window_id: WindowId, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        let window = self.window_mut_or_err(window_id)?;
        let (width, height) = window.clamp_size(width, height);

        if window.placement == Placement::Stacking {
            window.previous = window.current;
        }
        window.current = Rect::new(x, y.max(0), width, height);
        let current = window.current;
        let node_id = window.node_id;
        window.shell.inner_mut().impl_set_geometry(current);

        self.scene.set_position(node_id, current.x, current.y);
        self.flush_shell_requests(window_id);
        crate::slog!(PLACEMENT, "Window {} geometry {:?}", window_id, current);
        Ok(())
    }

    pub fn set_position(&mut self, window_id: WindowId, x: i32, y: i32) -> Result<()> {
        let window = self.window_mut_or_err(window_id)?;
        if window.placement == Placement::Stacking {
            window.previous.x = window.current.x;
            window.previous.y = window.current.y;
        }
        window.current.x = x;
        window.current.y = y.max(0);
        let current = window.current;
        let node_id = window.node_id;
        window.shell.inner_mut().impl_set_position(current.x, current.y, current);

        self.scene.set_position(node_id, current.x, current.y);
        self.flush_shell_requests(window_id);
        Ok(())
    }

    pub fn set_size(&mut self, window_id: WindowId, width: i32, height: i32) -> Result<()> {
        let window = self.window_mut_or_err(window_id)?;
        let (width, height) = window.clamp_size(width, height);
        if window.placement == Placement::Stacking {
            window.previous.width = window.current.width;
            window.previous.height = window.current.height;
        }
        let before = window.current;
        window.current.width = width;
        window.current.height = height;
        window.shell.inner_mut().impl_set_size(width, height, before);

        self.flush_shell_requests(window_id);
        Ok(())
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Whether the window's surface tree holds pointer or keyboard focus.
    pub fn caller_has_focus(&self, window_id: WindowId) -> bool {
        let Some(surface_id) = self.windows.get(&window_id).map(|w| w.surface_id) else {
            return false;
        };
        self.pointer_focus_root() == Some(surface_id)
            || self.focus.keyboard_focus.map(|s| self.root_surface(s)) == Some(surface_id)
    }

    /// Output a window maximizes or fullscreens onto: the one overlapping its
    /// restore rectangle the most, else the one under the cursor, else the
    /// center output.
    pub fn find_output(&self, window_id: WindowId) -> Option<OutputId> {
        let window = self.windows.get(&window_id)?;
        if let Some(id) = self.outputs.largest_overlap(&window.previous) {
            return Some(id);
        }
        let (cx, cy) = self.pointer.position().rounded();
        self.outputs.output_at(cx, cy).or_else(|| self.outputs.center_output())
    }

    /// Change the window's placement. Returns false when the request is
    /// denied: unchanged placement, an unfocused caller, no output, or an
    /// output area outside the size constraints. `force` skips the first
    /// two checks.
    pub fn set_placement(&mut self, window_id: WindowId, placement: Placement, force: bool) -> Result<bool> {
        let current = self.window_or_err(window_id)?.placement;

        if !force {
            if current == placement {
                return Ok(false);
            }
            if !self.caller_has_focus(window_id) {
                tracing::debug!(
                    "Denied {} request from unfocused window {}",
                    placement.name(),
                    window_id
                );
                return Ok(false);
            }
        }

        let applied = match placement {
            Placement::Stacking => {
                self.stack(window_id)?;
                true
            }
            Placement::Maximized => self.fill_output(window_id, TargetArea::Usable)?,
            Placement::Fullscreen => self.fill_output(window_id, TargetArea::Full)?,
        };

        if applied {
            let window = self.window_mut_or_err(window_id)?;
            window.previous_placement = window.placement;
            window.placement = placement;
            self.sync_placement_flags(window_id);
            tracing::info!("Window {} placement {} -> {}", window_id, current.name(), placement.name());
        } else {
            tracing::debug!("Window {} cannot become {}", window_id, placement.name());
        }
        Ok(applied)
    }

    fn stack(&mut self, window_id: WindowId) -> Result<()> {
        let window = self.window_mut_or_err(window_id)?;
        let shell = window.shell.inner_mut();
        shell.impl_set_maximized(false);
        shell.impl_set_fullscreen(false);
        let previous = window.previous;

        self.set_geometry(window_id, previous.x, previous.y, previous.width, previous.height)?;
        self.update_outputs(window_id, false)
    }

    fn fill_output(&mut self, window_id: WindowId, target: TargetArea) -> Result<bool> {
        let Some(output) = self.find_output(window_id).and_then(|id| self.outputs.get(id)) else {
            return Ok(false);
        };
        let area = match target {
            TargetArea::Usable => output.usable_area,
            TargetArea::Full => output.full_area,
        };

        let window = self.window_mut_or_err(window_id)?;
        if !area_fits(&area, window.min_size(), window.max_size()) {
            return Ok(false);
        }

        let shell = window.shell.inner_mut();
        match target {
            TargetArea::Usable => {
                shell.impl_set_fullscreen(false);
                shell.impl_set_maximized(true);
            }
            TargetArea::Full => shell.impl_set_fullscreen(true),
        }

        self.set_geometry(window_id, area.x, area.y, area.width, area.height)?;
        self.update_outputs(window_id, false)?;
        Ok(true)
    }

    /// Flip between maximized and stacking. Fullscreen windows ignore it.
    pub fn toggle_maximize(&mut self, window_id: WindowId) -> Result<bool> {
        let placement = self.window_or_err(window_id)?.placement;
        match placement {
            Placement::Fullscreen => Ok(false),
            Placement::Maximized => self.set_placement(window_id, Placement::Stacking, false),
            Placement::Stacking => self.set_placement(window_id, Placement::Maximized, false),
        }
    }

    /// Leave fullscreen for the placement held before it, or force
    /// fullscreen.
    pub fn toggle_fullscreen(&mut self, window_id: WindowId) -> Result<bool> {
        let window = self.window_or_err(window_id)?;
        if window.placement == Placement::Fullscreen {
            let previous = match window.previous_placement {
                Placement::Fullscreen => Placement::Stacking,
                other => other,
            };
            self.set_placement(window_id, previous, false)
        } else {
            self.set_placement(window_id, Placement::Fullscreen, true)
        }
    }
}
