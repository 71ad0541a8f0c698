//! Surface and popup registry methods.
//!
//! Surfaces are created bare and take a role when a shell object is built
//! on them. Destroying a surface tears down whatever role object it had.

use super::*;
use crate::core::render::AnimationOptions;
use crate::util::geometry::Rect;
use crate::util::logging::WINDOW;

impl CompositorState {
    // =========================================================================
    // Surfaces
    // =========================================================================

    pub fn create_surface(&mut self) -> SurfaceId {
        let id = self.next_surface_id;
        self.next_surface_id += 1;
        self.surfaces.insert(id, Surface::new(id));
        tracing::debug!("Created surface {}", id);
        id
    }

    /// Apply a client commit with a new buffer size.
    pub fn commit_surface(&mut self, surface_id: SurfaceId, width: i32, height: i32) -> Result<()> {
        let surface = self
            .surfaces
            .get_mut(&surface_id)
            .ok_or(CoreError::InvalidSurfaceId(surface_id))?;
        surface.pending.width = width;
        surface.pending.height = height;
        if !surface.commit() {
            return Ok(());
        }
        let role = surface.role;

        let buffer_node = match role {
            SurfaceRole::None => None,
            SurfaceRole::Toplevel(window_id) => self.windows.get_mut(&window_id).map(|window| {
                window.shell.inner_mut().buffer_committed(width, height);
                window.buffer_node_id
            }),
            SurfaceRole::Popup(popup_id) => self.popups.get(&popup_id).map(|p| p.buffer_node_id),
            SurfaceRole::Layer(layer_id) => self.layers.get(&layer_id).map(|l| l.buffer_node_id),
        };
        if let Some(node_id) = buffer_node {
            self.scene.set_buffer_size(node_id, width, height);
        }
        Ok(())
    }

    /// Destroy a surface and the role object built on it.
    pub fn destroy_surface(&mut self, surface_id: SurfaceId) {
        let Some(role) = self.surfaces.get(&surface_id).map(|s| s.role) else {
            return;
        };

        match role {
            SurfaceRole::None => {}
            SurfaceRole::Toplevel(window_id) => self.destroy_window(window_id),
            SurfaceRole::Popup(popup_id) => self.destroy_popup(popup_id),
            SurfaceRole::Layer(layer_id) => self.destroy_layer_surface(layer_id),
        }

        self.constraints.remove(&surface_id);
        self.focus.forget_surface(surface_id);
        self.surfaces.remove(&surface_id);
        tracing::debug!("Destroyed surface {}", surface_id);
    }

    // =========================================================================
    // Popups
    // =========================================================================

    /// Give `surface_id` the popup role under `parent_surface`, positioned
    /// at `geometry` relative to the parent.
    pub fn create_popup(&mut self, surface_id: SurfaceId, parent_surface: SurfaceId, geometry: Rect) -> Result<PopupId> {
        let parent_node = self
            .tree_node_for_surface(parent_surface)
            .ok_or(CoreError::InvalidSurfaceId(parent_surface))?;
        let id = self.next_popup_id;
        let surface = self
            .surfaces
            .get_mut(&surface_id)
            .ok_or(CoreError::InvalidSurfaceId(surface_id))?;
        surface.set_role(SurfaceRole::Popup(id))?;
        surface.parent = Some(parent_surface);
        let size = surface.current;
        self.next_popup_id += 1;

        let node_id = self.scene.create_tree(parent_node);
        let buffer_node_id = self.scene.create_buffer(node_id, surface_id, size.width, size.height);
        self.scene.set_position(node_id, geometry.x, geometry.y);
        self.scene.set_enabled(node_id, false);

        self.popups.insert(
            id,
            Popup::new(id, surface_id, parent_surface, geometry, node_id, buffer_node_id),
        );
        tracing::debug!("Created popup {} for surface {} (parent {})", id, surface_id, parent_surface);
        Ok(id)
    }

    /// Tree node that children of a surface attach to.
    pub(crate) fn tree_node_for_surface(&self, surface_id: SurfaceId) -> Option<NodeId> {
        match self.surfaces.get(&surface_id)?.role {
            SurfaceRole::None => None,
            SurfaceRole::Toplevel(window_id) => self.windows.get(&window_id).map(|w| w.node_id),
            SurfaceRole::Popup(popup_id) => self.popups.get(&popup_id).map(|p| p.node_id),
            SurfaceRole::Layer(layer_id) => self.layers.get(&layer_id).map(|l| l.node_id),
        }
    }

    pub fn map_popup(&mut self, popup_id: PopupId) -> Result<()> {
        let now = self.now_ms();
        let settings = self.animation;
        let popup = self.popups.get_mut(&popup_id).ok_or(CoreError::InvalidPopupId(popup_id))?;
        popup.mapped = true;
        popup.animation.start(AnimationOptions::fade_in().ignoring_play_percentage(), &settings, now);
        let (node_id, surface_id, size) = (popup.node_id, popup.surface_id, popup.geometry.size());
        self.scene.set_enabled(node_id, true);

        if let Some((x, y)) = self.scene.coords(node_id) {
            let area = Rect::new(x, y, size.width, size.height);
            let outputs: Vec<OutputId> = self.outputs.intersecting(&area);
            for output_id in outputs {
                self.push_event(CompositorEvent::OutputEnter { surface_id, output_id });
            }
        }
        crate::slog!(WINDOW, "Popup {} mapped", popup_id);
        Ok(())
    }

    pub fn unmap_popup(&mut self, popup_id: PopupId) -> Result<()> {
        let popup = self.popups.get_mut(&popup_id).ok_or(CoreError::InvalidPopupId(popup_id))?;
        popup.mapped = false;
        let (node_id, surface_id) = (popup.node_id, popup.surface_id);
        self.scene.set_enabled(node_id, false);
        self.focus.forget_surface(surface_id);
        Ok(())
    }

    /// Move a popup relative to its parent.
    pub fn reposition_popup(&mut self, popup_id: PopupId, geometry: Rect) -> Result<()> {
        let popup = self.popups.get_mut(&popup_id).ok_or(CoreError::InvalidPopupId(popup_id))?;
        popup.geometry = geometry;
        let node_id = popup.node_id;
        self.scene.set_position(node_id, geometry.x, geometry.y);
        Ok(())
    }

    /// Destroy a popup together with every popup nested under it.
    pub fn destroy_popup(&mut self, popup_id: PopupId) {
        let Some(popup) = self.popups.remove(&popup_id) else {
            return;
        };

        let children: Vec<PopupId> = self
            .popups
            .values()
            .filter(|p| p.parent_surface == popup.surface_id)
            .map(|p| p.id)
            .collect();
        for child in children {
            self.destroy_popup(child);
        }

        self.scene.destroy(popup.node_id);
        self.focus.forget_surface(popup.surface_id);
        if let Some(surface) = self.surfaces.get_mut(&popup.surface_id) {
            surface.role = SurfaceRole::None;
            surface.parent = None;
        }
        tracing::debug!("Destroyed popup {}", popup_id);
    }

    /// Popups whose root surface is `root`.
    pub(crate) fn popups_rooted_at(&self, root: SurfaceId) -> Vec<PopupId> {
        self.popups
            .values()
            .filter(|p| self.root_surface(p.surface_id) == root)
            .map(|p| p.id)
            .collect()
    }
}
