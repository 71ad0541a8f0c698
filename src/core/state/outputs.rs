//! Output and layer surface methods.
//!
//! Outputs are registered by the platform. Layer surfaces dock to one
//! output and shrink its usable area; every change re-arranges the layers
//! of the affected output.

use super::*;
use crate::core::output::{arrange_layers, Anchor, LayerSurfaceState, Margin, Output, ShellLayer};
use crate::util::geometry::{Rect, Size};
use crate::util::logging::OUTPUT;

impl CompositorState {
    // =========================================================================
    // Outputs
    // =========================================================================

    pub fn add_output(&mut self, name: &str, full_area: Rect) -> OutputId {
        let id = self.next_output_id;
        self.next_output_id += 1;
        self.outputs.add(Output::new(id, name, full_area));
        tracing::info!("Added output {} '{}' at {:?}", id, name, full_area);

        let ids: Vec<WindowId> = self.windows.values().filter(|w| w.mapped).map(|w| w.id).collect();
        for window_id in ids {
            if let Err(e) = self.update_outputs(window_id, false) {
                tracing::warn!("Failed to update outputs of window {}: {}", window_id, e);
            }
        }
        id
    }

    /// Remove an output. Its layer surfaces are destroyed and windows that
    /// were on it leave it.
    pub fn remove_output(&mut self, output_id: OutputId) -> Result<()> {
        let output = self.outputs.remove(output_id).ok_or(CoreError::InvalidOutputId(output_id))?;
        for layer_id in output.layers {
            self.destroy_layer_surface(layer_id);
        }

        let affected: Vec<(WindowId, SurfaceId)> = self
            .windows
            .values()
            .filter(|w| w.outputs.contains(&output_id))
            .map(|w| (w.id, w.surface_id))
            .collect();
        for (window_id, surface_id) in affected {
            if let Some(window) = self.windows.get_mut(&window_id) {
                window.outputs.retain(|&id| id != output_id);
                window.foreign.output_leave(output_id);
            }
            self.push_event(CompositorEvent::OutputLeave { surface_id, output_id });
            self.sync_foreign(window_id);
        }

        tracing::info!("Removed output {} '{}'", output_id, output.name);
        Ok(())
    }

    /// Recompute layer geometry and the usable area of one output.
    pub fn arrange_output(&mut self, output_id: OutputId) -> Result<()> {
        let output = self.outputs.get(output_id).ok_or(CoreError::InvalidOutputId(output_id))?;
        let full_area = output.full_area;
        let layer_ids = output.layers.clone();

        let mut docked: Vec<LayerSurface> = layer_ids.iter().filter_map(|id| self.layers.get(id).cloned()).collect();
        let usable = arrange_layers(full_area, docked.iter_mut());

        for layer in docked {
            self.scene.set_position(layer.node_id, layer.geometry.x, layer.geometry.y);
            self.layers.insert(layer.id, layer);
        }
        if let Some(output) = self.outputs.get_mut(output_id) {
            if output.usable_area != usable {
                crate::slog!(OUTPUT, "Output {} usable area {:?}", output_id, usable);
            }
            output.usable_area = usable;
        }
        Ok(())
    }

    // =========================================================================
    // Layer surfaces
    // =========================================================================

    /// Give `surface_id` the layer role on `output_id`. Without an output the
    /// center output is used.
    pub fn create_layer_surface(
        &mut self,
        surface_id: SurfaceId,
        output_id: Option<OutputId>,
        layer: ShellLayer,
    ) -> Result<LayerId> {
        let output_id = output_id
            .or_else(|| self.outputs.center_output())
            .ok_or(CoreError::InvalidOutputId(0))?;
        if self.outputs.get(output_id).is_none() {
            return Err(CoreError::InvalidOutputId(output_id));
        }

        let id = self.next_layer_id;
        let surface = self
            .surfaces
            .get_mut(&surface_id)
            .ok_or(CoreError::InvalidSurfaceId(surface_id))?;
        surface.set_role(SurfaceRole::Layer(id))?;
        let size = surface.current;
        self.next_layer_id += 1;

        let parent = self.scene.layer(layer.scene_layer());
        let node_id = self.scene.create_tree(parent);
        let buffer_node_id = self.scene.create_buffer(node_id, surface_id, size.width, size.height);
        self.scene.set_enabled(node_id, false);

        self.layers.insert(
            id,
            LayerSurface {
                id,
                surface_id,
                output_id,
                node_id,
                buffer_node_id,
                layer,
                anchor: Anchor::empty(),
                exclusive_zone: 0,
                margin: Margin::default(),
                desired_size: Size::default(),
                geometry: Rect::default(),
                mapped: false,
            },
        );
        if let Some(output) = self.outputs.get_mut(output_id) {
            output.layers.push(id);
        }
        tracing::debug!("Created {:?} layer surface {} on output {}", layer, id, output_id);
        Ok(id)
    }

    /// Apply a layer surface commit and re-arrange its output.
    pub fn configure_layer_surface(&mut self, layer_id: LayerId, state: LayerSurfaceState) -> Result<()> {
        let layer = self.layers.get_mut(&layer_id).ok_or(CoreError::InvalidLayerId(layer_id))?;
        layer.anchor = state.anchor;
        layer.exclusive_zone = state.exclusive_zone;
        layer.margin = state.margin;
        layer.desired_size = state.desired_size;
        let output_id = layer.output_id;
        self.arrange_output(output_id)
    }

    pub fn map_layer_surface(&mut self, layer_id: LayerId) -> Result<()> {
        self.set_layer_mapped(layer_id, true)
    }

    pub fn unmap_layer_surface(&mut self, layer_id: LayerId) -> Result<()> {
        self.set_layer_mapped(layer_id, false)
    }

    fn set_layer_mapped(&mut self, layer_id: LayerId, mapped: bool) -> Result<()> {
        let layer = self.layers.get_mut(&layer_id).ok_or(CoreError::InvalidLayerId(layer_id))?;
        layer.mapped = mapped;
        let (node_id, surface_id, output_id) = (layer.node_id, layer.surface_id, layer.output_id);
        self.scene.set_enabled(node_id, mapped);
        if !mapped {
            self.focus.forget_surface(surface_id);
        }
        self.arrange_output(output_id)?;

        if mapped {
            self.push_event(CompositorEvent::OutputEnter { surface_id, output_id });
        }
        Ok(())
    }

    pub fn destroy_layer_surface(&mut self, layer_id: LayerId) {
        let Some(layer) = self.layers.remove(&layer_id) else {
            return;
        };
        for popup_id in self.popups_rooted_at(layer.surface_id) {
            self.destroy_popup(popup_id);
        }
        self.scene.destroy(layer.node_id);
        self.focus.forget_surface(layer.surface_id);
        if let Some(surface) = self.surfaces.get_mut(&layer.surface_id) {
            surface.role = SurfaceRole::None;
        }

        if let Some(output) = self.outputs.get_mut(layer.output_id) {
            output.layers.retain(|&id| id != layer_id);
        }
        if let Err(e) = self.arrange_output(layer.output_id) {
            tracing::debug!("Layer surface {} outlived its output: {}", layer_id, e);
        }
        tracing::debug!("Destroyed layer surface {}", layer_id);
    }
}
