//! Frame rendering.
//!
//! Walks the scene once per output, drawing each buffer with its animation
//! state and then advancing that animation.
//! Animations of surfaces no output draws are advanced after the walk.
//! Animation completions are collected during the walk and dispatched
//! afterwards, so a completion may start new animations or tear down the
//! window it belongs to.

use std::collections::HashSet;

use super::*;
use crate::core::render::pass::WindowDecor;
use crate::core::render::{AnimationCompleted, CompositingPass, FinishAction, Frame};
use crate::util::logging::{ANIMATION, RENDER};

impl CompositorState {
    /// Build the draw list for one output.
    pub fn render_output(&mut self, output_id: OutputId) -> Result<Frame> {
        let area = self
            .outputs
            .get(output_id)
            .map(|o| o.full_area)
            .ok_or(CoreError::InvalidOutputId(output_id))?;

        let now = self.now_ms();
        let settings = self.animation;
        let mut pass = CompositingPass::new(output_id, area, self.border);
        let mut completed: Vec<AnimationCompleted> = Vec::new();

        for buffer in self.scene.flatten() {
            let rect = buffer.rect();
            if !rect.intersects(&area) {
                continue;
            }

            let role = self.surfaces.get(&buffer.surface_id).map(|s| s.role);
            match role {
                Some(SurfaceRole::Toplevel(window_id)) => {
                    let Some(window) = self.windows.get_mut(&window_id) else {
                        continue;
                    };
                    let decor = WindowDecor {
                        kind: window.kind(),
                        geometry: window.geometry(),
                        activated: window.activated,
                    };
                    pass.draw_window(buffer.surface_id, rect, decor, window.animation.active_factor());
                    completed.extend(window.animation.update(&settings, now));
                }
                Some(SurfaceRole::Popup(popup_id)) => {
                    let Some(popup) = self.popups.get_mut(&popup_id) else {
                        continue;
                    };
                    pass.draw_popup(buffer.surface_id, rect, popup.animation.active_factor());
                    completed.extend(popup.animation.update(&settings, now));
                }
                _ => pass.draw_surface(buffer.surface_id, rect),
            }
        }

        let frame = pass.finish();
        crate::slog!(RENDER, "Output {}: {} elements", output_id, frame.elements.len());

        completed.extend(self.advance_undrawn_animations(now));

        for completion in completed {
            self.dispatch_completion(completion);
        }
        Ok(frame)
    }

    /// Advance animations of surfaces that no output draws, such as
    /// minimized or offscreen windows. Their fades would otherwise never
    /// finish.
    fn advance_undrawn_animations(&mut self, now: i64) -> Vec<AnimationCompleted> {
        let drawn: HashSet<SurfaceId> = self
            .scene
            .flatten()
            .into_iter()
            .filter(|buffer| self.outputs.iter().any(|o| buffer.rect().intersects(&o.full_area)))
            .map(|buffer| buffer.surface_id)
            .collect();

        let settings = self.animation;
        let windows = self
            .windows
            .values_mut()
            .filter(|w| !drawn.contains(&w.surface_id))
            .map(|w| &mut w.animation);
        let popups = self
            .popups
            .values_mut()
            .filter(|p| !drawn.contains(&p.surface_id))
            .map(|p| &mut p.animation);

        windows
            .chain(popups)
            .filter(|animation| animation.is_animating())
            .filter_map(|animation| animation.update(&settings, now))
            .collect()
    }

    fn dispatch_completion(&mut self, completion: AnimationCompleted) {
        crate::slog!(ANIMATION, "{:?} finished", completion.kind);
        match completion.action {
            Some(FinishAction::CloseWindow(window_id)) => {
                let Some(window) = self.windows.get_mut(&window_id) else {
                    return;
                };
                window.shell.inner_mut().close();
                self.flush_shell_requests(window_id);
            }
            None => {}
        }
    }
}
