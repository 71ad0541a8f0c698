//! Input processing for the compositor.
//!
//! Contains all `CompositorState` methods related to keyboard and pointer
//! input: the `handle_input` dispatcher, pointer focus and hit testing,
//! interactive move/resize gestures, and keyboard focus.

use super::*;
use crate::core::input::keyboard::vt_switch_target;
use crate::core::input::pointer::{CURSOR_DEFAULT, CURSOR_MOVE};
use crate::core::input::{InputEvent, KeyState, BTN_LEFT, BTN_RIGHT};
use crate::core::window::resize::{compute_resize, nearest_edges};
use crate::core::window::{CursorMode, ResizeEdges};
use crate::util::geometry::Point;
use crate::util::logging::{GRAB, INPUT, SEAT};
use xkbcommon::xkb;

impl CompositorState {
    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Process one input event. Everything it changes is applied before
    /// this returns.
    pub fn handle_input(&mut self, event: InputEvent) {
        let result = match event {
            InputEvent::PointerMotion { x, y, time_ms } | InputEvent::TabletToolAxis { x, y, time_ms } => {
                let position = self.pointer.position();
                let delta = (x - position.x, y - position.y);
                self.process_delta(Point::new(x, y), delta, delta, time_ms)
            }
            InputEvent::PointerMotionRelative { dx, dy, dx_unaccel, dy_unaccel, time_ms } => {
                let position = self.pointer.position();
                let target = Point::new(position.x + dx, position.y + dy);
                self.process_delta(target, (dx, dy), (dx_unaccel, dy_unaccel), time_ms)
            }
            InputEvent::PointerButton { button, state, time_ms } => self.process_button(button, state, time_ms),
            InputEvent::TabletToolTip { state, time_ms } => self.process_button(self.tablet_button, state, time_ms),
            InputEvent::PointerAxis { horizontal, vertical, time_ms } => {
                if let Some(surface_id) = self.focus.pointer_focus {
                    self.push_event(CompositorEvent::PointerAxis { surface_id, time_ms, horizontal, vertical });
                }
                Ok(())
            }
            InputEvent::KeyboardKey { keycode, keysyms, state, time_ms } => {
                self.process_key(keycode, &keysyms, state, time_ms)
            }
            InputEvent::KeyboardModifiers { depressed, latched, locked, group } => {
                self.process_modifiers(depressed, latched, locked, group);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!("Input event failed: {}", e);
        }
    }

    /// Move the cursor, keeping it inside the output layout.
    fn warp_pointer(&mut self, x: f64, y: f64) {
        let (x, y) = match self.outputs.bounding_box() {
            Some(bounds) if !bounds.is_empty() => (
                x.clamp(bounds.x as f64, (bounds.right() - 1) as f64),
                y.clamp(bounds.y as f64, (bounds.bottom() - 1) as f64),
            ),
            _ => (x, y),
        };
        self.pointer.move_to(x, y);
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// Forward the raw delta to relative-pointer clients, then move the
    /// cursor toward `target` unless a lock holds it.
    fn process_delta(&mut self, target: Point, delta: (f64, f64), unaccel: (f64, f64), time_ms: u32) -> Result<()> {
        if let Some(surface_id) = self.focus.pointer_focus {
            self.push_event(CompositorEvent::PointerRelativeMotion {
                surface_id,
                time_us: u64::from(time_ms) * 1000,
                dx: delta.0,
                dy: delta.1,
                dx_unaccel: unaccel.0,
                dy_unaccel: unaccel.1,
            });
        }
        if self.is_pointer_locked() {
            return Ok(());
        }

        let target = self.constrain_motion(target);
        self.warp_pointer(target.x, target.y);
        self.process_motion(time_ms)
    }

    fn process_motion(&mut self, time_ms: u32) -> Result<()> {
        match self.grab.mode {
            CursorMode::Move => self.process_move(),
            CursorMode::Resize => self.process_resize(),
            CursorMode::Passthrough => {
                self.update_pointer_focus(Some(time_ms));
                Ok(())
            }
        }
    }

    /// Window held by the active grab. A grab whose window vanished is
    /// dropped.
    fn grabbed_window(&mut self) -> Option<WindowId> {
        match self.grab.window {
            Some(window_id) if self.windows.contains_key(&window_id) => Some(window_id),
            _ => {
                self.reset_cursor_mode();
                None
            }
        }
    }

    fn process_move(&mut self) -> Result<()> {
        let Some(window_id) = self.grabbed_window() else {
            return Ok(());
        };
        self.set_cursor_image(CURSOR_MOVE);

        let (x, y) = self.grab.move_target(self.pointer.position());
        self.set_position(window_id, x, y)?;
        self.update_outputs(window_id, false)
    }

    fn process_resize(&mut self) -> Result<()> {
        let Some(window_id) = self.grabbed_window() else {
            return Ok(());
        };

        let window = self.window_or_err(window_id)?;
        let rect = compute_resize(&self.grab, self.pointer.position(), window);
        self.set_geometry(window_id, rect.x, rect.y, rect.width, rect.height)?;
        self.update_outputs(window_id, false)
    }

    /// Hit test under the cursor and move pointer focus there. With a
    /// timestamp, the focused surface also receives a motion event.
    fn update_pointer_focus(&mut self, time_ms: Option<u32>) {
        let position = self.pointer.position();
        let Some((_, surface_id, sx, sy)) = self.scene.node_at(position.x, position.y) else {
            self.set_cursor_image(CURSOR_DEFAULT);
            self.clear_pointer_focus();
            return;
        };

        if self.focus.pointer_focus != Some(surface_id) {
            self.clear_pointer_focus();
            let serial = self.next_serial();
            self.push_event(CompositorEvent::PointerEnter { surface_id, serial, x: sx, y: sy });
            self.focus.pointer_focus = Some(surface_id);
            // the client sets its own cursor on enter
            self.pointer.forget_cursor_image();
            crate::slog!(SEAT, "Pointer entered surface {} at ({:.1}, {:.1})", surface_id, sx, sy);
        }

        self.pointer.set_focus_coords(sx, sy);
        if let Some(time_ms) = time_ms {
            self.push_event(CompositorEvent::PointerMotion { surface_id, time_ms, x: sx, y: sy });
        }
    }

    fn clear_pointer_focus(&mut self) {
        if let Some(surface_id) = self.focus.pointer_focus.take() {
            let serial = self.next_serial();
            self.push_event(CompositorEvent::PointerLeave { surface_id, serial });
        }
    }

    fn process_button(&mut self, button: u32, state: KeyState, time_ms: u32) -> Result<()> {
        let pressed = state == KeyState::Pressed;
        if pressed && !self.grab.is_active() {
            self.update_pointer_focus(None);
        }

        if let Some(surface_id) = self.focus.pointer_focus {
            let serial = self.next_serial();
            self.push_event(CompositorEvent::PointerButton { surface_id, serial, time_ms, button, state });
        }
        self.pointer.update_button(pressed);

        if !pressed {
            if self.grab.is_active() {
                self.reset_cursor_mode();
            }
            return Ok(());
        }

        let position = self.pointer.position();
        let hit = self
            .scene
            .node_at(position.x, position.y)
            .and_then(|(_, surface_id, _, _)| self.window_for_surface(surface_id));

        match hit {
            Some(window_id) if self.keyboard.modifiers() == self.interactive_modifier => {
                let geo_box = self.window_or_err(window_id)?.geometry_box();
                let edges = nearest_edges(&geo_box, position);
                match button {
                    BTN_LEFT => {
                        self.begin_interactive(window_id, CursorMode::Move, edges)?;
                    }
                    BTN_RIGHT => {
                        self.begin_interactive(window_id, CursorMode::Resize, edges)?;
                    }
                    _ => {}
                }
            }
            Some(window_id) => self.focus_view(Some(window_id)),
            None => self.focus_view(None),
        }
        Ok(())
    }

    /// Start an interactive move or resize of a window. Denied unless the
    /// window holds pointer or keyboard focus. A new gesture replaces any
    /// active one.
    pub fn begin_interactive(&mut self, window_id: WindowId, mode: CursorMode, edges: ResizeEdges) -> Result<bool> {
        let window = self.window_or_err(window_id)?;
        let (current, geo_box) = (window.current, window.geometry_box());

        if mode == CursorMode::Passthrough {
            return Ok(false);
        }
        if !self.caller_has_focus(window_id) {
            tracing::debug!("Denied {:?} request from unfocused window {}", mode, window_id);
            return Ok(false);
        }

        let cursor = self.pointer.position();
        match mode {
            CursorMode::Move => self.grab.begin_move(window_id, cursor, current),
            CursorMode::Resize => self.grab.begin_resize(window_id, cursor, geo_box, edges),
            CursorMode::Passthrough => {}
        }
        crate::slog!(GRAB, "Began {:?} of window {} (edges {:?})", mode, window_id, edges);
        Ok(true)
    }

    // =========================================================================
    // Keyboard focus
    // =========================================================================

    /// Give a window keyboard focus, raise it, and deactivate the previous
    /// one. `None` clears focus entirely.
    pub fn focus_view(&mut self, window_id: Option<WindowId>) {
        let Some(window_id) = window_id else {
            if let Some(previous) = self.focus.focused_window.take() {
                self.set_activated(previous, false);
            }
            self.set_keyboard_focus(None);
            return;
        };

        let Some(window) = self.windows.get(&window_id) else {
            return;
        };
        if !window.mapped {
            return;
        }
        let (surface_id, node_id) = (window.surface_id, window.node_id);

        if self.focus.focused_window == Some(window_id) && self.focus.has_keyboard_focus(surface_id) {
            return;
        }

        if let Some(previous) = self.focus.focused_window.filter(|&id| id != window_id) {
            self.set_activated(previous, false);
        }

        self.window_tree.bring_to_front(window_id);
        self.scene.raise_to_top(node_id);
        self.set_activated(window_id, true);
        self.focus.focused_window = Some(window_id);
        self.set_keyboard_focus(Some(surface_id));
        tracing::debug!("Focused window {}", window_id);
    }

    fn set_keyboard_focus(&mut self, target: Option<SurfaceId>) {
        if self.focus.keyboard_focus == target {
            return;
        }

        if let Some(surface_id) = self.focus.keyboard_focus.take() {
            let serial = self.next_serial();
            self.push_event(CompositorEvent::KeyboardLeave { surface_id, serial });
        }

        if let Some(surface_id) = target {
            let serial = self.next_serial();
            let keys = self.keyboard.pressed_keys.clone();
            self.push_event(CompositorEvent::KeyboardEnter { surface_id, serial, keys });
            self.push_modifiers(surface_id);
            self.focus.keyboard_focus = Some(surface_id);
        }
    }

    fn push_modifiers(&mut self, surface_id: SurfaceId) {
        let serial = self.next_serial();
        let k = &self.keyboard;
        let event = CompositorEvent::KeyboardModifiers {
            surface_id,
            serial,
            depressed: k.mods_depressed,
            latched: k.mods_latched,
            locked: k.mods_locked,
            group: k.mods_group,
        };
        self.push_event(event);
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    fn process_key(&mut self, keycode: u32, keysyms: &[xkb::Keysym], state: KeyState, time_ms: u32) -> Result<()> {
        let pressed = state == KeyState::Pressed;
        self.keyboard.process_key(keycode, pressed);

        if pressed {
            let modifiers = self.keyboard.modifiers();
            let mut handled = false;
            for &keysym in keysyms {
                if let Some(vt) = vt_switch_target(modifiers, keysym) {
                    tracing::info!("Switching to VT {}", vt);
                    self.push_event(CompositorEvent::SwitchVt(vt));
                    handled = true;
                    continue;
                }
                for action in self.keyboard.matching_actions(keysym) {
                    crate::slog!(INPUT, "Key {} triggered {:?}", keycode, action);
                    self.run_action(action)?;
                    handled = true;
                }
            }
            if handled {
                return Ok(());
            }
        }

        if let Some(surface_id) = self.focus.keyboard_focus {
            let serial = self.next_serial();
            self.push_event(CompositorEvent::KeyboardKey { surface_id, serial, time_ms, keycode, state });
        }
        Ok(())
    }

    fn process_modifiers(&mut self, depressed: u32, latched: u32, locked: u32, group: u32) {
        if !self.keyboard.update_modifiers(depressed, latched, locked, group) {
            return;
        }
        if let Some(surface_id) = self.focus.keyboard_focus {
            self.push_modifiers(surface_id);
        }
    }
}
