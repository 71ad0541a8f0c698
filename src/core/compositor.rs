//! Compositor driver and the events it emits.
//!
//! The `Compositor` owns the single `CompositorState` and the frame
//! runtime. Platform adapters feed it input, ask it for frames, and drain
//! the outgoing events to forward them to clients. Everything runs on the
//! caller's thread.

use crate::core::errors::Result;
use crate::core::input::{InputEvent, KeyState, Keybinding, Modifiers};
use crate::core::render::{AnimationSettings, BorderStyle, Frame};
use crate::core::runtime::{FrameTimingConfig, Runtime};
use crate::core::state::CompositorState;
use crate::core::time::{Clock, MonotonicClock};
use crate::core::window::{ForeignToplevelHandle, ShellRequest};
use crate::core::{OutputId, SurfaceId, WindowId};

// ============================================================================
// Compositor Configuration
// ============================================================================

/// Settings consumed by the compositor core.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    pub border: BorderStyle,
    pub animation: AnimationSettings,
    /// Holding exactly these modifiers turns a click on a window into a
    /// move (left button) or resize (right button).
    pub interactive_modifier: Modifiers,
    pub keybindings: Vec<Keybinding>,
    /// Pointer button a tablet tool tip acts as.
    pub tablet_button: u32,
    pub frame_timing: FrameTimingConfig,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        let config = crate::config::Config::default();
        config.compositor_config().unwrap_or_else(|e| {
            tracing::warn!("Default keybindings unavailable: {}", e);
            Self {
                border: config.border.style(),
                animation: config.animation.settings(),
                interactive_modifier: Modifiers::ALT,
                keybindings: Vec::new(),
                tablet_button: config.tablet.press_action.button(),
                frame_timing: FrameTimingConfig::default(),
            }
        })
    }
}

// ============================================================================
// Compositor Events
// ============================================================================

/// Events emitted by the compositor for the protocol glue to deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorEvent {
    /// A request for the client backing a window.
    Shell {
        window_id: WindowId,
        surface_id: SurfaceId,
        request: ShellRequest,
    },
    KeyboardEnter {
        surface_id: SurfaceId,
        serial: u32,
        keys: Vec<u32>,
    },
    KeyboardLeave {
        surface_id: SurfaceId,
        serial: u32,
    },
    KeyboardKey {
        surface_id: SurfaceId,
        serial: u32,
        time_ms: u32,
        keycode: u32,
        state: KeyState,
    },
    KeyboardModifiers {
        surface_id: SurfaceId,
        serial: u32,
        depressed: u32,
        latched: u32,
        locked: u32,
        group: u32,
    },
    PointerEnter {
        surface_id: SurfaceId,
        serial: u32,
        x: f64,
        y: f64,
    },
    PointerLeave {
        surface_id: SurfaceId,
        serial: u32,
    },
    PointerMotion {
        surface_id: SurfaceId,
        time_ms: u32,
        x: f64,
        y: f64,
    },
    PointerButton {
        surface_id: SurfaceId,
        serial: u32,
        time_ms: u32,
        button: u32,
        state: KeyState,
    },
    PointerAxis {
        surface_id: SurfaceId,
        time_ms: u32,
        horizontal: f64,
        vertical: f64,
    },
    /// Raw motion for relative-pointer clients, sent even while the
    /// cursor is locked.
    PointerRelativeMotion {
        surface_id: SurfaceId,
        time_us: u64,
        dx: f64,
        dy: f64,
        dx_unaccel: f64,
        dy_unaccel: f64,
    },
    OutputEnter {
        surface_id: SurfaceId,
        output_id: OutputId,
    },
    OutputLeave {
        surface_id: SurfaceId,
        output_id: OutputId,
    },
    ForeignToplevelChanged {
        window_id: WindowId,
        handle: ForeignToplevelHandle,
    },
    ForeignToplevelClosed {
        window_id: WindowId,
    },
    /// Show a named cursor image from the theme.
    CursorImage {
        name: String,
    },
    SwitchVt(u32),
    Quit,
}

// ============================================================================
// Main Compositor
// ============================================================================

pub struct Compositor {
    state: CompositorState,
    runtime: Runtime,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self::with_clock(config, Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(config: CompositorConfig, clock: Box<dyn Clock>) -> Self {
        let runtime = Runtime::with_frame_timing(config.frame_timing.clone());
        Self {
            state: CompositorState::new(config, clock),
            runtime,
        }
    }

    pub fn state(&self) -> &CompositorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CompositorState {
        &mut self.state
    }

    pub fn start(&mut self) {
        tracing::info!("Compositor started");
        self.state.running = true;
        self.runtime.request_redraw();
    }

    pub fn stop(&mut self) {
        tracing::info!("Compositor stopped");
        self.state.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Process one input event and return everything it produced.
    pub fn dispatch(&mut self, event: InputEvent) -> Vec<CompositorEvent> {
        self.state.handle_input(event);
        self.runtime.request_redraw();
        self.take_events()
    }

    /// A redraw is pending or something animates, and the frame interval
    /// has passed.
    pub fn should_render(&self) -> bool {
        let now = self.state.now_ms();
        self.runtime.should_render(now) || (self.state.has_active_animations() && self.runtime.frame_due(now))
    }

    /// Render every output once.
    pub fn render_frame(&mut self) -> Result<Vec<Frame>> {
        let frame_number = self.runtime.begin_frame(self.state.now_ms());
        let mut frames = Vec::new();
        for output_id in self.state.outputs.ids() {
            frames.push(self.state.render_output(output_id)?);
        }
        tracing::trace!("Rendered frame {} on {} outputs", frame_number, frames.len());
        Ok(frames)
    }

    pub fn take_events(&mut self) -> Vec<CompositorEvent> {
        self.state.take_events()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::ManualClock;
    use crate::core::window::XdgToplevel;
    use crate::util::geometry::Rect;

    #[test]
    fn test_animations_keep_frames_coming() {
        let clock = ManualClock::new(0);
        let mut compositor = Compositor::with_clock(CompositorConfig::default(), Box::new(clock.clone()));
        compositor.state_mut().add_output("HEADLESS-1", Rect::new(0, 0, 1280, 720));
        compositor.start();
        assert!(compositor.should_render());
        assert_eq!(compositor.render_frame().unwrap().len(), 1);
        assert!(!compositor.should_render());

        let state = compositor.state_mut();
        let surface = state.create_surface();
        let window = state.create_window(surface, XdgToplevel::new()).unwrap();
        state.commit_surface(surface, 400, 300).unwrap();
        state.map_window(window).unwrap();

        clock.advance(5);
        assert!(!compositor.should_render());
        clock.advance(20);
        assert!(compositor.should_render());

        while compositor.state().has_active_animations() {
            compositor.render_frame().unwrap();
            clock.advance(17);
        }
        assert!(!compositor.should_render());
        assert_eq!(compositor.state().focused_window(), Some(window));
    }

    #[test]
    fn test_dispatch_returns_produced_events() {
        let mut compositor = Compositor::with_clock(CompositorConfig::default(), Box::new(ManualClock::new(0)));
        compositor.start();
        let events = compositor.dispatch(InputEvent::KeyboardKey {
            keycode: 1,
            keysyms: vec![xkbcommon::xkb::Keysym::new(xkbcommon::xkb::keysyms::KEY_Escape)],
            state: KeyState::Pressed,
            time_ms: 0,
        });
        assert!(events.is_empty());

        compositor.dispatch(InputEvent::KeyboardModifiers { depressed: Modifiers::ALT.bits(), latched: 0, locked: 0, group: 0 });
        let events = compositor.dispatch(InputEvent::KeyboardKey {
            keycode: 1,
            keysyms: vec![xkbcommon::xkb::Keysym::new(xkbcommon::xkb::keysyms::KEY_Escape)],
            state: KeyState::Pressed,
            time_ms: 1,
        });
        assert_eq!(events, vec![CompositorEvent::Quit]);
        assert!(!compositor.is_running());
    }
}
