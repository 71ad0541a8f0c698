//! Platform API Trait
//!
//! A platform adapter owns the real outputs and input devices. It feeds the
//! compositor normalized input, asks it for frames, and forwards the
//! emitted events to the protocol glue.

use anyhow::{Context, Result};
use xkbcommon::xkb;

use crate::core::compositor::{Compositor, CompositorConfig, CompositorEvent};
use crate::core::input::{InputEvent, KeyState, Modifiers, BTN_LEFT};
use crate::core::time::ManualClock;
use crate::core::window::XdgToplevel;
use crate::util::geometry::Rect;
use crate::util::logging::MAIN;

/// Platform adapter interface.
///
/// ## Event Loop
/// 1. Translate native input into [`InputEvent`]s and call `Compositor::dispatch()`
/// 2. Render every output with `Compositor::render_frame()` when `should_render()`
/// 3. Deliver the drained [`CompositorEvent`]s to clients
pub trait Platform {
    /// Initialize the platform adapter.
    fn initialize(&mut self) -> Result<()>;

    /// Run the platform event loop until the compositor stops.
    fn run(&mut self) -> Result<()>;
}

/// Single virtual output driven by a scripted session and a manual clock.
///
/// Useful for exercising the core without a display server: two clients
/// map, the user Alt-drags one of them and cycles focus, then quits.
pub struct HeadlessPlatform {
    compositor: Compositor,
    clock: ManualClock,
    output: Rect,
    frame_ms: i64,
    frames: u64,
}

impl HeadlessPlatform {
    pub fn new(config: CompositorConfig) -> Self {
        let clock = ManualClock::new(0);
        let frame_ms = i64::try_from(config.frame_timing.target_interval.as_millis())
            .unwrap_or(16)
            .max(1);
        Self {
            compositor: Compositor::with_clock(config, Box::new(clock.clone())),
            clock,
            output: Rect::new(0, 0, 1920, 1080),
            frame_ms,
            frames: 0,
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    fn spawn_client(&mut self, title: &str, width: i32, height: i32) -> Result<()> {
        let state = self.compositor.state_mut();
        let surface = state.create_surface();
        let window = state.create_window(surface, XdgToplevel::new())?;
        state.set_title(window, title)?;
        state.commit_surface(surface, width, height)?;
        state.map_window(window)?;
        Ok(())
    }

    /// Render until every animation has settled. Frame pacing follows the
    /// manual clock, not wall time.
    fn settle(&mut self) -> Result<()> {
        while self.compositor.runtime().needs_redraw() || self.compositor.state().has_active_animations() {
            self.compositor.render_frame().context("rendering frame")?;
            self.frames += 1;
            self.clock.advance(self.frame_ms);
            self.deliver();
        }
        Ok(())
    }

    fn input(&mut self, event: InputEvent) {
        for event in self.compositor.dispatch(event) {
            deliver_event(&event);
        }
    }

    fn deliver(&mut self) {
        for event in self.compositor.take_events() {
            deliver_event(&event);
        }
    }

    fn key(&mut self, keycode: u32, keysym: u32) {
        for state in [KeyState::Pressed, KeyState::Released] {
            self.input(InputEvent::KeyboardKey {
                keycode,
                keysyms: vec![xkb::Keysym::new(keysym)],
                state,
                time_ms: self.clock_ms(),
            });
        }
    }

    fn modifiers(&mut self, modifiers: Modifiers) {
        self.input(InputEvent::KeyboardModifiers {
            depressed: modifiers.bits(),
            latched: 0,
            locked: 0,
            group: 0,
        });
    }

    fn clock_ms(&self) -> u32 {
        u32::try_from(self.compositor.state().now_ms()).unwrap_or(u32::MAX)
    }
}

fn deliver_event(event: &CompositorEvent) {
    tracing::trace!("-> {:?}", event);
}

impl Platform for HeadlessPlatform {
    fn initialize(&mut self) -> Result<()> {
        let output = self.output;
        self.compositor.state_mut().add_output("HEADLESS-1", output);
        self.compositor.start();
        tracing::info!("HeadlessPlatform initialized with a {}x{} output", output.width, output.height);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        self.spawn_client("terminal", 800, 600)?;
        self.spawn_client("editor", 640, 480)?;
        self.settle()?;

        // Alt-drag the focused window by its center.
        let (x, y) = (960.0, 540.0);
        self.input(InputEvent::PointerMotion { x, y, time_ms: self.clock_ms() });
        self.modifiers(Modifiers::ALT);
        self.input(InputEvent::PointerButton { button: BTN_LEFT, state: KeyState::Pressed, time_ms: self.clock_ms() });
        for step in 1..=10 {
            let offset = f64::from(step) * 20.0;
            self.input(InputEvent::PointerMotion { x: x + offset, y: y + offset / 2.0, time_ms: self.clock_ms() });
            self.settle()?;
        }
        self.input(InputEvent::PointerButton { button: BTN_LEFT, state: KeyState::Released, time_ms: self.clock_ms() });

        self.key(15, xkb::keysyms::KEY_Tab);
        self.settle()?;
        self.key(1, xkb::keysyms::KEY_Escape);
        self.modifiers(Modifiers::empty());
        self.settle()?;

        if self.compositor.is_running() {
            tracing::warn!("Quit binding did not fire, stopping");
            self.compositor.stop();
        }
        crate::slog!(MAIN, "Headless session finished after {} frames", self.frames);
        Ok(())
    }
}
