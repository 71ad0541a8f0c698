//! Normalized input events delivered by the platform.

pub mod keyboard;
pub mod pointer;

use xkbcommon::xkb;

pub use keyboard::{CompositorCommand, KeyAction, Keybinding, KeyboardState, Modifiers};
pub use pointer::{ConstraintKind, PointerConstraint, PointerState};

/// Linux evdev button codes.
pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;
pub const BTN_MIDDLE: u32 = 0x112;

/// Button/Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released = 0,
    Pressed = 1,
}

pub type ButtonState = KeyState;

/// Input event type for internal core usage
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Absolute cursor position in layout space.
    PointerMotion {
        x: f64,
        y: f64,
        time_ms: u32,
    },
    /// Motion delta, both after and before pointer acceleration.
    PointerMotionRelative {
        dx: f64,
        dy: f64,
        dx_unaccel: f64,
        dy_unaccel: f64,
        time_ms: u32,
    },
    PointerButton {
        button: u32,
        state: ButtonState,
        time_ms: u32,
    },
    PointerAxis {
        horizontal: f64,
        vertical: f64,
        time_ms: u32,
    },
    /// A key with the symbols the keymap produces for it.
    KeyboardKey {
        keycode: u32,
        keysyms: Vec<xkb::Keysym>,
        state: KeyState,
        time_ms: u32,
    },
    KeyboardModifiers {
        depressed: u32,
        latched: u32,
        locked: u32,
        group: u32,
    },
    /// Tablet tool position in layout space. Moves the cursor.
    TabletToolAxis {
        x: f64,
        y: f64,
        time_ms: u32,
    },
    /// The tool tip touched or left the tablet. Acts as the configured
    /// pointer button.
    TabletToolTip {
        state: KeyState,
        time_ms: u32,
    },
}
