use bitflags::bitflags;
use xkbcommon::xkb;

bitflags! {
    /// Real modifier mask as reported by the keymap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u32 {
        const SHIFT = 1;
        const CAPS = 2;
        const CTRL = 4;
        const ALT = 8;
        const MOD2 = 16;
        const MOD3 = 32;
        const LOGO = 64;
        const MOD5 = 128;
    }
}

impl Modifiers {
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "shift" => Some(Self::SHIFT),
            "caps" | "lock" => Some(Self::CAPS),
            "ctrl" | "control" => Some(Self::CTRL),
            "alt" | "mod1" => Some(Self::ALT),
            "mod2" => Some(Self::MOD2),
            "mod3" => Some(Self::MOD3),
            "logo" | "super" | "mod4" => Some(Self::LOGO),
            "mod5" => Some(Self::MOD5),
            _ => None,
        }
    }
}

/// Built-in compositor command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorCommand {
    Quit,
    /// Close the focused window.
    Close,
    /// Focus the least recently raised window on the active workspace.
    CycleTask,
    SwitchWorkspace(u32),
    /// Send the focused window to another workspace.
    MoveToWorkspace(u32),
    ToggleMaximize,
    ToggleFullscreen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(CompositorCommand),
    Spawn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub modifiers: Modifiers,
    pub keysym: xkb::Keysym,
    pub action: KeyAction,
}

impl Keybinding {
    pub fn new(modifiers: Modifiers, keysym: xkb::Keysym, action: KeyAction) -> Self {
        Self { modifiers, keysym, action }
    }

    pub fn matches(&self, modifiers: Modifiers, keysym: xkb::Keysym) -> bool {
        self.modifiers == modifiers && self.keysym == keysym
    }
}

/// Ctrl+Alt+XF86Switch_VT_n selects virtual terminal n.
pub fn vt_switch_target(modifiers: Modifiers, keysym: xkb::Keysym) -> Option<u32> {
    let raw = keysym.raw();
    let first = xkb::keysyms::KEY_XF86Switch_VT_1;
    let last = xkb::keysyms::KEY_XF86Switch_VT_12;
    if modifiers == (Modifiers::CTRL | Modifiers::ALT) && (first..=last).contains(&raw) {
        Some(raw - first + 1)
    } else {
        None
    }
}

/// Keyboard state for the seat: pressed keys, modifiers, and bindings.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    /// Set of currently pressed keycodes
    pub pressed_keys: Vec<u32>,
    pub mods_depressed: u32,
    pub mods_latched: u32,
    pub mods_locked: u32,
    pub mods_group: u32,
    /// Ordered binding table, every match runs.
    pub keybindings: Vec<Keybinding>,
}

impl KeyboardState {
    pub fn new(keybindings: Vec<Keybinding>) -> Self {
        Self {
            keybindings,
            ..Default::default()
        }
    }

    pub fn process_key(&mut self, keycode: u32, pressed: bool) {
        if pressed {
            if !self.pressed_keys.contains(&keycode) {
                self.pressed_keys.push(keycode);
            }
        } else {
            self.pressed_keys.retain(|&k| k != keycode);
        }
    }

    /// Store a new modifier state. Returns true if anything changed.
    pub fn update_modifiers(&mut self, depressed: u32, latched: u32, locked: u32, group: u32) -> bool {
        let changed = (self.mods_depressed, self.mods_latched, self.mods_locked, self.mods_group)
            != (depressed, latched, locked, group);
        self.mods_depressed = depressed;
        self.mods_latched = latched;
        self.mods_locked = locked;
        self.mods_group = group;
        changed
    }

    /// Effective modifiers used for binding matches.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::from_bits_truncate((self.mods_depressed | self.mods_latched | self.mods_locked) & 0xFF)
    }

    /// Actions of every binding matching `keysym` under the current modifiers.
    pub fn matching_actions(&self, keysym: xkb::Keysym) -> Vec<KeyAction> {
        let modifiers = self.modifiers();
        self.keybindings
            .iter()
            .filter(|binding| binding.matches(modifiers, keysym))
            .map(|binding| binding.action.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: u32) -> xkb::Keysym {
        xkb::Keysym::new(raw)
    }

    #[test]
    fn bindings_match_exact_modifiers() {
        let tab = key(xkb::keysyms::KEY_Tab);
        let mut keyboard = KeyboardState::new(vec![
            Keybinding::new(Modifiers::ALT, tab, KeyAction::Command(CompositorCommand::CycleTask)),
            Keybinding::new(Modifiers::ALT, tab, KeyAction::Spawn("foot".into())),
            Keybinding::new(Modifiers::ALT | Modifiers::SHIFT, tab, KeyAction::Command(CompositorCommand::Quit)),
        ]);

        assert!(keyboard.matching_actions(tab).is_empty());

        assert!(keyboard.update_modifiers(Modifiers::ALT.bits(), 0, 0, 0));
        assert!(!keyboard.update_modifiers(Modifiers::ALT.bits(), 0, 0, 0));
        assert_eq!(
            keyboard.matching_actions(tab),
            vec![
                KeyAction::Command(CompositorCommand::CycleTask),
                KeyAction::Spawn("foot".into()),
            ]
        );

        keyboard.update_modifiers(Modifiers::ALT.bits(), 0, Modifiers::CAPS.bits(), 0);
        assert!(keyboard.matching_actions(tab).is_empty());
    }

    #[test]
    fn vt_switch_needs_ctrl_alt() {
        let vt3 = key(xkb::keysyms::KEY_XF86Switch_VT_3);
        assert_eq!(vt_switch_target(Modifiers::CTRL | Modifiers::ALT, vt3), Some(3));
        assert_eq!(vt_switch_target(Modifiers::ALT, vt3), None);
        assert_eq!(vt_switch_target(Modifiers::CTRL | Modifiers::ALT, key(xkb::keysyms::KEY_a)), None);
    }

    #[test]
    fn pressed_keys_track_press_and_release() {
        let mut keyboard = KeyboardState::default();
        keyboard.process_key(30, true);
        keyboard.process_key(30, true);
        keyboard.process_key(31, true);
        keyboard.process_key(30, false);
        assert_eq!(keyboard.pressed_keys, vec![31]);
        assert_eq!(Modifiers::from_config_name("Super"), Some(Modifiers::LOGO));
        assert_eq!(Modifiers::from_config_name("hyper"), None);
    }
}
