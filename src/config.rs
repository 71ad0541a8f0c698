//! Compositor configuration file.
//!
//! Read once at startup from `config.toml` in the platform config directory
//! (`$XDG_CONFIG_HOME/strata/` on Linux). A missing file yields the defaults;
//! every section and field is optional.
//!
//! ```toml
//! [border]
//! width = 3
//! focused = 0xFFFF00FF
//! unfocused = 0xFFFFFFFF
//!
//! [animation]
//! enabled = true
//! duration_ms = 200
//! play_percentage = 0.25
//!
//! [input]
//! interactive_modifier = "alt"
//!
//! [tablet]
//! press_action = "left"
//!
//! [[keybinding]]
//! modifiers = ["alt"]
//! key = "Tab"
//! action = "cycle-task"
//!
//! [[keybinding]]
//! modifiers = ["alt"]
//! key = "3"
//! action = { switch-workspace = 3 }
//! ```

use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;
use serde::Deserialize;
use xkbcommon::xkb;

use crate::core::compositor::CompositorConfig;
use crate::core::errors::{CoreError, Result};
use crate::core::input::{CompositorCommand, KeyAction, Keybinding, Modifiers, BTN_LEFT, BTN_MIDDLE, BTN_RIGHT};
use crate::core::render::{AnimationSettings, BorderStyle, Color};
use crate::core::runtime::FrameTimingConfig;
use crate::util::logging::CONFIG;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Strata";
const APPLICATION: &str = "strata";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub border: BorderConfig,
    pub animation: AnimationConfig,
    pub input: InputConfig,
    pub tablet: TabletConfig,
    /// Replaces the default table when present.
    #[serde(rename = "keybinding")]
    pub keybindings: Vec<KeybindingConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            border: BorderConfig::default(),
            animation: AnimationConfig::default(),
            input: InputConfig::default(),
            tablet: TabletConfig::default(),
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    pub width: i32,
    /// Packed 0xRRGGBBAA.
    pub focused: u32,
    pub unfocused: u32,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            width: 3,
            focused: 0xFFFF00FF,
            unfocused: 0xFFFFFFFF,
        }
    }
}

impl BorderConfig {
    pub fn style(&self) -> BorderStyle {
        BorderStyle {
            width: self.width,
            focused: Color::from_rgba(self.focused),
            unfocused: Color::from_rgba(self.unfocused),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub duration_ms: i64,
    pub play_percentage: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let settings = AnimationSettings::default();
        Self {
            enabled: settings.enabled,
            duration_ms: settings.duration_ms,
            play_percentage: settings.play_percentage,
        }
    }
}

impl AnimationConfig {
    pub fn settings(&self) -> AnimationSettings {
        AnimationSettings {
            enabled: self.enabled,
            duration_ms: self.duration_ms.max(0),
            play_percentage: self.play_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Modifier names joined with `+`, e.g. `"alt"` or `"logo+shift"`.
    pub interactive_modifier: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            interactive_modifier: "alt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TabletConfig {
    pub press_action: PressAction,
}

/// Pointer button emulated by a tablet tool tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PressAction {
    #[default]
    Left,
    Right,
    Middle,
}

impl PressAction {
    pub fn button(self) -> u32 {
        match self {
            PressAction::Left => BTN_LEFT,
            PressAction::Right => BTN_RIGHT,
            PressAction::Middle => BTN_MIDDLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeybindingConfig {
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Keysym name as understood by xkbcommon, e.g. `"Tab"` or `"Q"`.
    pub key: String,
    pub action: ActionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionConfig {
    Quit,
    Close,
    CycleTask,
    ToggleMaximize,
    ToggleFullscreen,
    SwitchWorkspace(u32),
    MoveToWorkspace(u32),
    Spawn(String),
}

impl From<&ActionConfig> for KeyAction {
    fn from(action: &ActionConfig) -> Self {
        match action {
            ActionConfig::Quit => KeyAction::Command(CompositorCommand::Quit),
            ActionConfig::Close => KeyAction::Command(CompositorCommand::Close),
            ActionConfig::CycleTask => KeyAction::Command(CompositorCommand::CycleTask),
            ActionConfig::ToggleMaximize => KeyAction::Command(CompositorCommand::ToggleMaximize),
            ActionConfig::ToggleFullscreen => KeyAction::Command(CompositorCommand::ToggleFullscreen),
            ActionConfig::SwitchWorkspace(n) => KeyAction::Command(CompositorCommand::SwitchWorkspace(*n)),
            ActionConfig::MoveToWorkspace(n) => KeyAction::Command(CompositorCommand::MoveToWorkspace(*n)),
            ActionConfig::Spawn(command) => KeyAction::Spawn(command.clone()),
        }
    }
}

fn binding(modifiers: &[&str], key: &str, action: ActionConfig) -> KeybindingConfig {
    KeybindingConfig {
        modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
        key: key.to_string(),
        action,
    }
}

fn default_keybindings() -> Vec<KeybindingConfig> {
    vec![
        binding(&["alt"], "Tab", ActionConfig::CycleTask),
        binding(&["alt"], "Escape", ActionConfig::Quit),
        binding(&["alt", "shift"], "Q", ActionConfig::Close),
        binding(&["alt"], "1", ActionConfig::SwitchWorkspace(1)),
        binding(&["alt"], "2", ActionConfig::SwitchWorkspace(2)),
    ]
}

impl Config {
    /// Location of the user configuration file, if a home can be found.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("No config directory available, using default configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            crate::slog!(CONFIG, "No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::config_error(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)
            .map_err(|e| CoreError::config_error(format!("{}: {}", path.display(), e)))?;
        crate::slog!(CONFIG, "Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).map_err(|e| CoreError::config_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the compositor cannot use and clamp the rest.
    pub fn validate(&mut self) -> Result<()> {
        if self.border.width < 0 {
            return Err(CoreError::config_error(format!(
                "border width must not be negative, got {}",
                self.border.width
            )));
        }

        let play = self.animation.play_percentage;
        if !(0.0..=1.0).contains(&play) {
            let clamped = if play.is_nan() { 1.0 } else { play.clamp(0.0, 1.0) };
            tracing::warn!("play_percentage {} out of range, using {}", play, clamped);
            self.animation.play_percentage = clamped;
        }

        if self.interactive_modifier()?.is_empty() {
            return Err(CoreError::config_error("interactive_modifier must name at least one modifier"));
        }
        self.resolve_keybindings()?;
        Ok(())
    }

    pub fn interactive_modifier(&self) -> Result<Modifiers> {
        let names: Vec<&str> = self
            .input
            .interactive_modifier
            .split('+')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        parse_modifiers(&names)
    }

    pub fn resolve_keybindings(&self) -> Result<Vec<Keybinding>> {
        self.keybindings
            .iter()
            .map(|binding| {
                let names: Vec<&str> = binding.modifiers.iter().map(String::as_str).collect();
                let modifiers = parse_modifiers(&names)?;
                let keysym = resolve_keysym(&binding.key)?;
                Ok(Keybinding::new(modifiers, keysym, KeyAction::from(&binding.action)))
            })
            .collect()
    }

    /// Settings handed to the compositor core.
    pub fn compositor_config(&self) -> Result<CompositorConfig> {
        Ok(CompositorConfig {
            border: self.border.style(),
            animation: self.animation.settings(),
            interactive_modifier: self.interactive_modifier()?,
            keybindings: self.resolve_keybindings()?,
            tablet_button: self.tablet.press_action.button(),
            frame_timing: FrameTimingConfig::default(),
        })
    }
}

fn parse_modifiers(names: &[&str]) -> Result<Modifiers> {
    names.iter().try_fold(Modifiers::empty(), |mask, name| {
        Modifiers::from_config_name(name)
            .map(|m| mask | m)
            .ok_or_else(|| CoreError::config_error(format!("unknown modifier '{}'", name)))
    })
}

fn resolve_keysym(name: &str) -> Result<xkb::Keysym> {
    let keysym = xkb::keysym_from_name(name, xkb::KEYSYM_NO_FLAGS);
    if keysym.raw() != xkb::keysyms::KEY_NoSymbol {
        return Ok(keysym);
    }
    let keysym = xkb::keysym_from_name(name, xkb::KEYSYM_CASE_INSENSITIVE);
    if keysym.raw() != xkb::keysyms::KEY_NoSymbol {
        return Ok(keysym);
    }
    Err(CoreError::config_error(format!("unknown key '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let config = Config::default();
        let compositor = config.compositor_config().unwrap();

        assert_eq!(compositor.border.width, 3);
        assert_eq!(compositor.border.focused, Color::from_rgba(0xFFFF00FF));
        assert_eq!(compositor.animation, AnimationSettings::default());
        assert_eq!(compositor.interactive_modifier, Modifiers::ALT);
        assert_eq!(compositor.keybindings.len(), 5);

        let close = &compositor.keybindings[2];
        assert_eq!(close.modifiers, Modifiers::ALT | Modifiers::SHIFT);
        assert_eq!(close.keysym.raw(), xkb::keysyms::KEY_Q);
        assert_eq!(close.action, KeyAction::Command(CompositorCommand::Close));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [border]
            width = 5

            [animation]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.border.width, 5);
        assert_eq!(config.border.unfocused, 0xFFFFFFFF);
        assert!(!config.animation.enabled);
        assert_eq!(config.animation.duration_ms, 200);
        assert_eq!(config.keybindings, default_keybindings());
    }

    #[test]
    fn test_keybinding_table_replaces_defaults() {
        let config = Config::from_toml(
            r#"
            [input]
            interactive_modifier = "logo+shift"

            [[keybinding]]
            modifiers = ["logo"]
            key = "Return"
            action = { spawn = "foot" }

            [[keybinding]]
            modifiers = ["logo", "shift"]
            key = "3"
            action = { move-to-workspace = 3 }

            [[keybinding]]
            key = "F11"
            action = "toggle-fullscreen"
            "#,
        )
        .unwrap();

        let compositor = config.compositor_config().unwrap();
        assert_eq!(compositor.interactive_modifier, Modifiers::LOGO | Modifiers::SHIFT);

        let actions: Vec<KeyAction> = compositor.keybindings.iter().map(|b| b.action.clone()).collect();
        assert_eq!(
            actions,
            vec![
                KeyAction::Spawn("foot".to_string()),
                KeyAction::Command(CompositorCommand::MoveToWorkspace(3)),
                KeyAction::Command(CompositorCommand::ToggleFullscreen),
            ]
        );
        assert_eq!(compositor.keybindings[0].keysym.raw(), xkb::keysyms::KEY_Return);
        assert_eq!(compositor.keybindings[2].modifiers, Modifiers::empty());
    }

    #[test]
    fn test_tablet_press_action_selects_button() {
        assert_eq!(Config::default().compositor_config().unwrap().tablet_button, BTN_LEFT);

        let config = Config::from_toml("[tablet]\npress_action = \"right\"\n").unwrap();
        assert_eq!(config.tablet.press_action, PressAction::Right);
        assert_eq!(config.compositor_config().unwrap().tablet_button, BTN_RIGHT);

        assert!(Config::from_toml("[tablet]\npress_action = \"eraser\"\n").is_err());
    }

    #[test]
    fn test_default_path_is_in_config_dir() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with(CONFIG_FILE));
            assert!(path.to_string_lossy().to_lowercase().contains(APPLICATION));
        }
    }

    #[test]
    fn test_play_percentage_is_clamped() {
        let config = Config::from_toml("[animation]\nplay_percentage = 1.5\n").unwrap();
        assert_eq!(config.animation.play_percentage, 1.0);

        let config = Config::from_toml("[animation]\nplay_percentage = -0.5\n").unwrap();
        assert_eq!(config.animation.play_percentage, 0.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_toml("[border]\nwidth = -1\n").is_err());
        assert!(Config::from_toml("[input]\ninteractive_modifier = \"\"\n").is_err());
        assert!(Config::from_toml("[input]\ninteractive_modifier = \"hyper\"\n").is_err());
        assert!(Config::from_toml("[[keybinding]]\nkey = \"NotAKey\"\naction = \"quit\"\n").is_err());
        assert!(Config::from_toml("[[keybinding]]\nkey = \"a\"\naction = \"explode\"\n").is_err());
        assert!(Config::from_toml("[border]\nradius = 4\n").is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("strata-config-test-does-not-exist.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
