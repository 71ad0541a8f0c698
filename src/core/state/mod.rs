//! Global compositor state.
//!
//! This module contains the `CompositorState` struct which holds all the
//! window management state of the compositor, separate from the protocol
//! mechanics and the platform renderer.
//!
//! The state lives on the event loop thread. Every entry point leaves it
//! consistent before returning, and every object is referenced by id so a
//! destroyed object resolves to nothing.

use std::collections::HashMap;

use crate::core::compositor::{CompositorConfig, CompositorEvent};
use crate::core::errors::{CoreError, Result};
use crate::core::input::{KeyboardState, Modifiers, PointerConstraint, PointerState};
use crate::core::output::{LayerSurface, OutputLayout};
use crate::core::popup::Popup;
use crate::core::render::{AnimationSettings, BorderStyle, Scene};
use crate::core::surface::{Surface, SurfaceRole};
use crate::core::time::Clock;
use crate::core::window::{FocusManager, GestureGrab, Window, WindowTree};
use crate::core::{LayerId, NodeId, OutputId, PopupId, SurfaceId, WindowId};

// Sub-modules containing extracted CompositorState impl blocks
mod surfaces;
mod windows;
mod placement;
mod input;
mod commands;
mod outputs;
mod render;
mod requests;
mod constraints;


/// The first workspace, active at startup.
pub const DEFAULT_WORKSPACE: u32 = 1;

pub struct CompositorState {
    // Settings
    pub border: BorderStyle,
    pub animation: AnimationSettings,
    pub interactive_modifier: Modifiers,
    pub tablet_button: u32,
    clock: Box<dyn Clock>,

    // Registries
    pub surfaces: HashMap<SurfaceId, Surface>,
    pub windows: HashMap<WindowId, Window>,
    pub surface_to_window: HashMap<SurfaceId, WindowId>,
    pub popups: HashMap<PopupId, Popup>,
    pub layers: HashMap<LayerId, LayerSurface>,
    pub outputs: OutputLayout,

    // Scene and stacking
    pub scene: Scene,
    pub window_tree: WindowTree,

    // Seat
    pub focus: FocusManager,
    pub grab: GestureGrab,
    pub pointer: PointerState,
    pub keyboard: KeyboardState,
    /// At most one lock or confinement per surface.
    pub constraints: HashMap<SurfaceId, PointerConstraint>,

    pub active_workspace: u32,
    pub running: bool,

    /// Events for the protocol glue, drained with `take_events`.
    pub pending_events: Vec<CompositorEvent>,

    serial: u32,
    next_surface_id: SurfaceId,
    next_window_id: WindowId,
    next_popup_id: PopupId,
    next_layer_id: LayerId,
    next_output_id: u32,
}

impl CompositorState {
    pub fn new(config: CompositorConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            border: config.border,
            animation: config.animation,
            interactive_modifier: config.interactive_modifier,
            tablet_button: config.tablet_button,
            clock,
            surfaces: HashMap::new(),
            windows: HashMap::new(),
            surface_to_window: HashMap::new(),
            popups: HashMap::new(),
            layers: HashMap::new(),
            outputs: OutputLayout::new(),
            scene: Scene::new(),
            window_tree: WindowTree::new(),
            focus: FocusManager::new(),
            grab: GestureGrab::default(),
            pointer: PointerState::new(),
            keyboard: KeyboardState::new(config.keybindings),
            constraints: HashMap::new(),
            active_workspace: DEFAULT_WORKSPACE,
            running: true,
            pending_events: Vec::new(),
            serial: 1,
            next_surface_id: 1,
            next_window_id: 1,
            next_popup_id: 1,
            next_layer_id: 1,
            next_output_id: 1,
        }
    }

    /// Current clock time in milliseconds.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn next_serial(&mut self) -> u32 {
        self.serial = self.serial.wrapping_add(1);
        self.serial
    }

    pub fn push_event(&mut self, event: CompositorEvent) {
        self.pending_events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<CompositorEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn window(&self, window_id: WindowId) -> Option<&Window> {
        self.windows.get(&window_id)
    }

    pub fn window_mut(&mut self, window_id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&window_id)
    }

    pub(crate) fn window_or_err(&self, window_id: WindowId) -> Result<&Window> {
        self.windows.get(&window_id).ok_or(CoreError::InvalidWindowId(window_id))
    }

    pub(crate) fn window_mut_or_err(&mut self, window_id: WindowId) -> Result<&mut Window> {
        self.windows.get_mut(&window_id).ok_or(CoreError::InvalidWindowId(window_id))
    }

    pub fn surface(&self, surface_id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&surface_id)
    }

    /// Walk popup parents up to the root surface. Unknown surfaces are
    /// their own root.
    pub fn root_surface(&self, surface_id: SurfaceId) -> SurfaceId {
        let mut current = surface_id;
        // bounded in case a parent chain was corrupted into a cycle
        for _ in 0..=self.surfaces.len() {
            match self.surfaces.get(&current).and_then(|s| s.parent) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Window owning a surface, resolving popups to their root window.
    pub fn window_for_surface(&self, surface_id: SurfaceId) -> Option<WindowId> {
        let root = self.root_surface(surface_id);
        match self.surfaces.get(&root).map(|s| s.role) {
            Some(SurfaceRole::Toplevel(window_id)) if self.windows.contains_key(&window_id) => Some(window_id),
            _ => None,
        }
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focus.focused_window
    }

    pub fn has_active_animations(&self) -> bool {
        self.windows.values().any(|w| w.animation.is_animating())
            || self.popups.values().any(|p| p.animation.is_animating())
    }
}
