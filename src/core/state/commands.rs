//! Keybinding actions and workspaces.

use super::*;
use crate::core::input::{CompositorCommand, KeyAction};

impl CompositorState {
    pub fn run_action(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::Command(command) => self.run_command(command),
            KeyAction::Spawn(command) => {
                tracing::warn!("Spawning is not supported, ignoring '{}'", command);
                Ok(())
            }
        }
    }

    pub fn run_command(&mut self, command: CompositorCommand) -> Result<()> {
        tracing::debug!("Running {:?}", command);
        match command {
            CompositorCommand::Quit => {
                tracing::info!("Quit requested");
                self.running = false;
                self.push_event(CompositorEvent::Quit);
            }
            CompositorCommand::Close => {
                if let Some(window_id) = self.focus.focused_window {
                    self.close_window(window_id)?;
                }
            }
            CompositorCommand::CycleTask => self.cycle_task(),
            CompositorCommand::SwitchWorkspace(workspace) => self.switch_workspace(workspace),
            CompositorCommand::MoveToWorkspace(workspace) => {
                if let Some(window_id) = self.focus.focused_window {
                    self.move_to_workspace(window_id, workspace)?;
                }
            }
            CompositorCommand::ToggleMaximize => {
                if let Some(window_id) = self.focus.focused_window {
                    self.toggle_maximize(window_id)?;
                }
            }
            CompositorCommand::ToggleFullscreen => {
                if let Some(window_id) = self.focus.focused_window {
                    self.toggle_fullscreen(window_id)?;
                }
            }
        }
        Ok(())
    }

    /// Focus the least recently raised visible window on the active
    /// workspace. Needs at least two candidates.
    pub fn cycle_task(&mut self) {
        let workspace = self.active_workspace;
        let visible = |id: WindowId| self.windows.get(&id).is_some_and(|w| w.is_visible_on(workspace));

        if self.window_tree.count(visible) < 2 {
            return;
        }
        if let Some(window_id) = self.window_tree.bottommost(visible) {
            self.focus_view(Some(window_id));
        }
    }

    /// Show only the windows of `workspace` and focus its topmost window.
    pub fn switch_workspace(&mut self, workspace: u32) {
        if workspace == self.active_workspace {
            return;
        }
        tracing::info!("Switching to workspace {}", workspace);
        self.active_workspace = workspace;

        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for window_id in ids {
            self.update_visibility(window_id);
        }

        let target = self
            .window_tree
            .topmost(|id| self.windows.get(&id).is_some_and(|w| w.is_visible_on(workspace)));
        self.focus_view(target);
    }

    /// Send a window to another workspace. A window leaving the active
    /// workspace loses focus.
    pub fn move_to_workspace(&mut self, window_id: WindowId, workspace: u32) -> Result<()> {
        let window = self.window_mut_or_err(window_id)?;
        if window.workspace == workspace {
            return Ok(());
        }
        window.workspace = workspace;
        tracing::info!("Moved window {} to workspace {}", window_id, workspace);

        self.update_visibility(window_id);
        if workspace != self.active_workspace && self.focus.is_focused(window_id) {
            let active = self.active_workspace;
            let next = self.window_tree.topmost(|id| {
                id != window_id && self.windows.get(&id).is_some_and(|w| w.is_visible_on(active))
            });
            self.focus_view(next);
        }
        Ok(())
    }
}
