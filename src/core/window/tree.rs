//! Window stacking order.

use crate::core::WindowId;

/// Manages the stacking order of windows.
#[derive(Debug, Default)]
pub struct WindowTree {
    /// List of windows in stacking order (back to front).
    /// The last element is the topmost window.
    pub stacking_order: Vec<WindowId>,
}

impl WindowTree {
    pub fn new() -> Self {
        Self {
            stacking_order: Vec::new(),
        }
    }

    /// Insert a new window at the top of the stack.
    pub fn insert(&mut self, window_id: WindowId) {
        if !self.stacking_order.contains(&window_id) {
            self.stacking_order.push(window_id);
        }
    }

    /// Remove a window from the stack.
    pub fn remove(&mut self, window_id: WindowId) {
        if let Some(pos) = self.stacking_order.iter().position(|&id| id == window_id) {
            self.stacking_order.remove(pos);
        }
    }

    /// Move a window to the top (front) of the stack.
    pub fn bring_to_front(&mut self, window_id: WindowId) {
        if let Some(pos) = self.stacking_order.iter().position(|&id| id == window_id) {
            let id = self.stacking_order.remove(pos);
            self.stacking_order.push(id);
        }
    }

    /// Topmost window accepted by `filter`.
    pub fn topmost(&self, filter: impl Fn(WindowId) -> bool) -> Option<WindowId> {
        self.stacking_order.iter().rev().copied().find(|&id| filter(id))
    }

    /// Bottom-most (least recently raised) window accepted by `filter`.
    pub fn bottommost(&self, filter: impl Fn(WindowId) -> bool) -> Option<WindowId> {
        self.stacking_order.iter().copied().find(|&id| filter(id))
    }

    pub fn count(&self, filter: impl Fn(WindowId) -> bool) -> usize {
        self.stacking_order.iter().filter(|&&id| filter(id)).count()
    }
}
