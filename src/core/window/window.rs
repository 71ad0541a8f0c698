use super::foreign::ForeignToplevelHandle;
use super::placement::Placement;
use super::shell::{ShellKind, ShellSurface};
use crate::core::render::Animation;
use crate::core::{NodeId, OutputId, SurfaceId, WindowId};
use crate::util::geometry::{clamp_dimension, Rect, Size};

/// A top-level client window.
///
/// `current` is where the window's surface origin sits in layout space and
/// how large its geometry is. `previous` is the restore rectangle and only
/// follows `current` while the window is stacking.
#[derive(Debug)]
pub struct Window {
    pub id: WindowId,
    pub surface_id: SurfaceId,
    pub shell: ShellSurface,
    /// Tree node in the normal scene layer holding the surface buffer.
    pub node_id: NodeId,
    /// Buffer node of the window's surface inside `node_id`.
    pub buffer_node_id: NodeId,

    pub current: Rect,
    pub previous: Rect,
    pub placement: Placement,
    pub previous_placement: Placement,

    pub minimized: bool,
    pub activated: bool,
    pub mapped: bool,
    /// Set until the first map has positioned the window.
    pub pending_map: bool,
    pub workspace: u32,

    /// Outputs the window currently intersects, in enter order.
    pub outputs: Vec<OutputId>,
    pub animation: Animation,
    pub foreign: ForeignToplevelHandle,
}

impl Window {
    pub fn new(
        id: WindowId,
        surface_id: SurfaceId,
        shell: ShellSurface,
        node_id: NodeId,
        buffer_node_id: NodeId,
        workspace: u32,
    ) -> Self {
        Self {
            id,
            surface_id,
            shell,
            node_id,
            buffer_node_id,
            current: Rect::default(),
            previous: Rect::default(),
            placement: Placement::Stacking,
            previous_placement: Placement::Stacking,
            minimized: false,
            activated: false,
            mapped: false,
            pending_map: true,
            workspace,
            outputs: Vec::new(),
            animation: Animation::new(),
            foreign: ForeignToplevelHandle::default(),
        }
    }

    pub fn kind(&self) -> ShellKind {
        self.shell.kind()
    }

    pub fn is_x11(&self) -> bool {
        self.kind() == ShellKind::Xwayland
    }

    /// Client geometry relative to the surface origin.
    pub fn geometry(&self) -> Rect {
        self.shell.inner().geometry()
    }

    pub fn min_size(&self) -> Size {
        self.shell.inner().min_size()
    }

    pub fn max_size(&self) -> Size {
        self.shell.inner().max_size()
    }

    /// Clamp a requested size into the client's constraints.
    pub fn clamp_size(&self, width: i32, height: i32) -> (i32, i32) {
        let min = self.min_size();
        let max = self.max_size();
        (
            clamp_dimension(width, min.width, max.width),
            clamp_dimension(height, min.height, max.height),
        )
    }

    /// The visible window box in layout space: the surface origin plus the
    /// client geometry offset.
    pub fn geometry_box(&self) -> Rect {
        let geo = self.geometry();
        Rect::new(
            self.current.x.saturating_add(geo.x),
            self.current.y.saturating_add(geo.y),
            self.current.width,
            self.current.height,
        )
    }

    /// Whether the window should be drawn while `workspace` is active.
    pub fn is_visible_on(&self, workspace: u32) -> bool {
        self.mapped && !self.minimized && self.workspace == workspace
    }

    pub fn is_maximized(&self) -> bool {
        self.placement == Placement::Maximized
    }

    pub fn is_fullscreen(&self) -> bool {
        self.placement == Placement::Fullscreen
    }
}
