use crate::core::{NodeId, SurfaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Positions and groups its children.
    Tree,
    /// Draws the current buffer of a client surface.
    Buffer { surface_id: SurfaceId },
}

/// Represents a node in the scene graph.
/// Positions are relative to the parent node.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub enabled: bool,
    /// Children in z-order, last is topmost.
    pub children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            parent: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            enabled: true,
            children: Vec::new(),
        }
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        match self.kind {
            NodeKind::Buffer { surface_id } => Some(surface_id),
            NodeKind::Tree => None,
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }
}
