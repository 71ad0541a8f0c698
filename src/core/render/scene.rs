use std::collections::HashMap;

use crate::core::render::node::{NodeKind, SceneNode};
use crate::core::{NodeId, SurfaceId};
use crate::util::geometry::Rect;

/// Fixed stacking layers under the scene root, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneLayer {
    Background = 0,
    Bottom = 1,
    Normal = 2,
    Top = 3,
    Overlay = 4,
    Lock = 5,
}

impl SceneLayer {
    pub const ALL: [SceneLayer; 6] = [
        SceneLayer::Background,
        SceneLayer::Bottom,
        SceneLayer::Normal,
        SceneLayer::Top,
        SceneLayer::Overlay,
        SceneLayer::Lock,
    ];
}

/// A visible buffer in global coordinates, produced by [`Scene::flatten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenedBuffer {
    pub node_id: NodeId,
    pub surface_id: SurfaceId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FlattenedBuffer {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Manages the scene graph.
#[derive(Debug)]
pub struct Scene {
    pub nodes: HashMap<NodeId, SceneNode>,
    pub root_id: NodeId,
    layers: [NodeId; 6],
    next_node_id: NodeId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: HashMap::new(),
            root_id: 1,
            layers: [0; 6],
            next_node_id: 1,
        };
        let root_id = scene.allocate(NodeKind::Tree);
        scene.root_id = root_id;
        for layer in SceneLayer::ALL {
            scene.layers[layer as usize] = scene.create_tree(root_id);
        }
        scene
    }

    fn allocate(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.nodes.insert(id, SceneNode::new(id, kind));
        id
    }

    fn attach(&mut self, parent_id: NodeId, child_id: NodeId) {
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            if !parent.children.contains(&child_id) {
                parent.children.push(child_id);
            }
        } else {
            tracing::warn!("Scene node {} attached to missing parent {}", child_id, parent_id);
            return;
        }
        if let Some(child) = self.nodes.get_mut(&child_id) {
            child.parent = Some(parent_id);
        }
    }

    fn detach(&mut self, node_id: NodeId) {
        let parent = self.nodes.get(&node_id).and_then(|n| n.parent);
        if let Some(parent_id) = parent {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|&id| id != node_id);
            }
        }
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.parent = None;
        }
    }

    /// Tree node of a fixed layer.
    pub fn layer(&self, layer: SceneLayer) -> NodeId {
        self.layers[layer as usize]
    }

    pub fn node(&self, node_id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&node_id)
    }

    pub fn create_tree(&mut self, parent_id: NodeId) -> NodeId {
        let id = self.allocate(NodeKind::Tree);
        self.attach(parent_id, id);
        id
    }

    pub fn create_buffer(&mut self, parent_id: NodeId, surface_id: SurfaceId, width: i32, height: i32) -> NodeId {
        let id = self.allocate(NodeKind::Buffer { surface_id });
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_size(width, height);
        }
        self.attach(parent_id, id);
        id
    }

    pub fn set_position(&mut self, node_id: NodeId, x: i32, y: i32) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.set_position(x, y);
        }
    }

    pub fn set_buffer_size(&mut self, node_id: NodeId, width: i32, height: i32) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.set_size(width, height);
        }
    }

    pub fn set_enabled(&mut self, node_id: NodeId, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.enabled = enabled;
        }
    }

    /// Move a node under a new parent, on top of its new siblings. Refuses to
    /// create cycles.
    pub fn reparent(&mut self, node_id: NodeId, new_parent: NodeId) -> bool {
        if !self.nodes.contains_key(&node_id) || !self.nodes.contains_key(&new_parent) {
            return false;
        }
        let mut cursor = Some(new_parent);
        while let Some(id) = cursor {
            if id == node_id {
                return false;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.parent);
        }
        self.detach(node_id);
        self.attach(new_parent, node_id);
        true
    }

    /// Move a node above all of its siblings.
    pub fn raise_to_top(&mut self, node_id: NodeId) {
        let parent = self.nodes.get(&node_id).and_then(|n| n.parent);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            if let Some(pos) = parent.children.iter().position(|&id| id == node_id) {
                let id = parent.children.remove(pos);
                parent.children.push(id);
            }
        }
    }

    /// Destroy a node and its whole subtree.
    pub fn destroy(&mut self, node_id: NodeId) {
        if node_id == self.root_id || self.layers.contains(&node_id) {
            return;
        }
        self.detach(node_id);
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children);
            }
        }
    }

    /// Absolute position of a node in layout coordinates.
    pub fn coords(&self, node_id: NodeId) -> Option<(i32, i32)> {
        let mut node = self.nodes.get(&node_id)?;
        let (mut x, mut y) = (node.x, node.y);
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(&p)) {
            x += parent.x;
            y += parent.y;
            node = parent;
        }
        Some((x, y))
    }

    /// Whether the node and all of its ancestors are enabled.
    pub fn is_visible(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(id) = cursor {
            match self.nodes.get(&id) {
                Some(node) if node.enabled => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Flattens the scene graph into a back-to-front list of visible buffers.
    pub fn flatten(&self) -> Vec<FlattenedBuffer> {
        let mut result = Vec::new();
        self.flatten_recursive(self.root_id, 0, 0, &mut result);
        result
    }

    fn flatten_recursive(&self, node_id: NodeId, abs_x: i32, abs_y: i32, result: &mut Vec<FlattenedBuffer>) {
        if let Some(node) = self.nodes.get(&node_id) {
            if !node.enabled {
                return;
            }

            let current_abs_x = abs_x + node.x;
            let current_abs_y = abs_y + node.y;

            if let Some(surface_id) = node.surface_id() {
                result.push(FlattenedBuffer {
                    node_id,
                    surface_id,
                    x: current_abs_x,
                    y: current_abs_y,
                    width: node.width,
                    height: node.height,
                });
            }

            // Recurse into children (z-order is determined by child index)
            for &child_id in &node.children {
                self.flatten_recursive(child_id, current_abs_x, current_abs_y, result);
            }
        }
    }

    /// Topmost visible buffer under a layout point, with surface-local
    /// coordinates.
    pub fn node_at(&self, x: f64, y: f64) -> Option<(NodeId, SurfaceId, f64, f64)> {
        self.flatten()
            .into_iter()
            .rev()
            .find(|buffer| {
                let bx = buffer.x as f64;
                let by = buffer.y as f64;
                x >= bx && x < bx + buffer.width as f64 && y >= by && y < by + buffer.height as f64
            })
            .map(|buffer| (buffer.node_id, buffer.surface_id, x - buffer.x as f64, y - buffer.y as f64))
    }

    /// Dump the scene graph to a string for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_recursive(self.root_id, 0, &mut out);
        out
    }

    fn dump_recursive(&self, node_id: NodeId, depth: usize, out: &mut String) {
        if let Some(node) = self.nodes.get(&node_id) {
            let indent = "  ".repeat(depth);
            out.push_str(&format!(
                "{}Node {}: pos=({},{}) size={}x{} enabled={} surface={:?}\n",
                indent, node.id, node.x, node.y, node.width, node.height, node.enabled, node.surface_id()
            ));

            for &child_id in &node.children {
                self.dump_recursive(child_id, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(scene: &mut Scene, surface_id: SurfaceId, x: i32, y: i32) -> (NodeId, NodeId) {
        let tree = scene.create_tree(scene.layer(SceneLayer::Normal));
        let buffer = scene.create_buffer(tree, surface_id, 100, 100);
        scene.set_position(tree, x, y);
        (tree, buffer)
    }

    #[test]
    fn flatten_orders_layers_and_children() {
        let mut scene = Scene::new();
        let (_, _) = window(&mut scene, 10, 0, 0);
        let (_, _) = window(&mut scene, 11, 50, 50);
        let panel = scene.create_buffer(scene.layer(SceneLayer::Top), 12, 100, 20);
        scene.set_position(panel, 0, 0);

        let order: Vec<SurfaceId> = scene.flatten().iter().map(|b| b.surface_id).collect();
        assert_eq!(order, vec![10, 11, 12]);
    }

    #[test]
    fn hit_test_respects_raise_and_enable() {
        let mut scene = Scene::new();
        let (a, _) = window(&mut scene, 1, 0, 0);
        let (b, _) = window(&mut scene, 2, 50, 50);

        assert_eq!(scene.node_at(60.0, 60.0).map(|h| h.1), Some(2));
        scene.raise_to_top(a);
        assert_eq!(scene.node_at(60.0, 60.0).map(|h| h.1), Some(1));

        scene.set_enabled(a, false);
        let (_, surface, sx, sy) = scene.node_at(60.0, 60.0).expect("hit");
        assert_eq!(surface, 2);
        assert_eq!((sx, sy), (10.0, 10.0));
        assert!(!scene.is_visible(a));
        assert!(scene.is_visible(b));
        assert_eq!(scene.node_at(500.0, 500.0), None);
    }

    #[test]
    fn child_coordinates_are_relative() {
        let mut scene = Scene::new();
        let (tree, _) = window(&mut scene, 1, 100, 200);
        let popup = scene.create_tree(tree);
        scene.set_position(popup, 10, 20);
        let popup_buffer = scene.create_buffer(popup, 2, 30, 30);

        assert_eq!(scene.coords(popup_buffer), Some((110, 220)));
        assert!(!scene.reparent(tree, popup));

        scene.destroy(tree);
        assert!(scene.node(popup_buffer).is_none());
        assert!(scene.flatten().is_empty());
        assert!(scene.dump().contains("Node"));
    }
}
