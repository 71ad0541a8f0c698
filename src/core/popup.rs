use crate::core::render::Animation;
use crate::core::{NodeId, PopupId, SurfaceId};
use crate::util::geometry::Rect;

/// Transient surface (menu, tooltip) attached to a window, layer surface,
/// or another popup.
///
/// The popup's tree node lives under its parent's tree node, so it moves
/// with the parent and is hidden with it.
#[derive(Debug)]
pub struct Popup {
    pub id: PopupId,
    pub surface_id: SurfaceId,
    pub parent_surface: SurfaceId,
    /// Position and size relative to the parent surface origin.
    pub geometry: Rect,
    pub node_id: NodeId,
    pub buffer_node_id: NodeId,
    pub mapped: bool,
    pub animation: Animation,
}

impl Popup {
    pub fn new(
        id: PopupId,
        surface_id: SurfaceId,
        parent_surface: SurfaceId,
        geometry: Rect,
        node_id: NodeId,
        buffer_node_id: NodeId,
    ) -> Self {
        Self {
            id,
            surface_id,
            parent_surface,
            geometry,
            node_id,
            buffer_node_id,
            mapped: false,
            animation: Animation::new(),
        }
    }
}
