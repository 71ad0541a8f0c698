//! Outputs, their layout, and docked layer surfaces.
//!
//! An output's `usable_area` is its `full_area` minus the exclusive zones of
//! panels anchored to a single edge. Layer surfaces are positioned inside
//! the usable area, or inside the full area when they ask to ignore other
//! panels (exclusive zone -1).

use bitflags::bitflags;

use crate::core::render::SceneLayer;
use crate::core::{LayerId, NodeId, OutputId, SurfaceId};
use crate::util::geometry::{Rect, Size};

/// A physical display region in layout space.
#[derive(Debug, Clone)]
pub struct Output {
    pub id: OutputId,
    pub name: String,
    pub full_area: Rect,
    pub usable_area: Rect,
    /// Layer surfaces docked on this output, in creation order.
    pub layers: Vec<LayerId>,
}

impl Output {
    pub fn new(id: OutputId, name: impl Into<String>, full_area: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            full_area,
            usable_area: full_area,
            layers: Vec::new(),
        }
    }
}

/// Outputs in registration order.
#[derive(Debug, Default)]
pub struct OutputLayout {
    outputs: Vec<Output>,
}

impl OutputLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, output: Output) {
        self.outputs.retain(|o| o.id != output.id);
        self.outputs.push(output);
    }

    pub fn remove(&mut self, output_id: OutputId) -> Option<Output> {
        let pos = self.outputs.iter().position(|o| o.id == output_id)?;
        Some(self.outputs.remove(pos))
    }

    pub fn get(&self, output_id: OutputId) -> Option<&Output> {
        self.outputs.iter().find(|o| o.id == output_id)
    }

    pub fn get_mut(&mut self, output_id: OutputId) -> Option<&mut Output> {
        self.outputs.iter_mut().find(|o| o.id == output_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Output> {
        self.outputs.iter()
    }

    pub fn ids(&self) -> Vec<OutputId> {
        self.outputs.iter().map(|o| o.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Smallest rectangle containing every output.
    pub fn bounding_box(&self) -> Option<Rect> {
        let first = self.outputs.first()?.full_area;
        let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.right(), first.bottom());
        for output in &self.outputs[1..] {
            let area = output.full_area;
            x1 = x1.min(area.x);
            y1 = y1.min(area.y);
            x2 = x2.max(area.right());
            y2 = y2.max(area.bottom());
        }
        Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
    }

    /// Output containing a layout point.
    pub fn output_at(&self, x: i32, y: i32) -> Option<OutputId> {
        self.outputs.iter().find(|o| o.full_area.contains_point(x, y)).map(|o| o.id)
    }

    /// Output closest to the center of the layout.
    pub fn center_output(&self) -> Option<OutputId> {
        let bounds = self.bounding_box()?;
        let cx = bounds.x as f64 + bounds.width as f64 / 2.0;
        let cy = bounds.y as f64 + bounds.height as f64 / 2.0;

        let mut best: Option<(OutputId, f64)> = None;
        for output in &self.outputs {
            let distance = output.full_area.distance_squared_to(cx, cy);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((output.id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Output with the largest overlap with `rect`. Ties keep the output
    /// registered first; `None` when nothing overlaps.
    pub fn largest_overlap(&self, rect: &Rect) -> Option<OutputId> {
        let mut best: Option<(OutputId, i64)> = None;
        for output in &self.outputs {
            let area = output.full_area.intersection(rect).map_or(0, |r| r.area());
            if area > 0 && best.map_or(true, |(_, a)| area > a) {
                best = Some((output.id, area));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Outputs whose full area intersects `rect`, in registration order.
    pub fn intersecting(&self, rect: &Rect) -> Vec<OutputId> {
        self.outputs
            .iter()
            .filter(|o| o.full_area.intersects(rect))
            .map(|o| o.id)
            .collect()
    }
}

// ============================================================================
// Layer surfaces
// ============================================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Anchor: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

/// Stacking layer requested by a panel-like client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellLayer {
    Background,
    Bottom,
    Top,
    Overlay,
}

impl ShellLayer {
    pub fn scene_layer(self) -> SceneLayer {
        match self {
            ShellLayer::Background => SceneLayer::Background,
            ShellLayer::Bottom => SceneLayer::Bottom,
            ShellLayer::Top => SceneLayer::Top,
            ShellLayer::Overlay => SceneLayer::Overlay,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margin {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Layer surface state requested by the client, applied on commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerSurfaceState {
    pub anchor: Anchor,
    /// Positive values reserve space; -1 asks to ignore other panels.
    pub exclusive_zone: i32,
    pub margin: Margin,
    pub desired_size: Size,
}

/// A panel, dock, or wallpaper surface docked to one output.
#[derive(Debug, Clone)]
pub struct LayerSurface {
    pub id: LayerId,
    pub surface_id: SurfaceId,
    pub output_id: OutputId,
    pub node_id: NodeId,
    pub buffer_node_id: NodeId,
    pub layer: ShellLayer,
    pub anchor: Anchor,
    /// Positive values reserve space; -1 asks to ignore other panels.
    pub exclusive_zone: i32,
    pub margin: Margin,
    /// Requested size, 0 on an axis means stretch between anchors.
    pub desired_size: Size,
    /// Last arranged rectangle in layout space.
    pub geometry: Rect,
    pub mapped: bool,
}

impl LayerSurface {
    /// Edge whose space this surface reserves, if any.
    fn exclusive_edge(&self) -> Option<Anchor> {
        if self.exclusive_zone <= 0 {
            return None;
        }
        let a = self.anchor;
        if a.contains(Anchor::TOP) && !a.contains(Anchor::BOTTOM) {
            Some(Anchor::TOP)
        } else if a.contains(Anchor::BOTTOM) && !a.contains(Anchor::TOP) {
            Some(Anchor::BOTTOM)
        } else if a.contains(Anchor::LEFT) && !a.contains(Anchor::RIGHT) {
            Some(Anchor::LEFT)
        } else if a.contains(Anchor::RIGHT) && !a.contains(Anchor::LEFT) {
            Some(Anchor::RIGHT)
        } else {
            None
        }
    }

    /// Place the surface inside `bounds` following its anchors and margins.
    fn arrange_in(&self, bounds: Rect) -> Rect {
        let a = self.anchor;
        let m = self.margin;

        let (x, width) = if a.contains(Anchor::LEFT | Anchor::RIGHT) && self.desired_size.width == 0 {
            (bounds.x + m.left, bounds.width - m.left - m.right)
        } else {
            let width = self.desired_size.width;
            let x = if a.contains(Anchor::LEFT) && !a.contains(Anchor::RIGHT) {
                bounds.x + m.left
            } else if a.contains(Anchor::RIGHT) && !a.contains(Anchor::LEFT) {
                bounds.right() - m.right - width
            } else {
                bounds.x + (bounds.width - width) / 2
            };
            (x, width)
        };

        let (y, height) = if a.contains(Anchor::TOP | Anchor::BOTTOM) && self.desired_size.height == 0 {
            (bounds.y + m.top, bounds.height - m.top - m.bottom)
        } else {
            let height = self.desired_size.height;
            let y = if a.contains(Anchor::TOP) && !a.contains(Anchor::BOTTOM) {
                bounds.y + m.top
            } else if a.contains(Anchor::BOTTOM) && !a.contains(Anchor::TOP) {
                bounds.bottom() - m.bottom - height
            } else {
                bounds.y + (bounds.height - height) / 2
            };
            (y, height)
        };

        Rect::new(x, y, width.max(0), height.max(0))
    }
}

/// Arrange mapped layer surfaces of one output in order, shrinking the
/// usable area by each exclusive zone. Returns the new usable area; every
/// surface's `geometry` is updated in place.
pub fn arrange_layers<'a>(full_area: Rect, layers: impl IntoIterator<Item = &'a mut LayerSurface>) -> Rect {
    let mut usable = full_area;

    for layer in layers {
        if !layer.mapped {
            continue;
        }
        let bounds = if layer.exclusive_zone == -1 { full_area } else { usable };
        layer.geometry = layer.arrange_in(bounds);

        let zone = layer.exclusive_zone;
        match layer.exclusive_edge() {
            Some(Anchor::TOP) => {
                let reserved = zone + layer.margin.top;
                usable.y += reserved;
                usable.height -= reserved;
            }
            Some(Anchor::BOTTOM) => usable.height -= zone + layer.margin.bottom,
            Some(Anchor::LEFT) => {
                let reserved = zone + layer.margin.left;
                usable.x += reserved;
                usable.width -= reserved;
            }
            Some(Anchor::RIGHT) => usable.width -= zone + layer.margin.right,
            _ => {}
        }
    }

    usable.width = usable.width.max(0);
    usable.height = usable.height.max(0);
    usable
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(id: LayerId, anchor: Anchor, zone: i32, size: Size) -> LayerSurface {
        LayerSurface {
            id,
            surface_id: id,
            output_id: 1,
            node_id: 0,
            buffer_node_id: 0,
            layer: ShellLayer::Top,
            anchor,
            exclusive_zone: zone,
            margin: Margin::default(),
            desired_size: size,
            geometry: Rect::default(),
            mapped: true,
        }
    }

    #[test]
    fn bottom_panel_reserves_usable_area() {
        let full = Rect::new(0, 0, 1920, 1080);
        let mut bar = panel(1, Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT, 40, Size::new(0, 40));

        let usable = arrange_layers(full, [&mut bar]);
        assert_eq!(usable, Rect::new(0, 0, 1920, 1040));
        assert_eq!(bar.geometry, Rect::new(0, 1040, 1920, 40));
    }

    #[test]
    fn panels_stack_and_fullscreen_layers_ignore_them() {
        let full = Rect::new(100, 0, 1000, 800);
        let mut top = panel(1, Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, 30, Size::new(0, 30));
        let mut left = panel(2, Anchor::LEFT | Anchor::TOP | Anchor::BOTTOM, 50, Size::new(50, 0));
        let mut wallpaper = panel(3, Anchor::all(), -1, Size::default());
        let mut unmapped = panel(4, Anchor::RIGHT, 500, Size::new(500, 500));
        unmapped.mapped = false;

        let usable = arrange_layers(full, [&mut top, &mut left, &mut wallpaper, &mut unmapped]);
        assert_eq!(usable, Rect::new(150, 30, 950, 770));
        assert_eq!(left.geometry, Rect::new(100, 30, 50, 770));
        assert_eq!(wallpaper.geometry, full);
    }

    #[test]
    fn center_output_and_overlap() {
        let mut layout = OutputLayout::new();
        layout.add(Output::new(1, "left", Rect::new(0, 0, 1000, 1000)));
        layout.add(Output::new(2, "middle", Rect::new(1000, 0, 1000, 1000)));
        layout.add(Output::new(3, "right", Rect::new(2000, 0, 1000, 1000)));

        assert_eq!(layout.bounding_box(), Some(Rect::new(0, 0, 3000, 1000)));
        assert_eq!(layout.center_output(), Some(2));
        assert_eq!(layout.output_at(2500, 10), Some(3));
        assert_eq!(layout.largest_overlap(&Rect::new(900, 0, 300, 300)), Some(2));
        // equal overlap keeps the first registered output
        assert_eq!(layout.largest_overlap(&Rect::new(900, 0, 200, 200)), Some(1));
        assert_eq!(layout.largest_overlap(&Rect::new(-500, 0, 100, 100)), None);
        assert_eq!(layout.intersecting(&Rect::new(900, 0, 1200, 10)), vec![1, 2, 3]);
    }
}
