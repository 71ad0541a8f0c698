//! Per-output compositing pass.
//!
//! The pass turns visible scene buffers into a flat list of draw commands
//! for the platform renderer: textured quads with an alpha and solid
//! rectangles for window borders. Animated windows are shrunk or grown
//! toward their center; popups only fade.

use crate::core::window::ShellKind;
use crate::core::{OutputId, SurfaceId};
use crate::util::geometry::Rect;

/// RGBA color with normalized components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Unpack a `0xRRGGBBAA` value.
    pub fn from_rgba(packed: u32) -> Self {
        let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
        Self {
            r: channel(24),
            g: channel(16),
            b: channel(8),
            a: channel(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    pub width: i32,
    pub focused: Color,
    pub unfocused: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderElement {
    Texture {
        surface_id: SurfaceId,
        /// Destination in output-local coordinates.
        dst: Rect,
        alpha: f32,
    },
    SolidRect {
        rect: Rect,
        color: Color,
    },
}

/// Draw commands for one output refresh, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub output_id: OutputId,
    pub elements: Vec<RenderElement>,
}

impl Frame {
    pub fn textures(&self) -> impl Iterator<Item = (SurfaceId, Rect, f32)> + '_ {
        self.elements.iter().filter_map(|e| match e {
            RenderElement::Texture { surface_id, dst, alpha } => Some((*surface_id, *dst, *alpha)),
            RenderElement::SolidRect { .. } => None,
        })
    }

    pub fn solid_rects(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.elements.iter().filter_map(|e| match e {
            RenderElement::SolidRect { rect, color } => Some((*rect, *color)),
            RenderElement::Texture { .. } => None,
        })
    }
}

/// What the pass needs to know about a window buffer.
#[derive(Debug, Clone, Copy)]
pub struct WindowDecor {
    pub kind: ShellKind,
    /// Window geometry relative to the surface origin.
    pub geometry: Rect,
    pub activated: bool,
}

/// The four border quads around a box: top and bottom span the corners,
/// left and right only the box height.
pub fn border_quads(window_box: Rect, width: i32) -> [Rect; 4] {
    [
        Rect::new(window_box.x - width, window_box.y - width, window_box.width.saturating_add(width * 2), width),
        Rect::new(window_box.x - width, window_box.bottom(), window_box.width.saturating_add(width * 2), width),
        Rect::new(window_box.x - width, window_box.y, width, window_box.height),
        Rect::new(window_box.right(), window_box.y, width, window_box.height),
    ]
}

pub struct CompositingPass {
    output_area: Rect,
    border: BorderStyle,
    frame: Frame,
}

impl CompositingPass {
    pub fn new(output_id: OutputId, output_area: Rect, border: BorderStyle) -> Self {
        Self {
            output_area,
            border,
            frame: Frame {
                output_id,
                elements: Vec::new(),
            },
        }
    }

    /// Translate a layout-space buffer rectangle into output coordinates.
    pub fn to_local(&self, rect: Rect) -> Rect {
        rect.translated(-self.output_area.x, -self.output_area.y)
    }

    fn on_output(&self, local: &Rect) -> bool {
        local.intersects(&Rect::new(0, 0, self.output_area.width, self.output_area.height))
    }

    fn push_texture(&mut self, surface_id: SurfaceId, dst: Rect, alpha: f32) {
        if self.on_output(&dst) {
            self.frame.elements.push(RenderElement::Texture { surface_id, dst, alpha });
        }
    }

    /// A buffer with no animation (layer surfaces, unknown roles).
    pub fn draw_surface(&mut self, surface_id: SurfaceId, buffer: Rect) {
        let dst = self.to_local(buffer);
        self.push_texture(surface_id, dst, 1.0);
    }

    /// Popups fade but never scale.
    pub fn draw_popup(&mut self, surface_id: SurfaceId, buffer: Rect, factor: Option<f64>) {
        let dst = self.to_local(buffer);
        let alpha = factor.unwrap_or(1.0) as f32;
        self.push_texture(surface_id, dst, alpha);
    }

    /// Windows fade, scale about their center while animating, and get a
    /// border around their geometry box.
    pub fn draw_window(&mut self, surface_id: SurfaceId, buffer: Rect, decor: WindowDecor, factor: Option<f64>) {
        let unscaled = self.to_local(buffer);
        let dst = match factor {
            Some(f) => unscaled.scaled_about_center(f),
            None => unscaled,
        };
        let alpha = factor.unwrap_or(1.0) as f32;
        self.push_texture(surface_id, dst, alpha);

        let mut border_box = match decor.kind {
            ShellKind::Xwayland => unscaled,
            ShellKind::Xdg => Rect::new(
                unscaled.x + decor.geometry.x,
                unscaled.y + decor.geometry.y,
                decor.geometry.width,
                decor.geometry.height,
            ),
        };
        if let Some(f) = factor {
            border_box = border_box.scaled_about_center(f);
        }

        let color = if decor.activated { self.border.focused } else { self.border.unfocused };
        if self.border.width <= 0 {
            return;
        }
        for rect in border_quads(border_box, self.border.width) {
            if self.on_output(&rect) {
                self.frame.elements.push(RenderElement::SolidRect { rect, color });
            }
        }
    }

    pub fn finish(self) -> Frame {
        self.frame
    }
}
