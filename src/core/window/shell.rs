//! Client shell backends.
//!
//! A window is backed by either a native xdg toplevel or an X11 surface
//! bridged through Xwayland. Both expose the same primitive mutators; every
//! mutator records a fire-and-forget [`ShellRequest`] that the protocol glue
//! drains and forwards to the client. Shared policy (clamping, restore
//! snapshots, focus checks) lives in the compositor state, never here.

use super::placement::Placement;
use crate::util::geometry::{Rect, Size};

/// Largest size an X11 window may take when it gives no maximum hint.
pub const X11_MAX_DIMENSION: i32 = u16::MAX as i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Xdg,
    Xwayland,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationMode {
    ClientSide,
    ServerSide,
}

/// Request to a client, produced by a shell mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellRequest {
    /// Ask the client to take a new size. Position is only carried by X11
    /// configures, already saturated to the 16-bit X coordinate space.
    Configure {
        x: Option<i32>,
        y: Option<i32>,
        width: i32,
        height: i32,
    },
    Activated(bool),
    /// X11 restack above all siblings.
    RaiseToTop,
    Maximized(bool),
    Fullscreen(bool),
    Minimized(bool),
    DecorationMode(DecorationMode),
    Close,
}

/// Capability interface shared by both shell kinds.
pub trait ShellInterface {
    fn kind(&self) -> ShellKind;

    /// Window geometry relative to the surface origin.
    fn geometry(&self) -> Rect;

    fn min_size(&self) -> Size;

    fn max_size(&self) -> Size;

    /// Placement the client asked for before its first map.
    fn initial_placement(&self) -> Option<Placement>;

    /// Record a new buffer size committed by the client.
    fn buffer_committed(&mut self, width: i32, height: i32);

    fn impl_set_position(&mut self, x: i32, y: i32, current: Rect);
    fn impl_set_size(&mut self, width: i32, height: i32, current: Rect);
    fn impl_set_geometry(&mut self, rect: Rect);
    fn impl_set_activated(&mut self, activated: bool);
    fn impl_set_maximized(&mut self, maximized: bool);
    fn impl_set_fullscreen(&mut self, fullscreen: bool);
    fn impl_set_minimized(&mut self, minimized: bool);
    fn close(&mut self);

    fn take_requests(&mut self) -> Vec<ShellRequest>;
}

// ============================================================================
// xdg-shell toplevel
// ============================================================================

/// Client-side state of an xdg toplevel.
#[derive(Debug, Clone, Default)]
pub struct XdgToplevel {
    /// Geometry set with `xdg_surface.set_window_geometry`; `None` means the
    /// whole buffer.
    pub window_geometry: Option<Rect>,
    pub buffer_size: Size,
    /// Minimum size hint, 0 means unconstrained.
    pub min_hint: Size,
    /// Maximum size hint, 0 means unconstrained.
    pub max_hint: Size,
    pub requested_maximized: bool,
    pub requested_fullscreen: bool,
    pub decoration: Option<DecorationMode>,
    requests: Vec<ShellRequest>,
}

impl XdgToplevel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size_hints(mut self, min: Size, max: Size) -> Self {
        self.min_hint = min;
        self.max_hint = max;
        self
    }

    pub fn with_window_geometry(mut self, geometry: Rect) -> Self {
        self.window_geometry = Some(geometry);
        self
    }

    /// Every decoration mode request is answered with server side borders.
    pub fn negotiate_decoration(&mut self) {
        self.decoration = Some(DecorationMode::ServerSide);
        self.requests.push(ShellRequest::DecorationMode(DecorationMode::ServerSide));
    }
}

impl ShellInterface for XdgToplevel {
    fn kind(&self) -> ShellKind {
        ShellKind::Xdg
    }

    fn geometry(&self) -> Rect {
        self.window_geometry.unwrap_or_else(|| {
            Rect::new(0, 0, self.buffer_size.width, self.buffer_size.height)
        })
    }

    fn min_size(&self) -> Size {
        Size::new(self.min_hint.width.max(0), self.min_hint.height.max(0))
    }

    fn max_size(&self) -> Size {
        let width = if self.max_hint.width > 0 { self.max_hint.width } else { i32::MAX };
        let height = if self.max_hint.height > 0 { self.max_hint.height } else { i32::MAX };
        Size::new(width, height)
    }

    fn initial_placement(&self) -> Option<Placement> {
        if self.requested_fullscreen {
            Some(Placement::Fullscreen)
        } else if self.requested_maximized {
            Some(Placement::Maximized)
        } else {
            None
        }
    }

    fn buffer_committed(&mut self, width: i32, height: i32) {
        self.buffer_size = Size::new(width, height);
    }

    fn impl_set_position(&mut self, _x: i32, _y: i32, _current: Rect) {
        // xdg clients never learn their position
    }

    fn impl_set_size(&mut self, width: i32, height: i32, _current: Rect) {
        self.requests.push(ShellRequest::Configure { x: None, y: None, width, height });
    }

    fn impl_set_geometry(&mut self, rect: Rect) {
        self.requests.push(ShellRequest::Configure {
            x: None,
            y: None,
            width: rect.width,
            height: rect.height,
        });
    }

    fn impl_set_activated(&mut self, activated: bool) {
        self.requests.push(ShellRequest::Activated(activated));
    }

    fn impl_set_maximized(&mut self, maximized: bool) {
        self.requests.push(ShellRequest::Maximized(maximized));
    }

    fn impl_set_fullscreen(&mut self, fullscreen: bool) {
        self.requests.push(ShellRequest::Fullscreen(fullscreen));
    }

    fn impl_set_minimized(&mut self, _minimized: bool) {
        // xdg-shell has no minimized state to report
    }

    fn close(&mut self) {
        self.requests.push(ShellRequest::Close);
    }

    fn take_requests(&mut self) -> Vec<ShellRequest> {
        std::mem::take(&mut self.requests)
    }
}

// ============================================================================
// Xwayland surface
// ============================================================================

/// ICCCM WM_NORMAL_HINTS subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeHints {
    pub min: Size,
    pub base: Size,
    pub max: Size,
}

/// Client-side state of an X11 window.
#[derive(Debug, Clone, Default)]
pub struct XwaylandSurface {
    /// Last configured rectangle, in layout coordinates.
    pub area: Rect,
    pub size_hints: Option<SizeHints>,
    pub requested_maximized: bool,
    pub requested_fullscreen: bool,
    requests: Vec<ShellRequest>,
}

/// Saturate a coordinate into the X11 16-bit range.
pub fn truncate_x11(value: i32) -> i32 {
    value.clamp(i16::MIN as i32, i16::MAX as i32)
}

impl XwaylandSurface {
    pub fn new(area: Rect) -> Self {
        Self { area, ..Default::default() }
    }

    pub fn with_size_hints(mut self, hints: SizeHints) -> Self {
        self.size_hints = Some(hints);
        self
    }

    fn configure(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let x = truncate_x11(x);
        let y = truncate_x11(y);
        self.area = Rect::new(x, y, width, height);
        self.requests.push(ShellRequest::Configure {
            x: Some(x),
            y: Some(y),
            width,
            height,
        });
    }
}

impl ShellInterface for XwaylandSurface {
    fn kind(&self) -> ShellKind {
        ShellKind::Xwayland
    }

    fn geometry(&self) -> Rect {
        Rect::new(0, 0, self.area.width, self.area.height)
    }

    fn min_size(&self) -> Size {
        match &self.size_hints {
            Some(hints) => Size::new(
                hints.min.width.max(hints.base.width).max(0),
                hints.min.height.max(hints.base.height).max(0),
            ),
            None => Size::default(),
        }
    }

    fn max_size(&self) -> Size {
        match &self.size_hints {
            Some(hints) => Size::new(
                if hints.max.width > 0 { hints.max.width } else { X11_MAX_DIMENSION },
                if hints.max.height > 0 { hints.max.height } else { X11_MAX_DIMENSION },
            ),
            None => Size::new(X11_MAX_DIMENSION, X11_MAX_DIMENSION),
        }
    }

    fn initial_placement(&self) -> Option<Placement> {
        if self.requested_fullscreen {
            Some(Placement::Fullscreen)
        } else if self.requested_maximized {
            Some(Placement::Maximized)
        } else {
            None
        }
    }

    fn buffer_committed(&mut self, _width: i32, _height: i32) {
        // X11 size comes from configure notifies, not buffers
    }

    fn impl_set_position(&mut self, x: i32, y: i32, current: Rect) {
        self.configure(x, y, current.width, current.height);
    }

    fn impl_set_size(&mut self, width: i32, height: i32, current: Rect) {
        self.configure(current.x, current.y, width, height);
    }

    fn impl_set_geometry(&mut self, rect: Rect) {
        self.configure(
            rect.x,
            rect.y,
            truncate_x11(rect.width),
            truncate_x11(rect.height),
        );
    }

    fn impl_set_activated(&mut self, activated: bool) {
        self.requests.push(ShellRequest::Activated(activated));
        if activated {
            self.requests.push(ShellRequest::RaiseToTop);
        }
    }

    fn impl_set_maximized(&mut self, maximized: bool) {
        self.requests.push(ShellRequest::Maximized(maximized));
    }

    fn impl_set_fullscreen(&mut self, fullscreen: bool) {
        self.requests.push(ShellRequest::Fullscreen(fullscreen));
    }

    fn impl_set_minimized(&mut self, minimized: bool) {
        self.requests.push(ShellRequest::Minimized(minimized));
    }

    fn close(&mut self) {
        self.requests.push(ShellRequest::Close);
    }

    fn take_requests(&mut self) -> Vec<ShellRequest> {
        std::mem::take(&mut self.requests)
    }
}

// ============================================================================
// Closed set of backends
// ============================================================================

#[derive(Debug, Clone)]
pub enum ShellSurface {
    Xdg(XdgToplevel),
    Xwayland(XwaylandSurface),
}

impl ShellSurface {
    pub fn inner(&self) -> &dyn ShellInterface {
        match self {
            ShellSurface::Xdg(toplevel) => toplevel,
            ShellSurface::Xwayland(surface) => surface,
        }
    }

    pub fn inner_mut(&mut self) -> &mut dyn ShellInterface {
        match self {
            ShellSurface::Xdg(toplevel) => toplevel,
            ShellSurface::Xwayland(surface) => surface,
        }
    }

    pub fn kind(&self) -> ShellKind {
        self.inner().kind()
    }
}

impl From<XdgToplevel> for ShellSurface {
    fn from(toplevel: XdgToplevel) -> Self {
        ShellSurface::Xdg(toplevel)
    }
}

impl From<XwaylandSurface> for ShellSurface {
    fn from(surface: XwaylandSurface) -> Self {
        ShellSurface::Xwayland(surface)
    }
}
