pub mod window;
pub mod shell;
pub mod tree;
pub mod focus;
pub mod placement;
pub mod resize;
pub mod grab;
pub mod foreign;
mod tests;

pub use window::Window;
pub use shell::{
    DecorationMode, ShellInterface, ShellKind, ShellRequest, ShellSurface, SizeHints, XdgToplevel, XwaylandSurface,
};
pub use tree::WindowTree;
pub use focus::FocusManager;
pub use placement::Placement;
pub use resize::ResizeEdges;
pub use grab::{CursorMode, GestureGrab};
pub use foreign::{ForeignToplevelHandle, ForeignToplevelRequest};
