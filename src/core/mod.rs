pub mod errors;
pub mod time;
pub mod state;
pub mod compositor;
pub mod runtime;
pub mod surface;
pub mod window;
pub mod popup;
pub mod output;
pub mod input;
pub mod render;

/// Registry handles. Ids are never reused, so a stale handle resolves to
/// nothing instead of to a different object.
pub type WindowId = u32;
pub type SurfaceId = u32;
pub type PopupId = u32;
pub type LayerId = u32;
pub type OutputId = u32;
pub type NodeId = u32;

// Re-export key types
pub use compositor::{Compositor, CompositorEvent};
pub use runtime::{FrameTimingConfig, Runtime};
pub use state::CompositorState;
