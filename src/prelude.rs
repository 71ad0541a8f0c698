//! Common imports and types used throughout Strata.

pub use std::collections::HashMap;

pub use crate::core::compositor::{Compositor, CompositorConfig, CompositorEvent};
pub use crate::core::errors::CoreError;
pub use crate::core::input::InputEvent;
pub use crate::core::state::CompositorState;
pub use crate::core::window::{Placement, ShellRequest};
pub use crate::core::{LayerId, OutputId, PopupId, SurfaceId, WindowId};
pub use crate::util::geometry::{Point, Rect, Size};

pub type Result<T> = std::result::Result<T, crate::core::errors::CoreError>;
