use crate::core::{LayerId, PopupId, WindowId};

/// Role assigned to a client surface. The payload links back to the object
/// that owns the role in the compositor registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    None,
    Toplevel(WindowId),
    Popup(PopupId),
    Layer(LayerId),
}

impl Default for SurfaceRole {
    fn default() -> Self {
        Self::None
    }
}

impl SurfaceRole {
    pub fn is_none(&self) -> bool {
        matches!(self, SurfaceRole::None)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SurfaceRole::None => "none",
            SurfaceRole::Toplevel(_) => "toplevel",
            SurfaceRole::Popup(_) => "popup",
            SurfaceRole::Layer(_) => "layer",
        }
    }

    /// Whether two roles are of the same kind, ignoring the owning object.
    pub fn same_kind(&self, other: &SurfaceRole) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}
