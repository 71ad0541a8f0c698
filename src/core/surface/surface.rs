use super::role::SurfaceRole;
use crate::core::errors::{CoreError, Result};
use crate::core::SurfaceId;

/// Double-buffered surface state. Only the buffer size matters to the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub width: i32,
    pub height: i32,
}

/// A client surface as seen by window management.
#[derive(Debug, Clone)]
pub struct Surface {
    pub id: SurfaceId,
    pub role: SurfaceRole,
    /// Parent surface for popups. Toplevels and layer surfaces are roots.
    pub parent: Option<SurfaceId>,

    /// The state currently visible to the compositor
    pub current: SurfaceState,
    /// The state being built by client requests, to be applied on commit
    pub pending: SurfaceState,
}

impl Surface {
    pub fn new(id: SurfaceId) -> Self {
        Self {
            id,
            role: SurfaceRole::None,
            parent: None,
            current: SurfaceState::default(),
            pending: SurfaceState::default(),
        }
    }

    /// Set the surface role. A surface keeps its role kind for life; a
    /// surface whose role object was destroyed may take the same kind again.
    pub fn set_role(&mut self, role: SurfaceRole) -> Result<()> {
        if !self.role.is_none() && !self.role.same_kind(&role) {
            return Err(CoreError::RoleConflict {
                surface_id: self.id,
                existing: self.role.name(),
                requested: role.name(),
            });
        }
        self.role = role;
        Ok(())
    }

    /// Commit the pending state to current. Returns true if the size changed.
    pub fn commit(&mut self) -> bool {
        let changed = self.pending != self.current;
        self.current = self.pending;

        tracing::debug!(
            "Surface {} committed: {}x{}",
            self.id, self.current.width, self.current.height
        );

        changed
    }
}
