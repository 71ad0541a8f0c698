//! Core error types

use thiserror::Error;

/// Core compositor errors.
///
/// Policy denials (unfocused clients, size constraints, missing outputs) are
/// not errors; these only cover requests that reference unknown objects or
/// configuration that cannot be loaded.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Invalid surface ID: {0}")]
    InvalidSurfaceId(u32),

    #[error("Invalid window ID: {0}")]
    InvalidWindowId(u32),

    #[error("Invalid popup ID: {0}")]
    InvalidPopupId(u32),

    #[error("Invalid layer surface ID: {0}")]
    InvalidLayerId(u32),

    #[error("Invalid output ID: {0}")]
    InvalidOutputId(u32),

    #[error("Surface {surface_id} already has role {existing}, cannot become {requested}")]
    RoleConflict {
        surface_id: u32,
        existing: &'static str,
        requested: &'static str,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
