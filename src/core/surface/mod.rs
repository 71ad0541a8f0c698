pub mod surface;
pub mod role;

pub use surface::{Surface, SurfaceState};
pub use role::SurfaceRole;

#[cfg(test)]
pub mod tests;
