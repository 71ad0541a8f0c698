//! Platform Integration Module
//!
//! Strata's core never touches a display server. Platform adapters own the
//! outputs and input devices and drive the compositor through [`Platform`].

pub mod api;

pub use api::{HeadlessPlatform, Platform};
