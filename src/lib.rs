// Strata Compositor
// Copyright (c) 2026
//
// Stacking Wayland compositor core
// Window placement, interactive gestures, focus routing and animated
// compositing live here; platform adapters own outputs and input devices

pub mod core;
pub mod platform;
pub mod config;
pub mod util;
pub mod prelude;
