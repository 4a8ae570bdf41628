//! Hollow engine crate.
//!
//! This crate owns the platform + GPU runtime pieces: one window, one wgpu
//! device, a paced frame loop and the init/resize/draw callback contract.

pub mod core;
pub mod device;
pub mod render;
pub mod time;
pub mod window;

pub mod logging;
pub mod paint;
