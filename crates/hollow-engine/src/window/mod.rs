//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer and
//! dispatches the `core::App` callbacks at the configured frame rate.

mod runtime;
mod size;

pub use runtime::{Runtime, RuntimeConfig};
