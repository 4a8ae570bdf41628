//! Renderer-facing handles.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into the
//! target handed to them by [`crate::core::FrameCtx::render`].

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
