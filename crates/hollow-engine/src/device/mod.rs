//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) and the optional depth target
//! - acquiring frames and providing encoders/views for rendering

mod depth;
mod frame;
mod gpu;
mod init;
mod surface;

pub use depth::DEPTH_FORMAT;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
