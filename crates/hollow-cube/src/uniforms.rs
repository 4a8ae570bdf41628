//! Model/view/projection matrices uploaded to the vertex stage.

use glam::{Mat4, Vec3};

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 2.0;
pub const Z_FAR: f32 = 100.0;

/// Camera distance from the origin along +z (the camera looks down -z).
pub const CAMERA_DISTANCE: f32 = 5.0;

/// The three matrix uniforms, cached on the CPU.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformSet {
    /// Recomputed every frame from the transform state.
    pub model: Mat4,
    /// Set once.
    pub view: Mat4,
    /// Recomputed on every resize.
    pub projection: Mat4,
}

impl Default for UniformSet {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: view_matrix(),
            projection: Mat4::IDENTITY,
        }
    }
}

impl UniformSet {
    /// Full clip-space transform, as the vertex stage computes it.
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }
}

/// World-to-camera: the scene pushed back along -z.
pub fn view_matrix() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
}

/// Perspective projection for a drawable of `width` x `height` pixels.
///
/// Pure in the aspect ratio. Right-handed, depth mapped to wgpu's [0, 1].
/// `height` must be non-zero; the runtime never forwards zero-area sizes.
pub fn projection_matrix(width: u32, height: u32) -> Mat4 {
    debug_assert!(height > 0, "projection for zero-height drawable");
    let aspect = width as f32 / height as f32;
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
}

/// Column-major bytes of a matrix uniform.
pub fn matrix_bytes(m: &Mat4) -> &[u8] {
    bytemuck::bytes_of(m)
}
