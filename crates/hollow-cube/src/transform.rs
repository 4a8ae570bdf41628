//! Rotation state of the cube.

use glam::Mat4;

/// Two rotation angles in degrees.
///
/// Angles accumulate without normalization; trigonometric periodicity does the
/// wrapping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformState {
    /// Rotation about the Z axis.
    pub theta: f32,
    /// Rotation about the Y axis.
    pub phi: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            theta: 30.0,
            phi: 40.0,
        }
    }
}

/// Per-draw angle increments in degrees.
///
/// Applied once per draw callback, independent of elapsed time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformStep {
    pub theta: f32,
    pub phi: f32,
}

impl Default for TransformStep {
    fn default() -> Self {
        Self {
            theta: 1.0,
            phi: -1.0,
        }
    }
}

impl TransformState {
    pub fn advance(&mut self, step: TransformStep) {
        self.theta += step.theta;
        self.phi += step.phi;
    }

    /// Model matrix: identity rotated by `theta` about Z, then by `phi` about Y.
    ///
    /// Column-vector convention, so the Z rotation sits on the right and reaches
    /// the vertex first.
    pub fn model(&self) -> Mat4 {
        rotation_zy(self.theta, self.phi)
    }
}

/// `R_y(phi) * R_z(theta)`, angles in degrees.
pub fn rotation_zy(theta: f32, phi: f32) -> Mat4 {
    Mat4::from_rotation_y(phi.to_radians()) * Mat4::from_rotation_z(theta.to_radians())
}
