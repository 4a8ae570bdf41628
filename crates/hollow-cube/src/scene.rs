//! Device-free half of the cube frame loop.

use glam::Mat4;

use crate::transform::{TransformState, TransformStep};
use crate::uniforms::{projection_matrix, UniformSet};

/// Rotation state plus the matrices derived from it.
#[derive(Debug, Clone)]
pub struct CubeScene {
    transform: TransformState,
    step: TransformStep,
    uniforms: UniformSet,
}

impl CubeScene {
    /// The model uniform starts at identity, not at the initial rotation.
    pub fn new(initial: TransformState, step: TransformStep) -> Self {
        Self {
            transform: initial,
            step,
            uniforms: UniformSet::default(),
        }
    }

    pub fn transform(&self) -> TransformState {
        self.transform
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    /// Recomputes the projection for a `width` x `height` drawable.
    pub fn resize(&mut self, width: u32, height: u32) -> Mat4 {
        self.uniforms.projection = projection_matrix(width, height);
        self.uniforms.projection
    }

    /// Steps the angles once and returns the new model matrix.
    pub fn advance(&mut self) -> Mat4 {
        self.transform.advance(self.step);
        self.uniforms.model = self.transform.model();
        self.uniforms.model
    }
}

impl Default for CubeScene {
    fn default() -> Self {
        Self::new(TransformState::default(), TransformStep::default())
    }
}
