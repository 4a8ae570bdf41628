//! CPU mirror of the fragment stage in `shaders/cube.frag.wgsl`.
//!
//! The GPU decides per pixel; this module makes the same decision from an
//! interpolated object-space position so the banding can be tested without a
//! device. The thresholds here and in the shader must stay equal.

use glam::Vec3;

/// Band thresholds on the pairwise minimum of absolute coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeBands {
    /// Below this on all three pairs: hollow.
    pub b1: f32,
    /// Below this on all three pairs: black frame.
    pub b2: f32,
    /// Above this on any pair: black accent.
    pub b3: f32,
}

impl Default for EdgeBands {
    fn default() -> Self {
        Self {
            b1: 0.70,
            b2: 0.75,
            b3: 0.95,
        }
    }
}

/// Outcome of the per-fragment classification, in precedence order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FragmentClass {
    /// Discarded; nothing is written.
    Hollow,
    /// Solid black frame around the hole.
    Frame,
    /// Solid black near the cube's edges and corners.
    Accent,
    /// Interpolated vertex color.
    Fill,
}

pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// `(min(|x|,|y|), min(|x|,|z|), min(|y|,|z|))`.
pub fn pair_minimums(position: Vec3) -> (f32, f32, f32) {
    let p = position.abs();
    (p.x.min(p.y), p.x.min(p.z), p.y.min(p.z))
}

impl EdgeBands {
    /// Classifies a fragment at object-space `position`.
    ///
    /// The bands overlap in coordinate space, so the checks run in a fixed
    /// order: hollow, then frame, then accent, then fill.
    pub fn classify(&self, position: Vec3) -> FragmentClass {
        let (xy, xz, yz) = pair_minimums(position);

        if xy < self.b1 && xz < self.b1 && yz < self.b1 {
            FragmentClass::Hollow
        } else if xy < self.b2 && xz < self.b2 && yz < self.b2 {
            FragmentClass::Frame
        } else if xy > self.b3 || xz > self.b3 || yz > self.b3 {
            FragmentClass::Accent
        } else {
            FragmentClass::Fill
        }
    }

    /// Output color for a fragment, or `None` when it is discarded.
    pub fn shade(&self, position: Vec3, color: [f32; 4]) -> Option<[f32; 4]> {
        match self.classify(position) {
            FragmentClass::Hollow => None,
            FragmentClass::Frame | FragmentClass::Accent => Some(BLACK),
            FragmentClass::Fill => Some(color),
        }
    }
}
