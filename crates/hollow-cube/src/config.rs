use hollow_engine::paint::Color;
use hollow_engine::time::FramePacing;
use hollow_engine::window::RuntimeConfig;

use crate::transform::{TransformState, TransformStep};

/// Everything the reference run can vary.
#[derive(Debug, Clone)]
pub struct CubeConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: Color,

    /// Target redraws per second.
    pub frame_rate: Option<u32>,
    /// Frames to draw before exiting. `None` runs until the window is closed.
    pub frame_count: Option<u64>,

    pub initial: TransformState,
    pub step: TransformStep,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            title: "Hollow cube".to_string(),
            width: 512,
            height: 512,
            background: Color::WHITE,
            frame_rate: Some(60),
            frame_count: Some(360),
            initial: TransformState::default(),
            step: TransformStep::default(),
        }
    }
}

impl CubeConfig {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            background: self.background,
        }
    }

    pub fn pacing(&self) -> FramePacing {
        FramePacing {
            frame_rate: self.frame_rate,
            frame_count: self.frame_count,
        }
    }
}
