use anyhow::Result;

use super::ctx::{FrameCtx, InitCtx};

/// Control directive returned by the draw callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// Callbacks run strictly one after another on the event-loop thread.
pub trait App {
    /// Called once after the GPU is ready and before the window becomes visible.
    ///
    /// Returning an error aborts the runtime; the window is never shown.
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()>;

    /// Called with the drawable size in physical pixels.
    ///
    /// Runs once right after `on_init` and again on every non-zero resize.
    fn on_resize(&mut self, ctx: &mut InitCtx<'_, '_>, width: u32, height: u32);

    /// Called once per redraw. `dt` is the clamped time since the previous frame, in seconds.
    ///
    /// The frame counts against the pacing budget even when
    /// [`FrameCtx::render`] has to skip presenting (lost, outdated or timed-out
    /// surface), so state advanced here moves on without a matching image.
    fn on_draw(&mut self, ctx: &mut FrameCtx<'_, '_>, dt: f32) -> AppControl;
}
