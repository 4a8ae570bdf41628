//! Time subsystem.
//!
//! Frame timing and pacing utilities, decoupled from the runtime so they can be
//! driven with synthetic timestamps in tests:
//! - `FrameClock::tick()` once per presented frame yields `FrameTime`
//! - `FramePacer` decides when the next redraw is due and when the run is over

mod frame_clock;
mod frame_pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_pacer::{FramePacer, FramePacing};
