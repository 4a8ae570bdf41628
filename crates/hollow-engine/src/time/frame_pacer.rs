use std::time::{Duration, Instant};

/// Target cadence and length of a run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramePacing {
    /// Target redraws per second. `None` redraws as fast as the loop allows.
    pub frame_rate: Option<u32>,

    /// Total frames to draw before the runtime exits. `None` runs until closed.
    pub frame_count: Option<u64>,
}

impl Default for FramePacing {
    fn default() -> Self {
        Self {
            frame_rate: Some(60),
            frame_count: None,
        }
    }
}

/// Schedules redraws at a fixed rate and counts drawn frames against a budget.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    next: Instant,
    frames: u64,
    limit: Option<u64>,
}

impl FramePacer {
    /// Creates a pacer whose first frame is due at `now`.
    pub fn new(pacing: FramePacing, now: Instant) -> Self {
        let interval = pacing
            .frame_rate
            .filter(|&rate| rate > 0)
            .map(|rate| Duration::from_secs_f64(1.0 / rate as f64));

        Self {
            interval,
            next: now,
            frames: 0,
            limit: pacing.frame_count,
        }
    }

    /// Instant at which the next redraw is due, or `None` for continuous redraw.
    pub fn deadline(&self) -> Option<Instant> {
        self.interval.map(|_| self.next)
    }

    /// Whether a redraw should be requested at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        !self.finished() && self.deadline().is_none_or(|deadline| now >= deadline)
    }

    /// Records a drawn frame and schedules the next one.
    ///
    /// A frame that lands more than one interval late re-anchors the schedule at
    /// `now` rather than letting the loop burst to catch up.
    pub fn record_frame(&mut self, now: Instant) {
        self.frames = self.frames.saturating_add(1);

        if let Some(interval) = self.interval {
            self.next += interval;
            if self.next < now {
                self.next = now + interval;
            }
        }
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// `true` once the frame budget is spent.
    pub fn finished(&self) -> bool {
        self.limit.is_some_and(|limit| self.frames >= limit)
    }
}
