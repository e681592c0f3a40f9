use crate::clock::Clock;
use crate::stepper::Resume;

/// Time-budgeted driver for the sort stepper.
///
/// Each display frame, [`pump`](Self::pump) resumes the stepper repeatedly
/// until it finishes or the frame budget is spent, then hands control back to
/// the display loop. The number of algorithm steps per frame therefore adapts
/// to the device, while the time spent per frame stays bounded.
pub struct FramePump {
    /// Wall-clock budget per frame in milliseconds (default: one 60 Hz frame).
    pub budget_ms: f64,
    /// Exponential moving average of time spent per pumped frame.
    ema_ms: f64,
    /// Exponential moving average of resumes per pumped frame.
    ema_steps: f64,
    frames: u64,
}

/// Statistics from a single [`FramePump::pump`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Number of times the stepper was resumed.
    pub steps: u32,
    /// Wall-clock time spent inside the call.
    pub elapsed_ms: f64,
    /// True once the stepper reported completion or cancellation.
    pub exhausted: bool,
    /// The terminal result when `exhausted` is set.
    pub outcome: Option<Resume>,
}

impl FramePump {
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms,
            ema_ms: 0.0,
            ema_steps: 0.0,
            frames: 0,
        }
    }

    /// Resume `step` until it stops yielding or the budget runs out.
    ///
    /// `step` is always resumed at least once, so a frame never passes without
    /// progress even when the budget is already spent by the caller.
    pub fn pump<C, F>(&mut self, clock: &C, mut step: F) -> FrameStats
    where
        C: Clock + ?Sized,
        F: FnMut() -> Resume,
    {
        let start = clock.now_ms();
        let mut stats = FrameStats::default();

        loop {
            let r = step();
            stats.steps += 1;
            if r != Resume::Yielded {
                stats.exhausted = true;
                stats.outcome = Some(r);
                break;
            }
            if clock.now_ms() - start >= self.budget_ms {
                break;
            }
        }

        stats.elapsed_ms = clock.now_ms() - start;
        self.record(&stats);
        stats
    }

    pub fn average_frame_ms(&self) -> f64 {
        self.ema_ms
    }

    pub fn average_steps(&self) -> f64 {
        self.ema_steps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn record(&mut self, stats: &FrameStats) {
        // EMA with alpha=0.3, seeded by the first frame
        if self.frames == 0 {
            self.ema_ms = stats.elapsed_ms;
            self.ema_steps = stats.steps as f64;
        } else {
            self.ema_ms = self.ema_ms * 0.7 + stats.elapsed_ms * 0.3;
            self.ema_steps = self.ema_steps * 0.7 + stats.steps as f64 * 0.3;
        }
        self.frames += 1;
    }
}
