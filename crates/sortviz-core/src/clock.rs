use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond time source.
///
/// Every wait in the sort stepper and every budget check in the frame pump
/// reads time through this trait, so tests can drive the engine without a
/// real display loop.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`]. Not available on `wasm32-unknown-unknown`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Deterministic clock for tests.
///
/// Each read returns the current time and then advances it by `tick_ms`, so
/// a loop that polls the clock always makes progress. With `tick_ms = 0` time
/// only moves through [`advance`](Self::advance) and [`set`](Self::set).
pub struct SimulatedClock {
    now: Cell<f64>,
    tick_ms: f64,
}

impl SimulatedClock {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            tick_ms,
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Current time without triggering the auto-advance.
    pub fn peek(&self) -> f64 {
        self.now.get()
    }
}

impl Clock for SimulatedClock {
    fn now_ms(&self) -> f64 {
        let t = self.now.get();
        self.now.set(t + self.tick_ms);
        t
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}
