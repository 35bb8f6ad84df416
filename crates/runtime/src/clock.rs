use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Seconds since the session started. Never reset.
pub trait Clock {
    fn elapsed_secs(&self) -> f64;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock driven by hand. Clones share the same time, so a test can keep
/// one handle while the scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> f64 {
        self.now.get()
    }
}

/// Returns `0, step, 2 * step, ...` on successive reads.
#[derive(Debug)]
pub struct FixedStepClock {
    step: f64,
    reads: Cell<u64>,
}

impl FixedStepClock {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            reads: Cell::new(0),
        }
    }

    /// Clock stepping at `fps` frames per second.
    pub fn at_fps(fps: f64) -> Self {
        Self::new(1.0 / fps.max(f64::MIN_POSITIVE))
    }
}

impl Clock for FixedStepClock {
    fn elapsed_secs(&self) -> f64 {
        let n = self.reads.get();
        self.reads.set(n + 1);
        n as f64 * self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_handles_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.set(2.0);
        handle.advance(0.5);
        assert_eq!(clock.elapsed_secs(), 2.5);
    }

    #[test]
    fn fixed_step_advances_per_read() {
        let clock = FixedStepClock::new(0.25);
        let reads: Vec<f64> = (0..4).map(|_| clock.elapsed_secs()).collect();
        assert_eq!(reads, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.elapsed_secs();
        let b = clock.elapsed_secs();
        assert!(b >= a && a >= 0.0);
    }
}
