use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of recent frame times.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window: VecDeque<Duration>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(dt);
    }

    /// Mean over the window; zero before the first sample.
    pub fn average(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        self.window.iter().sum::<Duration>() / self.window.len() as u32
    }

    /// Slowest frame in the window.
    pub fn max(&self) -> Duration {
        self.window.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    /// Frames per second from the window average.
    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.max(), Duration::ZERO);
    }

    #[test]
    fn window_drops_oldest_samples() {
        let mut timer = FrameTimer::new(3);
        for ms in [100, 10, 10, 10] {
            timer.record(Duration::from_millis(ms));
        }
        assert_eq!(timer.average(), Duration::from_millis(10));
        assert_eq!(timer.max(), Duration::from_millis(10));
        assert!((timer.fps() - 100.0).abs() < 1e-6);
    }
}
