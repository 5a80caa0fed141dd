use std::time::Duration;

/// Fixed-timestep accumulator.
///
/// Render frames feed their wall-clock duration in; the clock answers how many
/// simulation ticks are due and how far into the next tick the frame falls.
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f64,
    accumulator: f64,
    max_steps_per_frame: u32,
}

impl FixedStep {
    pub fn new(dt: Duration) -> Self {
        assert!(!dt.is_zero());
        Self {
            dt: dt.as_secs_f64(),
            accumulator: 0.0,
            max_steps_per_frame: 8,
        }
    }

    pub fn from_hz(tick_hz: u32) -> Self {
        assert!(tick_hz > 0);
        Self::new(Duration::from_secs_f64(1.0 / tick_hz as f64))
    }

    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Adds `frame_time` seconds and returns the number of ticks to run now.
    ///
    /// When more than `max_steps_per_frame` ticks are due the surplus is
    /// dropped instead of carried into the next frame. Negative or non-finite
    /// frame times count as zero.
    pub fn advance(&mut self, frame_time: f64) -> u32 {
        if frame_time.is_finite() && frame_time > 0.0 {
            self.accumulator += frame_time;
        } else if !frame_time.is_finite() {
            tracing::debug!(frame_time, "ignoring non-finite frame time");
        }

        let mut steps = 0;
        while self.accumulator >= self.dt {
            if steps == self.max_steps_per_frame {
                tracing::debug!(
                    dropped_secs = self.accumulator,
                    "fixed step falling behind, dropping accumulated time"
                );
                self.accumulator %= self.dt;
                if !self.accumulator.is_finite() {
                    self.accumulator = 0.0;
                }
                break;
            }
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }

    /// Render ratio in `[0, 1)`: fraction of a tick left in the accumulator.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt
    }
}
