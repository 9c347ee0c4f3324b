//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer for host loops
///
/// Produces the delta handed to `World::update`/`World::draw`. A fixed step can
/// be configured for deterministic runs; measured deltas are clamped so a long
/// stall does not produce one enormous step.
pub struct Timer {
    last_frame: Instant,
    fixed_delta: Option<f32>,
    max_delta: f32,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer measuring wall-clock time
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            fixed_delta: None,
            max_delta: 0.25,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Create a timer that always advances by `delta` seconds
    pub fn fixed(delta: f32) -> Self {
        Self {
            fixed_delta: Some(delta),
            ..Self::new()
        }
    }

    /// Builder pattern: Set the largest delta a measured frame may report
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Update the timer (should be called once per frame)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.delta_time = match self.fixed_delta {
            Some(delta) => delta,
            None => elapsed.as_secs_f32().min(self.max_delta),
        };
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock time since the last tick
    pub fn since_last_tick(&self) -> Duration {
        self.last_frame.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timer() {
        let mut timer = Timer::fixed(0.5);
        assert_eq!(timer.tick(), 0.5);
        assert_eq!(timer.tick(), 0.5);
        assert_eq!(timer.frame_count(), 2);
        assert!((timer.total_time() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_measured_delta_is_clamped() {
        let mut timer = Timer::new().with_max_delta(0.0);
        assert_eq!(timer.tick(), 0.0);
    }
}
