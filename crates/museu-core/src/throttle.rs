//! Frame-rate throttle for the motion integrator

/// Accumulates frame time and releases it in steps of at least `1 / rate`
/// seconds. A throttle without a rate passes every frame through.
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    interval: Option<f32>,
    accumulated: f32,
}

impl FixedStep {
    pub fn new(rate_hz: f32) -> Self {
        let interval = (rate_hz > 0.0).then(|| 1.0 / rate_hz);
        Self {
            interval,
            accumulated: 0.0,
        }
    }

    pub fn from_rate(rate_hz: Option<f32>) -> Self {
        rate_hz.map(Self::new).unwrap_or_default()
    }

    /// Feed one frame's delta; returns the delta to integrate with, if any
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        let Some(interval) = self.interval else {
            return Some(delta);
        };
        self.accumulated += delta;
        if self.accumulated < interval {
            return None;
        }
        let step = self.accumulated;
        self.accumulated = 0.0;
        Some(step)
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thirty_hz_from_sixty_fps() {
        let mut step = FixedStep::new(30.0);
        // Slightly slower than 60 fps so every second frame crosses the interval
        let frame = 0.017;

        let steps: Vec<f32> = (0..60).filter_map(|_| step.tick(frame)).collect();

        assert_eq!(steps.len(), 30);
        for delta in &steps {
            assert_relative_eq!(*delta, 0.034, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_slow_frames_pass_through() {
        let mut step = FixedStep::new(30.0);
        // A single long frame covers more than one interval
        assert_relative_eq!(step.tick(0.1).unwrap(), 0.1);
        assert_relative_eq!(step.tick(0.05).unwrap(), 0.05);
    }

    #[test]
    fn test_unthrottled_yields_every_frame() {
        let mut step = FixedStep::from_rate(None);
        for _ in 0..10 {
            assert_eq!(step.tick(0.016), Some(0.016));
        }
        assert_eq!(FixedStep::new(0.0).tick(0.5), Some(0.5));
    }

    #[test]
    fn test_reset_drops_pending_time() {
        let mut step = FixedStep::new(10.0);
        assert!(step.tick(0.09).is_none());
        step.reset();
        assert!(step.tick(0.05).is_none());
        assert!(step.tick(0.05).is_some());
    }
}
