/// Fixed timestep accumulator.
/// Turns variable animation-frame deltas into a whole number of physics steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// `max_steps` caps the steps per frame so a stalled tab cannot spiral.
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Drop any partial step, e.g. when a run restarts.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 10);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 10);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_max_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 4);
        assert_eq!(ts.accumulate(1.0), 4);
    }

    #[test]
    fn ignores_bad_frame_times() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 10);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn reset_drops_partial_step() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 10);
        ts.accumulate(0.01);
        assert!(ts.alpha() > 0.0);
        ts.reset();
        assert_eq!(ts.alpha(), 0.0);
    }
}
