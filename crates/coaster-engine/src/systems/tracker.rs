//! Run outcome tracking: visit zones, finish zone, playable bounds and
//! completion time, all judged from the ball's math-space position.

use glam::DVec2;

use crate::api::types::RunStatus;
use crate::assets::levels::{Level, Zone};
use crate::core::transform::TransformConfig;
use crate::systems::render::ZoneState;

/// Playable extent. The ball is out once it passes either side or drops below
/// the bottom by more than the margin. There is no ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
}

impl PlayBounds {
    /// The math bounds of `config` widened by `margin` math units.
    pub fn from_transform(config: &TransformConfig, margin: f64) -> Self {
        Self {
            x_min: config.math_x_min - margin,
            x_max: config.math_x_max + margin,
            y_min: config.math_y_min - margin,
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min
    }
}

/// Per-run progress.
#[derive(Debug, Clone)]
pub struct RunTracker {
    visit_zones: Vec<Zone>,
    visited: Vec<bool>,
    finish_zone: Option<Zone>,
    bounds: PlayBounds,
    elapsed: f64,
    outcome: Option<RunStatus>,
}

impl RunTracker {
    /// Track a run of `level`, or a free-play run (no finish) when `None`.
    pub fn new(level: Option<&Level>, bounds: PlayBounds) -> Self {
        let visit_zones = level.map(|l| l.visit_zones.clone()).unwrap_or_default();
        Self {
            visited: vec![false; visit_zones.len()],
            visit_zones,
            finish_zone: level.map(|l| l.finish_zone),
            bounds,
            elapsed: 0.0,
            outcome: None,
        }
    }

    /// Forget progress for a fresh run.
    pub fn reset(&mut self) {
        self.visited.iter_mut().for_each(|v| *v = false);
        self.elapsed = 0.0;
        self.outcome = None;
    }

    /// Advance by one simulation step of `dt` seconds with the ball at
    /// `ball_math`. Once a run ends, its outcome is returned unchanged.
    pub fn update(&mut self, ball_math: DVec2, dt: f64) -> RunStatus {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        self.elapsed += dt;

        for (zone, visited) in self.visit_zones.iter().zip(self.visited.iter_mut()) {
            if !*visited && zone.contains(ball_math) {
                *visited = true;
                log::debug!("tracker: visited zone {:?}", zone);
            }
        }

        if !ball_math.is_finite() || !self.bounds.contains(ball_math) {
            log::info!("tracker: ball out of bounds at {:?}", ball_math);
            return *self.outcome.insert(RunStatus::OutOfBounds);
        }

        if let Some(finish) = &self.finish_zone {
            if self.all_visited() && finish.contains(ball_math) {
                let time_ms = self.elapsed_ms();
                log::info!("tracker: finished in {}", format_time(time_ms));
                return *self.outcome.insert(RunStatus::Finished { time_ms });
            }
        }

        RunStatus::Running
    }

    pub fn all_visited(&self) -> bool {
        self.visited.iter().all(|v| *v)
    }

    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    /// Simulated time since the run started, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> u64 {
        (self.elapsed * 1000.0).round() as u64
    }

    /// The terminal outcome, if the run has ended.
    pub fn outcome(&self) -> Option<RunStatus> {
        self.outcome
    }

    /// Zones paired with their overlay state, finish zone last.
    pub fn zone_states(&self) -> impl Iterator<Item = (&Zone, ZoneState)> {
        self.visit_zones
            .iter()
            .zip(self.visited.iter())
            .map(|(z, v)| (z, if *v { ZoneState::Visited } else { ZoneState::Pending }))
            .chain(self.finish_zone.iter().map(|z| (z, ZoneState::Finish)))
    }
}

/// Format milliseconds as `mm:ss.mmm`.
pub fn format_time(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        Level {
            id: 1,
            name: "Test".into(),
            spawn_x: -20.0,
            spawn_y: 10.0,
            visit_zones: vec![Zone::new(-10.0, -5.0, 0.0, 8.0)],
            finish_zone: Zone::new(15.0, 22.0, -5.0, 5.0),
            base_function: "x".into(),
        }
    }

    fn bounds() -> PlayBounds {
        PlayBounds::from_transform(&TransformConfig::default(), 5.0)
    }

    #[test]
    fn finish_requires_every_visit_zone() {
        let level = level();
        let mut t = RunTracker::new(Some(&level), bounds());
        assert_eq!(t.update(DVec2::new(18.0, 0.0), 0.5), RunStatus::Running);
        assert_eq!(t.update(DVec2::new(-7.0, 4.0), 0.5), RunStatus::Running);
        assert!(t.all_visited());
        assert_eq!(
            t.update(DVec2::new(18.0, 0.0), 0.25),
            RunStatus::Finished { time_ms: 1250 }
        );
        // Sticky once finished.
        assert_eq!(t.update(DVec2::new(0.0, 0.0), 1.0), RunStatus::Finished { time_ms: 1250 });
        assert_eq!(t.elapsed_ms(), 1250);
    }

    #[test]
    fn out_of_bounds_sides_and_bottom_but_not_top() {
        let mut t = RunTracker::new(None, bounds());
        assert_eq!(t.update(DVec2::new(0.0, 100.0), 0.1), RunStatus::Running);
        assert_eq!(t.update(DVec2::new(-29.0, 0.0), 0.1), RunStatus::Running);
        assert_eq!(t.update(DVec2::new(0.0, -30.5), 0.1), RunStatus::OutOfBounds);

        let mut t = RunTracker::new(None, bounds());
        assert_eq!(t.update(DVec2::new(31.0, 0.0), 0.1), RunStatus::OutOfBounds);

        let mut t = RunTracker::new(None, bounds());
        assert_eq!(t.update(DVec2::new(f64::NAN, 0.0), 0.1), RunStatus::OutOfBounds);
    }

    #[test]
    fn free_play_never_finishes() {
        let mut t = RunTracker::new(None, bounds());
        for _ in 0..10 {
            assert_eq!(t.update(DVec2::new(18.0, 0.0), 0.1), RunStatus::Running);
        }
        assert_eq!(t.zone_states().count(), 0);
    }

    #[test]
    fn reset_clears_progress() {
        let level = level();
        let mut t = RunTracker::new(Some(&level), bounds());
        t.update(DVec2::new(-7.0, 4.0), 0.1);
        t.update(DVec2::new(0.0, -40.0), 0.1);
        assert_eq!(t.outcome(), Some(RunStatus::OutOfBounds));
        t.reset();
        assert_eq!(t.outcome(), None);
        assert_eq!(t.visited(), &[false]);
        assert_eq!(t.elapsed(), 0.0);
    }

    #[test]
    fn zone_states_follow_progress() {
        let level = level();
        let mut t = RunTracker::new(Some(&level), bounds());
        let states: Vec<_> = t.zone_states().map(|(_, s)| s).collect();
        assert_eq!(states, vec![ZoneState::Pending, ZoneState::Finish]);
        t.update(DVec2::new(-7.0, 4.0), 0.1);
        let states: Vec<_> = t.zone_states().map(|(_, s)| s).collect();
        assert_eq!(states, vec![ZoneState::Visited, ZoneState::Finish]);
    }

    #[test]
    fn formats_minutes_seconds_millis() {
        assert_eq!(format_time(0), "00:00.000");
        assert_eq!(format_time(1250), "00:01.250");
        assert_eq!(format_time(754_321), "12:34.321");
    }
}
