use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::api::error::CoasterError;

/// Axis-aligned rectangle in math space. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Zone {
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.x_min && point.x <= self.x_max && point.y >= self.y_min && point.y <= self.y_max
    }

    /// Top-left corner in math space (min x, max y).
    pub fn top_left(&self) -> DVec2 {
        DVec2::new(self.x_min, self.y_max)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.x_max - self.x_min, self.y_max - self.y_min)
    }
}

/// A playable level: spawn point, zones to visit, finish zone and the
/// function the input starts with. All coordinates are math space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub spawn_x: f64,
    pub spawn_y: f64,
    #[serde(default)]
    pub visit_zones: Vec<Zone>,
    pub finish_zone: Zone,
    pub base_function: String,
}

/// Spawn point used when no level is loaded.
pub const FREE_PLAY_SPAWN: DVec2 = DVec2::new(-20.0, 20.0);

/// Function the free-play input starts with.
pub const FREE_PLAY_FUNCTION: &str = "0.02*x*x";

impl Level {
    pub fn spawn(&self) -> DVec2 {
        DVec2::new(self.spawn_x, self.spawn_y)
    }

    /// Parse a single level from JSON.
    pub fn from_json(json: &str) -> Result<Self, CoasterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a list of levels from a JSON array.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, CoasterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CoasterError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn level(
    id: u32,
    name: &str,
    spawn: (f64, f64),
    visit_zones: &[Zone],
    finish_zone: Zone,
    base_function: &str,
) -> Level {
    Level {
        id,
        name: name.to_string(),
        spawn_x: spawn.0,
        spawn_y: spawn.1,
        visit_zones: visit_zones.to_vec(),
        finish_zone,
        base_function: base_function.to_string(),
    }
}

/// The built-in campaign, authored for math bounds [-25, 25]².
pub fn builtin_levels() -> Vec<Level> {
    vec![
        level(1, "First Drop", (-20.0, 18.0),
            &[Zone::new(-10.0, -5.0, 0.0, 8.0)],
            Zone::new(15.0, 22.0, -5.0, 5.0), "0.02*x*x"),
        level(2, "Double Dip", (-22.0, 20.0),
            &[Zone::new(-15.0, -10.0, 2.0, 10.0), Zone::new(0.0, 5.0, -5.0, 5.0)],
            Zone::new(15.0, 22.0, -8.0, 2.0), "0.05*x*x"),
        level(3, "Wave", (-20.0, 5.0),
            &[Zone::new(-12.0, -8.0, 2.0, 6.0), Zone::new(8.0, 14.0, -4.0, 2.0)],
            Zone::new(18.0, 24.0, -3.0, 4.0), "5*sin(0.3*x)"),
        level(4, "Hill", (-18.0, 10.0),
            &[Zone::new(-5.0, 5.0, 8.0, 14.0)],
            Zone::new(16.0, 23.0, -8.0, 0.0), "-0.03*x*x+12"),
        level(5, "Valley", (-20.0, 12.0),
            &[Zone::new(-12.0, -6.0, -10.0, -4.0), Zone::new(6.0, 12.0, -10.0, -4.0)],
            Zone::new(17.0, 24.0, -6.0, 2.0), "0.04*x*x-8"),
        level(6, "Combo", (-22.0, 18.0),
            &[Zone::new(-14.0, -8.0, 0.0, 8.0), Zone::new(2.0, 10.0, -2.0, 6.0)],
            Zone::new(16.0, 23.0, -4.0, 4.0), "0.02*x*x+2*sin(x)"),
        level(7, "Steep", (-18.0, 22.0),
            &[Zone::new(-2.0, 6.0, -5.0, 5.0)],
            Zone::new(14.0, 22.0, -12.0, 0.0), "0.08*x*x"),
        level(8, "Gentle", (-24.0, 12.0),
            &[Zone::new(-18.0, -12.0, 2.0, 10.0), Zone::new(4.0, 12.0, 0.0, 8.0)],
            Zone::new(18.0, 24.0, -2.0, 6.0), "0.01*x*x"),
        level(9, "Final", (-20.0, 15.0),
            &[
                Zone::new(-14.0, -8.0, 0.0, 8.0),
                Zone::new(-2.0, 4.0, -2.0, 4.0),
                Zone::new(8.0, 14.0, 0.0, 8.0),
            ],
            Zone::new(18.0, 24.0, -3.0, 5.0), "0.03*x*x+sin(0.5*x)*3"),
    ]
}

/// Look up a built-in level by id.
pub fn level_by_id(id: u32) -> Result<Level, CoasterError> {
    builtin_levels()
        .into_iter()
        .find(|l| l.id == id)
        .ok_or(CoasterError::UnknownLevel(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_containment_is_inclusive() {
        let z = Zone::new(-1.0, 1.0, 0.0, 2.0);
        assert!(z.contains(DVec2::new(0.0, 1.0)));
        assert!(z.contains(DVec2::new(1.0, 2.0)));
        assert!(!z.contains(DVec2::new(1.01, 1.0)));
        assert!(!z.contains(DVec2::new(0.0, -0.01)));
        assert!(!z.contains(DVec2::new(f64::NAN, 1.0)));
    }

    #[test]
    fn builtin_levels_are_well_formed() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 9);
        for (i, l) in levels.iter().enumerate() {
            assert_eq!(l.id as usize, i + 1);
            assert!(!l.visit_zones.is_empty(), "level {} has no visit zones", l.id);
            assert!(l.finish_zone.x_min < l.finish_zone.x_max);
            assert!(!l.base_function.is_empty());
        }
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(level_by_id(3).unwrap().name, "Wave");
        assert!(matches!(level_by_id(42), Err(CoasterError::UnknownLevel(42))));
    }

    #[test]
    fn json_round_trip_and_defaults() {
        let json = r#"{
            "id": 10,
            "name": "Custom",
            "spawn_x": -5.0,
            "spawn_y": 3.0,
            "finish_zone": { "x_min": 1.0, "x_max": 2.0, "y_min": -1.0, "y_max": 1.0 },
            "base_function": "x"
        }"#;
        let parsed = Level::from_json(json).unwrap();
        assert!(parsed.visit_zones.is_empty());
        assert_eq!(parsed.spawn(), DVec2::new(-5.0, 3.0));
        let again = Level::from_json(&parsed.to_json().unwrap()).unwrap();
        assert_eq!(again, parsed);
    }

    #[test]
    fn bad_json_is_level_error() {
        assert!(matches!(Level::from_json("{ nope"), Err(CoasterError::Level(_))));
        assert!(Level::list_from_json("[]").unwrap().is_empty());
    }
}
