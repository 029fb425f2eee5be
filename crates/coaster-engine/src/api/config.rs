use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::transform::TransformConfig;
use crate::systems::ball::BallConfig;
use crate::systems::rail::{RailConfig, RailMaterial};

/// Everything a session is built from. Hosts can supply it as JSON; missing
/// fields take the defaults documented on each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Canvas size and math bounds (default 1200×750 px over [-25, 25]²).
    pub transform: TransformConfig,
    /// Rail sampling (default: the whole math x range at step 0.2).
    pub rail: RailConfig,
    pub rail_material: RailMaterial,
    pub ball: BallConfig,
    /// Pick the ball color from the palette each run instead of `ball.color`.
    pub random_ball_color: bool,
    /// Seed for the palette pick.
    pub color_seed: u64,
    /// Physics gravity in units/s², y-up (default (0, -10)).
    pub gravity: Vec2,
    /// Physics step in seconds (default 1/60).
    pub fixed_dt: f32,
    /// Most physics steps run for a single frame (default 10).
    pub max_substeps: u32,
    /// How far past the math bounds the ball may go before it is out (default 5).
    pub out_of_bounds_margin: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let transform = TransformConfig::default();
        Self {
            rail: RailConfig::covering(&transform, 0.2),
            transform,
            rail_material: RailMaterial::default(),
            ball: BallConfig::default(),
            random_ball_color: true,
            color_seed: 0x5eed,
            gravity: Vec2::new(0.0, -10.0),
            fixed_dt: 1.0 / 60.0,
            max_substeps: 10,
            out_of_bounds_margin: 5.0,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SessionConfig::default();
        assert_eq!(c.rail.x_min, -25.0);
        assert_eq!(c.rail.x_max, 25.0);
        assert_eq!(c.gravity, Vec2::new(0.0, -10.0));
        assert!((c.fixed_dt - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = SessionConfig::from_json(r#"{ "max_substeps": 4, "random_ball_color": false }"#).unwrap();
        assert_eq!(c.max_substeps, 4);
        assert!(!c.random_ball_color);
        assert_eq!(c.transform, TransformConfig::default());
    }
}
