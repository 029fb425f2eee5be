//! Ball placement: spawn point and pixel radius in, physics descriptor out.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::components::style::{Color, RenderStyle};
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
use crate::core::transform::CoordinateTransform;

/// Palette a run picks its ball color from.
pub const BALL_PALETTE: [Color; 14] = [
    Color::hex(0xff5252),
    Color::hex(0xff4081),
    Color::hex(0xe040fb),
    Color::hex(0x7c4dff),
    Color::hex(0x536dfe),
    Color::hex(0x448aff),
    Color::hex(0x40c4ff),
    Color::hex(0x18ffff),
    Color::hex(0x64ffda),
    Color::hex(0x69f0ae),
    Color::hex(0xb2ff59),
    Color::hex(0xeeff41),
    Color::hex(0xffeb3b),
    Color::hex(0xffc107),
];

/// Ball size, material and look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    /// On-screen radius in canvas pixels, constant across math-space zoom.
    pub radius_px: f64,
    /// Non-zero so the ball carries momentum.
    pub density: f32,
    /// Zero so slope and gravity drive the motion.
    pub friction: f32,
    /// Slight bounce off the rail.
    pub restitution: f32,
    pub color: Color,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius_px: 12.0,
            density: 2.0,
            friction: 0.0,
            restitution: 0.25,
            color: Color::hex(0xf19648),
        }
    }
}

/// Everything needed to create the ball body and draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallDesc {
    /// Spawn position in physics space.
    pub position: DVec2,
    /// Radius in physics units.
    pub radius: f64,
    pub material: ColliderMaterial,
    pub style: RenderStyle,
}

impl BallDesc {
    /// Dynamic body with a ball collider. CCD keeps a fast ball from tunnelling
    /// through the zero-thickness rail.
    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc::dynamic(ColliderDesc::Ball {
            radius: self.radius as f32,
        })
        .with_position(self.position.as_vec2())
        .with_ccd(true)
    }

    /// Radius as it will appear on the canvas.
    pub fn radius_px(&self, transform: &CoordinateTransform) -> f64 {
        self.radius * transform.physics_ratio()
    }
}

/// Place a ball of `radius_px` pixels and `color` at `spawn_math`, using the
/// default ball material.
pub fn place_ball(
    spawn_math: DVec2,
    transform: &CoordinateTransform,
    radius_px: f64,
    color: Color,
) -> BallDesc {
    place_ball_with(
        spawn_math,
        transform,
        &BallConfig {
            radius_px,
            color,
            ..BallConfig::default()
        },
    )
}

/// Place a ball described by `config` at `spawn_math`.
///
/// The physics radius is `radius_px / physics_ratio`, the inverse of the
/// rendering projection. A non-finite spawn point is passed through unchanged.
pub fn place_ball_with(
    spawn_math: DVec2,
    transform: &CoordinateTransform,
    config: &BallConfig,
) -> BallDesc {
    BallDesc {
        position: transform.math_to_physics(spawn_math),
        radius: config.radius_px / transform.physics_ratio(),
        material: ColliderMaterial {
            restitution: config.restitution,
            friction: config.friction,
            density: config.density,
        },
        style: RenderStyle::DEFAULT.with_fill(config.color),
    }
}
