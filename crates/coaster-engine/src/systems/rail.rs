//! Rail generation: samples `y = f(x)` at a fixed x-step and turns the samples
//! into an open polyline in physics space.
//!
//! Samples whose value (or mapped physics point) is not finite are dropped rather
//! than failing the whole rail, so functions with singularities such as `tan(x)`
//! still produce a playable, if broken, rail.

use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::components::style::{Color, RenderStyle};
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
use crate::core::transform::{CoordinateTransform, TransformConfig};

/// Upper bound on samples per rail. Larger requests are refused.
pub const MAX_RAIL_SAMPLES: u64 = 1_000_000;

/// A total numeric function `x -> y` supplied by an expression parser.
///
/// Implementations must not panic. A value that cannot be computed is returned
/// as a non-finite number (conventionally `f64::NAN`), which the rail skips.
pub trait Evaluate {
    fn evaluate(&self, x: f64) -> f64;
}

impl<F: Fn(f64) -> f64> Evaluate for F {
    fn evaluate(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Sampling interval for the rail, in math-space x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RailConfig {
    pub x_min: f64,
    pub x_max: f64,
    /// Sample spacing (> 0).
    pub step: f64,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            x_min: -5.0,
            x_max: 5.0,
            step: 0.2,
        }
    }
}

impl RailConfig {
    /// Sample across the whole math x range of `transform`, keeping `step`.
    pub fn covering(transform: &TransformConfig, step: f64) -> Self {
        Self {
            x_min: transform.math_x_min,
            x_max: transform.math_x_max,
            step,
        }
    }

    /// Number of samples the interval produces, or `None` for a degenerate
    /// interval (non-positive step, reversed bounds, too many samples).
    pub fn sample_count(&self) -> Option<u64> {
        if !(self.step > 0.0) || !self.x_min.is_finite() || !self.x_max.is_finite() {
            return None;
        }
        let steps = ((self.x_max - self.x_min) / self.step).round();
        if steps < 0.0 || steps >= MAX_RAIL_SAMPLES as f64 {
            return None;
        }
        Some(steps as u64 + 1)
    }
}

/// Collider and render properties attached to every rail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RailMaterial {
    pub friction: f32,
    pub restitution: f32,
    pub style: RenderStyle,
}

impl Default for RailMaterial {
    fn default() -> Self {
        Self {
            friction: 0.0,
            restitution: 0.25,
            style: RenderStyle::DEFAULT
                .with_stroke(Color::hex(0x29b6f6))
                .with_fill(Color::hex(0x4fc3f7)),
        }
    }
}

/// Ordered physics-space points of a rail, ascending in source x (at least two).
#[derive(Debug, Clone, PartialEq)]
pub struct RailBoundary {
    points: Vec<Vec2>,
    skipped: usize,
    material: RailMaterial,
}

impl RailBoundary {
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a boundary holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples dropped because they were not finite.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn material(&self) -> &RailMaterial {
        &self.material
    }

    pub fn with_material(mut self, material: RailMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn collider_material(&self) -> ColliderMaterial {
        ColliderMaterial {
            restitution: self.material.restitution,
            friction: self.material.friction,
            density: 1.0,
        }
    }

    /// Static body carrying the rail as an open polyline collider.
    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc::fixed(ColliderDesc::Polyline {
            vertices: self.points.clone(),
        })
    }
}

/// Discretize `evaluate` over `config` into a physics-space rail.
///
/// Returns `None` when fewer than two samples survive; the caller must not try
/// to simulate or render that configuration.
pub fn build_rail(
    evaluate: &dyn Evaluate,
    transform: &CoordinateTransform,
    config: &RailConfig,
) -> Option<RailBoundary> {
    let Some(samples) = config.sample_count() else {
        log::warn!("rail: degenerate sampling interval {:?}", config);
        return None;
    };

    let mut points = Vec::with_capacity(samples as usize);
    let mut skipped = 0;
    for i in 0..samples {
        let x = config.x_min + i as f64 * config.step;
        match sample_point(evaluate, transform, x) {
            Some(p) => points.push(p),
            None => skipped += 1,
        }
    }

    log::debug!(
        "rail: {} samples, {} kept, {} skipped",
        samples,
        points.len(),
        skipped
    );

    if points.len() < 2 {
        log::warn!("rail: only {} usable points, no rail built", points.len());
        return None;
    }

    Some(RailBoundary {
        points,
        skipped,
        material: RailMaterial::default(),
    })
}

/// [`build_rail`] with a transform built from `transform_config`.
pub fn build_rail_from_config(
    evaluate: &dyn Evaluate,
    transform_config: &TransformConfig,
    config: &RailConfig,
) -> Option<RailBoundary> {
    build_rail(evaluate, &CoordinateTransform::new(transform_config), config)
}

fn sample_point(evaluate: &dyn Evaluate, transform: &CoordinateTransform, x: f64) -> Option<Vec2> {
    let y = evaluate.evaluate(x);
    if !y.is_finite() {
        return None;
    }
    let physics = transform.math_to_physics(DVec2::new(x, y));
    if !physics.is_finite() {
        return None;
    }
    // The solver runs in f32; a finite f64 can still overflow here.
    let narrowed = physics.as_vec2();
    narrowed.is_finite().then_some(narrowed)
}
