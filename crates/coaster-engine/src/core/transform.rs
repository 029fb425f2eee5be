//! Coordinate transform between math space (y-up), physics space (y-up, metric)
//! and canvas space (y-down pixels).
//!
//! Math and canvas space share one uniform scale (`scale`, pixels per math unit).
//! Physics space is sized from the canvas with a fixed pixels-per-unit constant and
//! reconciled with math space through `math_to_physics_scale`. Rendering from physics
//! uses `display_physics_ratio = scale / math_to_physics_scale`, so one math unit has
//! the same pixel extent on both paths.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Pixels per physics unit used to size the physics world from the canvas.
/// Keeps simulated objects in the 0.1..10 unit range the solver is tuned for.
pub const PHYSICS_PIXELS_PER_UNIT: f64 = 40.0;

/// Canvas size and math-space bounds a transform is built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Canvas width in pixels (> 0).
    pub canvas_width: f64,
    /// Canvas height in pixels (> 0).
    pub canvas_height: f64,
    pub math_x_min: f64,
    pub math_x_max: f64,
    pub math_y_min: f64,
    pub math_y_max: f64,
    /// Padding around the plot area in pixels, leaves room for axis labels.
    #[serde(default)]
    pub plot_padding: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 750.0,
            math_x_min: -25.0,
            math_x_max: 25.0,
            math_y_min: -25.0,
            math_y_max: 25.0,
            plot_padding: 0.0,
        }
    }
}

impl TransformConfig {
    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn with_math_bounds(mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        self.math_x_min = x_min;
        self.math_x_max = x_max;
        self.math_y_min = y_min;
        self.math_y_max = y_max;
        self
    }

    pub fn with_plot_padding(mut self, padding: f64) -> Self {
        self.plot_padding = padding;
        self
    }

    /// Width of the math-space x range.
    pub fn math_width(&self) -> f64 {
        self.math_x_max - self.math_x_min
    }

    /// Height of the math-space y range.
    pub fn math_height(&self) -> f64 {
        self.math_y_max - self.math_y_min
    }

    /// Whether the config satisfies the transform's preconditions.
    pub fn is_valid(&self) -> bool {
        self.canvas_width > 0.0
            && self.canvas_height > 0.0
            && self.plot_padding >= 0.0
            && self.canvas_width > 2.0 * self.plot_padding
            && self.canvas_height > 2.0 * self.plot_padding
            && self.math_width() > 0.0
            && self.math_height() > 0.0
    }
}

/// Read-only mapping among math, physics and canvas space.
///
/// Built once per canvas/session configuration and never mutated; a changed
/// configuration means building a new transform. All conversions are total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    config: TransformConfig,
    scale: f64,
    math_to_physics_scale: f64,
    display_physics_ratio: f64,
    math_center: DVec2,
    canvas_center: DVec2,
}

impl CoordinateTransform {
    /// Derive the transform from `config`.
    ///
    /// Degenerate configs (non-positive canvas, empty math range) are a caller
    /// error; they trip a debug assertion and produce non-finite scales in release.
    pub fn new(config: &TransformConfig) -> Self {
        debug_assert!(config.is_valid(), "invalid transform config: {:?}", config);

        let plot_width = config.canvas_width - 2.0 * config.plot_padding;
        let plot_height = config.canvas_height - 2.0 * config.plot_padding;
        let scale = (plot_width / config.math_width()).min(plot_height / config.math_height());

        // Physics extent follows the canvas, not the math bounds.
        let physics_width = config.canvas_width / PHYSICS_PIXELS_PER_UNIT;
        let physics_height = config.canvas_height / PHYSICS_PIXELS_PER_UNIT;
        let math_to_physics_scale = (physics_width / config.math_width())
            .min(physics_height / config.math_height());

        let display_physics_ratio = scale / math_to_physics_scale;

        let math_center = DVec2::new(
            (config.math_x_min + config.math_x_max) / 2.0,
            (config.math_y_min + config.math_y_max) / 2.0,
        );
        let canvas_center = DVec2::new(config.canvas_width / 2.0, config.canvas_height / 2.0);

        log::debug!(
            "transform: scale={:.4} px/math, physics={:.4} units/math, ratio={:.4} px/unit",
            scale,
            math_to_physics_scale,
            display_physics_ratio
        );

        Self {
            config: *config,
            scale,
            math_to_physics_scale,
            display_physics_ratio,
            math_center,
            canvas_center,
        }
    }

    /// Math coordinates (y up) to canvas pixels (y down).
    pub fn math_to_canvas(&self, math: DVec2) -> DVec2 {
        DVec2::new(
            self.canvas_center.x + (math.x - self.math_center.x) * self.scale,
            self.canvas_center.y - (math.y - self.math_center.y) * self.scale,
        )
    }

    /// Math coordinates to physics world coordinates. Both are y-up.
    pub fn math_to_physics(&self, math: DVec2) -> DVec2 {
        DVec2::new(
            (math.x - self.math_center.x) * self.math_to_physics_scale,
            (math.y - self.math_center.y) * self.math_to_physics_scale,
        )
    }

    /// Physics world coordinates to canvas pixels (y down).
    pub fn physics_to_canvas(&self, physics: DVec2) -> DVec2 {
        DVec2::new(
            self.canvas_center.x + physics.x * self.display_physics_ratio,
            self.canvas_center.y - physics.y * self.display_physics_ratio,
        )
    }

    /// Canvas pixels to math coordinates. Exact inverse of [`Self::math_to_canvas`].
    pub fn canvas_to_math(&self, canvas: DVec2) -> DVec2 {
        DVec2::new(
            self.math_center.x + (canvas.x - self.canvas_center.x) / self.scale,
            self.math_center.y - (canvas.y - self.canvas_center.y) / self.scale,
        )
    }

    /// Physics world coordinates to math coordinates.
    ///
    /// Composed through canvas space so zone checks share the rendering path.
    pub fn physics_to_math(&self, physics: DVec2) -> DVec2 {
        self.canvas_to_math(self.physics_to_canvas(physics))
    }

    /// Pixels per math unit, for grid and zone overlays.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixels per physics unit, for rendering physics bodies.
    pub fn physics_ratio(&self) -> f64 {
        self.display_physics_ratio
    }

    /// Physics units per math unit.
    pub fn math_to_physics_scale(&self) -> f64 {
        self.math_to_physics_scale
    }

    /// Math units per physics unit.
    pub fn math_per_physics_unit(&self) -> f64 {
        1.0 / self.math_to_physics_scale
    }

    /// The config this transform was built from.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }
}
