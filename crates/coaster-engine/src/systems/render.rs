//! Frame rendering: project physics bodies and math-space zones onto a
//! [`DrawSurface`].
//!
//! A frame is drawn from a [`BodySnapshot`] list captured once at frame start,
//! so a rail rebuild can never tear a frame. The renderer owns the style
//! side-table; nothing about presentation is stored in the physics world.

use glam::{DVec2, Vec2};

use crate::api::types::EntityId;
use crate::assets::levels::Zone;
use crate::components::style::{Color, RenderStyle, StyleTable};
use crate::core::physics::{ColliderDesc, PhysicsWorld};
use crate::core::scene::Scene;
use crate::core::transform::CoordinateTransform;
use crate::renderer::traits::DrawSurface;

/// A body's world transform and shape at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub id: EntityId,
    /// Body origin in physics space.
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise in y-up physics space.
    pub angle: f32,
    /// Collider shape in the body's local frame.
    pub shape: ColliderDesc,
}

/// Capture every active entity that has a body, in scene order.
pub fn snapshot(scene: &Scene, physics: &PhysicsWorld) -> Vec<BodySnapshot> {
    scene
        .iter()
        .filter(|e| e.active)
        .filter_map(|e| {
            let body = e.body.as_ref()?;
            let shape = physics.collider_shape(body)?;
            let (position, angle) = physics.body_position(body);
            Some(BodySnapshot {
                id: e.id,
                position,
                angle,
                shape,
            })
        })
        .collect()
}

/// Project a point from a body's local frame to canvas pixels:
/// rotate by `angle`, translate by `position`, then map physics → canvas.
pub fn local_to_canvas(
    transform: &CoordinateTransform,
    position: Vec2,
    angle: f32,
    local: Vec2,
) -> DVec2 {
    let (sin, cos) = (angle as f64).sin_cos();
    let local = local.as_dvec2();
    let world = position.as_dvec2()
        + DVec2::new(
            local.x * cos - local.y * sin,
            local.x * sin + local.y * cos,
        );
    transform.physics_to_canvas(world)
}

/// Whether a visit zone has been reached yet. Drives its overlay color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneState {
    Pending,
    Visited,
    Finish,
}

/// Draws bodies and zones for one frame. Read-only with respect to simulation
/// state.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    styles: StyleTable,
    pending_zone: RenderStyle,
    visited_zone: RenderStyle,
    finish_zone: RenderStyle,
}

impl FrameRenderer {
    pub fn new() -> Self {
        let zone = |c: Color| RenderStyle {
            fill: c.with_alpha(48),
            stroke: c,
            line_width: 1.5,
        };
        Self {
            styles: StyleTable::new(),
            pending_zone: zone(Color::hex(0xffca28)),
            visited_zone: zone(Color::hex(0x66bb6a)),
            finish_zone: zone(Color::hex(0xef5350)),
        }
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleTable {
        &mut self.styles
    }

    /// Clear the logical canvas and draw every snapshot. An empty list draws
    /// only the cleared background.
    pub fn render_frame(
        &self,
        surface: &mut impl DrawSurface,
        transform: &CoordinateTransform,
        bodies: &[BodySnapshot],
    ) {
        self.render_scene(surface, transform, std::iter::empty(), bodies);
    }

    /// Like [`Self::render_frame`], with zone overlays drawn under the bodies.
    pub fn render_scene<'a>(
        &self,
        surface: &mut impl DrawSurface,
        transform: &CoordinateTransform,
        zones: impl IntoIterator<Item = (&'a Zone, ZoneState)>,
        bodies: &[BodySnapshot],
    ) {
        let config = transform.config();
        surface.clear(config.canvas_width, config.canvas_height);
        self.draw_zones(surface, transform, zones);
        for body in bodies {
            self.draw_body(surface, transform, body);
        }
    }

    /// Draw one body with its tagged style.
    pub fn draw_body(
        &self,
        surface: &mut impl DrawSurface,
        transform: &CoordinateTransform,
        body: &BodySnapshot,
    ) {
        let style = self.styles.get(body.id);
        match &body.shape {
            ColliderDesc::Ball { radius } => {
                let center = local_to_canvas(transform, body.position, body.angle, Vec2::ZERO);
                let radius_px = *radius as f64 * transform.physics_ratio();
                surface.circle(center, radius_px, &style);
            }
            ColliderDesc::Polyline { vertices } => {
                if vertices.len() < 2 {
                    return;
                }
                let points: Vec<DVec2> = vertices
                    .iter()
                    .map(|v| local_to_canvas(transform, body.position, body.angle, *v))
                    .collect();
                surface.polyline(&points, &style);
            }
        }
    }

    /// Draw zone overlays straight from math space.
    pub fn draw_zones<'a>(
        &self,
        surface: &mut impl DrawSurface,
        transform: &CoordinateTransform,
        zones: impl IntoIterator<Item = (&'a Zone, ZoneState)>,
    ) {
        for (zone, state) in zones {
            let style = match state {
                ZoneState::Pending => &self.pending_zone,
                ZoneState::Visited => &self.visited_zone,
                ZoneState::Finish => &self.finish_zone,
            };
            let min = transform.math_to_canvas(zone.top_left());
            let size = zone.size() * transform.scale();
            surface.rect(min, size, style);
        }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}
