use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider, in the body's local frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    /// Open chain of segments through the vertices, in order.
    Polyline { vertices: Vec<Vec2> },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(*radius),
            ColliderDesc::Polyline { vertices } => {
                let points = vertices
                    .iter()
                    .map(|v| nalgebra::Point2::new(v.x, v.y))
                    .collect();
                ColliderBuilder::polyline(points, None)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.25,
            friction: 0.0,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub ccd: bool,
    pub collider: ColliderDesc,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            ccd: false,
            collider,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            ccd: false,
            collider,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    /// Continuous collision detection. A fast ball against a thin rail needs it.
    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns the Rapier2D sets and pipeline. Physics space is y-up, so gravity
/// pulls along negative Y.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector
    /// (e.g. `Vec2::new(0.0, -10.0)` for Earth-like gravity in metric units).
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data`; nothing else is.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .linvel(vec2_to_na(desc.velocity))
            .ccd_enabled(desc.ccd)
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by one timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Query the collider shape of a physics body.
    /// Returns `None` if the collider no longer exists or has an unsupported shape.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let collider = self.colliders.get(body.collider_handle)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ColliderDesc::Ball { radius: ball.radius })
        } else if let Some(polyline) = shape.as_polyline() {
            Some(ColliderDesc::Polyline {
                vertices: polyline
                    .vertices()
                    .iter()
                    .map(|p| Vec2::new(p.x, p.y))
                    .collect(),
            })
        } else {
            None
        }
    }

    /// Resolve the entity a body was created for.
    pub fn body_entity(&self, body: &PhysicsBody) -> Option<EntityId> {
        self.bodies
            .get(body.body_handle)
            .map(|rb| EntityId(rb.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> ColliderDesc {
        ColliderDesc::Polyline {
            vertices: vec![
                Vec2::new(-5.0, 2.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(5.0, -2.0),
            ],
        }
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.3 }),
            ColliderMaterial::default(),
        );
        assert_eq!(world.body_count(), 1);
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn gravity_pulls_down_in_y_up_space() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        world.set_dt(1.0 / 60.0);

        let body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.3 }),
            ColliderMaterial::default(),
        );

        let (initial_pos, _) = world.body_position(&body);
        for _ in 0..10 {
            world.step();
        }
        let (new_pos, _) = world.body_position(&body);

        assert!(
            new_pos.y < initial_pos.y,
            "Body should fall: start={}, end={}",
            initial_pos.y,
            new_pos.y
        );
        assert!(world.velocity(&body).y < 0.0);
    }

    #[test]
    fn fixed_polyline_does_not_move() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        let body = world.create_body(EntityId(1), &BodyDesc::fixed(ramp()), ColliderMaterial::default());

        for _ in 0..10 {
            world.step();
        }

        let (pos, rot) = world.body_position(&body);
        assert_eq!(pos, Vec2::ZERO);
        assert_eq!(rot, 0.0);
    }

    #[test]
    fn ball_rolls_down_a_polyline_ramp() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        world.set_dt(1.0 / 60.0);
        world.create_body(EntityId(1), &BodyDesc::fixed(ramp()), ColliderMaterial::default());
        let ball = world.create_body(
            EntityId(2),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.3 })
                .with_position(Vec2::new(-4.0, 3.0))
                .with_ccd(true),
            ColliderMaterial {
                density: 2.0,
                ..ColliderMaterial::default()
            },
        );

        for _ in 0..90 {
            world.step();
        }

        let (pos, _) = world.body_position(&ball);
        assert!(pos.x > -4.0, "Ball should roll downhill to +x: x={}", pos.x);
        // Still resting on the ramp, not fallen through it.
        let ramp_y = -0.4 * pos.x;
        assert!(pos.y > ramp_y - 0.05, "Ball fell through the rail: {:?}", pos);
    }

    #[test]
    fn builder_pattern() {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
            .with_position(Vec2::new(1.0, 2.0))
            .with_rotation(0.5)
            .with_velocity(Vec2::new(3.0, 4.0))
            .with_ccd(true);

        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec2::new(1.0, 2.0));
        assert_eq!(desc.velocity, Vec2::new(3.0, 4.0));
        assert!((desc.rotation - 0.5).abs() < 0.001);
        assert!(desc.ccd);
    }

    #[test]
    fn body_position_and_rotation() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
                .with_position(Vec2::new(1.0, 2.0))
                .with_rotation(1.5),
            ColliderMaterial::default(),
        );

        let (pos, rot) = world.body_position(&body);
        assert!((pos.x - 1.0).abs() < 0.001);
        assert!((pos.y - 2.0).abs() < 0.001);
        assert!((rot - 1.5).abs() < 0.001);
    }

    #[test]
    fn collider_shape_ball_and_polyline() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let ball_body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.3 }),
            ColliderMaterial::default(),
        );
        let rail_body = world.create_body(EntityId(2), &BodyDesc::fixed(ramp()), ColliderMaterial::default());

        match world.collider_shape(&ball_body) {
            Some(ColliderDesc::Ball { radius }) => assert!((radius - 0.3).abs() < 0.001),
            other => panic!("expected Ball, got {:?}", other),
        }

        match world.collider_shape(&rail_body) {
            Some(ColliderDesc::Polyline { vertices }) => {
                assert_eq!(vertices.len(), 3);
                assert_eq!(vertices[1], Vec2::ZERO);
            }
            other => panic!("expected Polyline, got {:?}", other),
        }
    }

    #[test]
    fn user_data_resolves_entity() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            EntityId(42),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.3 }),
            ColliderMaterial::default(),
        );
        assert_eq!(world.body_entity(&body), Some(EntityId(42)));
        world.remove_body(&body);
        assert_eq!(world.body_entity(&body), None);
        assert!(world.collider_shape(&body).is_none());
    }
}
