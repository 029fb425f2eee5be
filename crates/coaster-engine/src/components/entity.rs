use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::physics::PhysicsBody;

/// The two kinds of simulation entity a coaster scene holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// The dynamic ball, one per run.
    Ball,
    /// The static rail discretized from the user function.
    Rail,
}

/// Fat Entity: one struct with an optional physics body.
/// Render style is not stored here; see [`crate::components::style::StyleTable`].
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    pub kind: EntityKind,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in physics space, synced from the body after each step.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity of the given kind at the physics origin.
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            tag: String::new(),
            active: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
                    body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
