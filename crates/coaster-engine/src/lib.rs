pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::SessionConfig;
pub use api::error::CoasterError;
pub use api::session::CoasterSession;
pub use api::types::{EntityId, RunStatus};
pub use assets::levels::{builtin_levels, level_by_id, Level, Zone};
pub use components::entity::{Entity, EntityKind};
pub use components::style::{Color, RenderStyle, StyleTable};
pub use core::physics::{BodyDesc, BodyType, ColliderDesc, ColliderMaterial, PhysicsBody, PhysicsWorld};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::transform::{CoordinateTransform, TransformConfig, PHYSICS_PIXELS_PER_UNIT};
pub use input::expression::{CompiledExpression, PRESETS};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::traits::{CommandBuffer, DrawCommand, DrawSurface};
pub use systems::ball::{place_ball, place_ball_with, BallConfig, BallDesc, BALL_PALETTE};
pub use systems::rail::{build_rail, build_rail_from_config, Evaluate, RailBoundary, RailConfig, RailMaterial};
pub use systems::render::{local_to_canvas, snapshot, BodySnapshot, FrameRenderer, ZoneState};
pub use systems::tracker::{format_time, PlayBounds, RunTracker};
