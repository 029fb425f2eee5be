use glam::DVec2;

use crate::api::config::SessionConfig;
use crate::api::error::CoasterError;
use crate::api::types::{EntityId, RunStatus};
use crate::assets::levels::{Level, FREE_PLAY_FUNCTION, FREE_PLAY_SPAWN};
use crate::components::entity::{Entity, EntityKind};
use crate::components::style::RenderStyle;
use crate::core::physics::{BodyDesc, ColliderMaterial, PhysicsWorld};
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::core::time::FixedTimestep;
use crate::core::transform::CoordinateTransform;
use crate::input::expression::CompiledExpression;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::traits::DrawSurface;
use crate::systems::ball::{place_ball_with, BallConfig, BALL_PALETTE};
use crate::systems::rail::{build_rail, Evaluate};
use crate::systems::render::{snapshot, FrameRenderer};
use crate::systems::tracker::{PlayBounds, RunTracker};

/// One playable coaster: a transform, a rail built from the current function,
/// at most one ball, and the run being tracked.
///
/// The transform is built once in [`CoasterSession::new`] and never changes.
/// Rails and balls are only ever replaced whole, between ticks.
pub struct CoasterSession {
    config: SessionConfig,
    transform: CoordinateTransform,
    physics: PhysicsWorld,
    scene: Scene,
    renderer: FrameRenderer,
    level: Option<Level>,
    function: Option<Box<dyn Evaluate>>,
    expression: Option<String>,
    spawn: DVec2,
    rail: Option<EntityId>,
    ball: Option<EntityId>,
    tracker: RunTracker,
    timestep: FixedTimestep,
    input: InputQueue,
    rng: Rng,
    status: RunStatus,
    next_id: u32,
}

impl CoasterSession {
    /// Empty session for `level`, or free play when `None`. No rail exists
    /// until a function is set.
    pub fn new(config: SessionConfig, level: Option<Level>) -> Self {
        let transform = CoordinateTransform::new(&config.transform);
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.fixed_dt);
        let bounds = PlayBounds::from_transform(&config.transform, config.out_of_bounds_margin);

        Self {
            transform,
            physics,
            scene: Scene::new(),
            renderer: FrameRenderer::new(),
            spawn: level.as_ref().map(Level::spawn).unwrap_or(FREE_PLAY_SPAWN),
            tracker: RunTracker::new(level.as_ref(), bounds),
            timestep: FixedTimestep::new(config.fixed_dt, config.max_substeps),
            input: InputQueue::new(),
            rng: Rng::new(config.color_seed),
            level,
            function: None,
            expression: None,
            rail: None,
            ball: None,
            status: RunStatus::Idle,
            next_id: 1,
            config,
        }
    }

    /// Session with the rail built from the level's base function, or the
    /// free-play default.
    pub fn with_base_function(config: SessionConfig, level: Option<Level>) -> Result<Self, CoasterError> {
        let base = level
            .as_ref()
            .map(|l| l.base_function.clone())
            .unwrap_or_else(|| FREE_PLAY_FUNCTION.to_string());
        let mut session = Self::new(config, level);
        session.set_expression(&base)?;
        Ok(session)
    }

    // -- Function and rail --

    /// Compile `text` and rebuild the rail from it.
    ///
    /// A formula that does not compile leaves the current function and rail in
    /// place. One that compiles but yields no rail removes the old rail and
    /// returns [`CoasterError::NoRail`].
    pub fn set_expression(&mut self, text: &str) -> Result<EntityId, CoasterError> {
        let compiled = match CompiledExpression::compile(text) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("session: expression {:?} rejected: {}", text, e);
                return Err(e);
            }
        };
        self.expression = Some(compiled.source().to_string());
        self.set_function(Box::new(compiled))
    }

    /// Use `function` for the rail and rebuild it.
    pub fn set_function(&mut self, function: Box<dyn Evaluate>) -> Result<EntityId, CoasterError> {
        self.function = Some(function);
        self.rebuild_rail()
    }

    /// Replace the rail with a fresh one from the current function. Any ball in
    /// play is removed first, since it was placed against the old rail.
    pub fn rebuild_rail(&mut self) -> Result<EntityId, CoasterError> {
        self.stop();
        if let Some(old) = self.rail.take() {
            self.despawn(old);
        }

        let function = self.function.as_deref().ok_or(CoasterError::EmptyExpression)?;
        let boundary = build_rail(function, &self.transform, &self.config.rail)
            .ok_or(CoasterError::NoRail)?
            .with_material(self.config.rail_material);

        let id = self.spawn_body(
            EntityKind::Rail,
            "rail",
            &boundary.body_desc(),
            boundary.collider_material(),
            boundary.material().style,
        );
        self.rail = Some(id);
        log::debug!("session: rail {:?} with {} points", id, boundary.len());
        Ok(id)
    }

    // -- Spawn point --

    /// Move the spawn point. Only free play allows it, and not mid-run.
    pub fn set_spawn(&mut self, math: DVec2) -> bool {
        if self.level.is_some() || self.status == RunStatus::Running || !math.is_finite() {
            return false;
        }
        self.spawn = math;
        true
    }

    /// Move the spawn point to a clicked canvas pixel.
    pub fn set_spawn_from_canvas(&mut self, x: f64, y: f64) -> bool {
        let math = self.transform.canvas_to_math(DVec2::new(x, y));
        self.set_spawn(math)
    }

    // -- Runs --

    /// Drop a new ball at the spawn point and start timing. Replaces any ball
    /// already in play.
    pub fn start(&mut self) -> Result<EntityId, CoasterError> {
        if self.rail.is_none() {
            log::warn!("session: cannot start without a rail");
            return Err(CoasterError::NoRail);
        }
        if let Some(old) = self.ball.take() {
            self.despawn(old);
        }

        let ball_config = BallConfig {
            color: self.next_ball_color(),
            ..self.config.ball
        };
        let ball = place_ball_with(self.spawn, &self.transform, &ball_config);
        let id = self.spawn_body(EntityKind::Ball, "ball", &ball.body_desc(), ball.material, ball.style);
        self.ball = Some(id);

        self.tracker.reset();
        self.timestep.reset();
        self.status = RunStatus::Running;
        log::info!("session: run started at {:?}", self.spawn);
        Ok(id)
    }

    /// Same as [`Self::start`]; reads better from a "try again" button.
    pub fn restart(&mut self) -> Result<EntityId, CoasterError> {
        self.start()
    }

    /// Remove the ball and go idle.
    pub fn stop(&mut self) {
        if let Some(old) = self.ball.take() {
            self.despawn(old);
        }
        self.status = RunStatus::Idle;
    }

    /// Queue host input for the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// One animation frame: apply queued input, run the fixed physics steps
    /// owed for `frame_dt` seconds, and judge the run after each step.
    pub fn tick(&mut self, frame_dt: f32) -> RunStatus {
        for event in self.input.drain() {
            self.apply_input(event);
        }
        if self.status != RunStatus::Running {
            return self.status;
        }

        let dt = self.timestep.dt() as f64;
        for _ in 0..self.timestep.accumulate(frame_dt) {
            self.physics.step();
            self.sync_entities();
            let Some(ball) = self.ball_math_position() else {
                break;
            };
            self.status = self.tracker.update(ball, dt);
            if self.status.is_terminal() {
                break;
            }
        }
        self.status
    }

    /// Draw the current frame: zones, then every body as it stands now.
    pub fn render(&self, surface: &mut impl DrawSurface) {
        let bodies = snapshot(&self.scene, &self.physics);
        self.renderer
            .render_scene(surface, &self.transform, self.tracker.zone_states(), &bodies);
    }

    // -- Accessors --

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn spawn(&self) -> DVec2 {
        self.spawn
    }

    /// Source of the last formula that compiled.
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn rail_id(&self) -> Option<EntityId> {
        self.rail
    }

    pub fn ball_id(&self) -> Option<EntityId> {
        self.ball
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// Ball center in math space, converted back through the canvas path.
    pub fn ball_math_position(&self) -> Option<DVec2> {
        let ball = self.scene.get(self.ball?)?;
        Some(self.transform.physics_to_math(ball.pos.as_dvec2()))
    }

    // -- private helpers --

    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn next_ball_color(&mut self) -> crate::components::style::Color {
        if self.config.random_ball_color {
            if let Some(color) = self.rng.pick(&BALL_PALETTE) {
                return *color;
            }
        }
        self.config.ball.color
    }

    fn spawn_body(
        &mut self,
        kind: EntityKind,
        tag: &str,
        desc: &BodyDesc,
        material: ColliderMaterial,
        style: RenderStyle,
    ) -> EntityId {
        let id = self.next_id();
        let body = self.physics.create_body(id, desc, material);
        let entity = Entity::new(id, kind)
            .with_tag(tag)
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.scene.spawn(entity);
        self.renderer.styles_mut().insert(id, style);
        id
    }

    fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
        self.renderer.styles_mut().remove(id);
    }

    fn sync_entities(&mut self) {
        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }

    fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                if self.set_spawn_from_canvas(x, y) {
                    log::debug!("session: spawn moved to {:?}", self.spawn);
                }
            }
            InputEvent::Restart => {
                if let Err(e) = self.restart() {
                    log::warn!("session: restart failed: {}", e);
                }
            }
            InputEvent::Rebuild => {
                if let Err(e) = self.rebuild_rail() {
                    log::warn!("session: rebuild failed: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::levels::level_by_id;
    use crate::renderer::traits::{CommandBuffer, DrawCommand};

    fn free_play() -> CoasterSession {
        CoasterSession::with_base_function(SessionConfig::default(), None).unwrap()
    }

    #[test]
    fn base_function_builds_rail() {
        let session = free_play();
        assert_eq!(session.expression(), Some(FREE_PLAY_FUNCTION));
        assert!(session.rail_id().is_some());
        assert_eq!(session.physics().body_count(), 1);
        assert_eq!(session.status(), RunStatus::Idle);
    }

    #[test]
    fn bad_expression_keeps_old_rail() {
        let mut session = free_play();
        let rail = session.rail_id();
        assert!(matches!(session.set_expression("sin("), Err(CoasterError::Expression(_))));
        assert_eq!(session.rail_id(), rail);
        assert_eq!(session.expression(), Some(FREE_PLAY_FUNCTION));
    }

    #[test]
    fn no_rail_function_clears_rail_and_blocks_start() {
        let mut session = free_play();
        let result = session.set_function(Box::new(|_x: f64| f64::NAN));
        assert!(matches!(result, Err(CoasterError::NoRail)));
        assert!(session.rail_id().is_none());
        assert_eq!(session.physics().body_count(), 0);
        assert!(matches!(session.start(), Err(CoasterError::NoRail)));
        assert_eq!(session.tick(1.0 / 60.0), RunStatus::Idle);
    }

    #[test]
    fn rebuild_replaces_rail_and_removes_ball() {
        let mut session = free_play();
        let first = session.rail_id().unwrap();
        session.start().unwrap();
        assert_eq!(session.physics().body_count(), 2);

        let second = session.set_expression("0.05*x*x").unwrap();
        assert_ne!(first, second);
        assert!(session.ball_id().is_none());
        assert_eq!(session.physics().body_count(), 1);
        assert_eq!(session.scene().len(), 1);
        assert_eq!(session.status(), RunStatus::Idle);
    }

    #[test]
    fn restart_replaces_ball() {
        let mut session = free_play();
        let a = session.start().unwrap();
        session.tick(0.5);
        let b = session.restart().unwrap();
        assert_ne!(a, b);
        assert_eq!(session.physics().body_count(), 2);
        let pos = session.ball_math_position().unwrap();
        assert!((pos - FREE_PLAY_SPAWN).abs().max_element() < 1e-4, "ball at {:?}", pos);
    }

    #[test]
    fn ball_falls_after_ticks() {
        let mut session = free_play();
        session.start().unwrap();
        let before = session.ball_math_position().unwrap();
        for _ in 0..10 {
            assert_eq!(session.tick(1.0 / 60.0), RunStatus::Running);
        }
        let after = session.ball_math_position().unwrap();
        assert!(after.y < before.y, "{:?} -> {:?}", before, after);
        assert!(session.tracker().elapsed() > 0.0);
    }

    #[test]
    fn spawn_moves_only_in_free_play_when_idle() {
        let mut session = free_play();
        session.push_input(InputEvent::PointerDown { x: 600.0, y: 375.0 });
        session.tick(0.0);
        assert!(session.spawn().abs().max_element() < 1e-9);

        session.start().unwrap();
        assert!(!session.set_spawn(DVec2::new(1.0, 1.0)));

        let level = level_by_id(1).unwrap();
        let mut level_session = CoasterSession::with_base_function(SessionConfig::default(), Some(level)).unwrap();
        assert!(!level_session.set_spawn(DVec2::new(1.0, 1.0)));
        assert_eq!(level_session.spawn(), DVec2::new(-20.0, 18.0));
    }

    #[test]
    fn render_draws_zones_rail_and_ball() {
        let level = level_by_id(2).unwrap();
        let mut session = CoasterSession::with_base_function(SessionConfig::default(), Some(level)).unwrap();
        session.start().unwrap();

        let mut buf = CommandBuffer::new();
        session.render(&mut buf);
        let cmds = buf.commands();
        assert!(matches!(cmds[0], DrawCommand::Clear { .. }));
        let rects = cmds.iter().filter(|c| matches!(c, DrawCommand::Rect { .. })).count();
        assert_eq!(rects, 3, "two visit zones and a finish zone");
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Polyline { .. })));
        assert!(matches!(cmds.last(), Some(DrawCommand::Circle { .. })));
    }

    #[test]
    fn fixed_ball_color_when_not_random() {
        let config = SessionConfig {
            random_ball_color: false,
            ..SessionConfig::default()
        };
        let mut session = CoasterSession::with_base_function(config, None).unwrap();
        let id = session.start().unwrap();
        assert_eq!(session.renderer().styles().get(id).fill, BallConfig::default().color);
    }
}
