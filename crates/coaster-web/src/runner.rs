use coaster_engine::{
    level_by_id, CoasterError, CoasterSession, DrawSurface, InputEvent, RunStatus, SessionConfig,
};

/// Wires a [`CoasterSession`] to a drawing surface and remembers the last
/// error for the host to read.
///
/// The web exports keep one runner in a `thread_local!`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct CoasterRunner<S: DrawSurface> {
    session: CoasterSession,
    surface: S,
    last_error: String,
}

impl<S: DrawSurface> CoasterRunner<S> {
    /// Runner for built-in level `level_id`, or free play when it is 0.
    pub fn new(config: SessionConfig, level_id: u32, surface: S) -> Result<Self, CoasterError> {
        let level = match level_id {
            0 => None,
            id => Some(level_by_id(id)?),
        };
        let session = CoasterSession::with_base_function(config, level)?;
        Ok(Self {
            session,
            surface,
            last_error: String::new(),
        })
    }

    /// Compile and apply a new rail formula. On failure the old rail stays
    /// and the error is kept for [`Self::last_error`].
    pub fn set_expression(&mut self, text: &str) -> bool {
        let ok = self.record(|s| s.set_expression(text).map(|_| ()));
        self.draw();
        ok
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.session.push_input(event);
    }

    pub fn start(&mut self) -> bool {
        self.record(|s| s.start().map(|_| ()))
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.draw();
    }

    /// Advance one animation frame and redraw.
    pub fn tick(&mut self, dt: f32) -> RunStatus {
        let status = self.session.tick(dt);
        self.draw();
        status
    }

    pub fn draw(&mut self) {
        self.session.render(&mut self.surface);
    }

    /// Finish time of the last completed run, in milliseconds.
    pub fn finish_time_ms(&self) -> Option<u64> {
        match self.session.status() {
            RunStatus::Finished { time_ms } => Some(time_ms),
            _ => None,
        }
    }

    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    pub fn session(&self) -> &CoasterSession {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn record(&mut self, f: impl FnOnce(&mut CoasterSession) -> Result<(), CoasterError>) -> bool {
        match f(&mut self.session) {
            Ok(()) => {
                self.last_error.clear();
                true
            }
            Err(e) => {
                self.last_error = e.to_string();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coaster_engine::{CommandBuffer, DrawCommand};

    fn runner(level_id: u32) -> CoasterRunner<CommandBuffer> {
        CoasterRunner::new(SessionConfig::default(), level_id, CommandBuffer::new()).unwrap()
    }

    #[test]
    fn unknown_level_is_an_error() {
        let result = CoasterRunner::new(SessionConfig::default(), 99, CommandBuffer::new());
        assert!(matches!(result, Err(CoasterError::UnknownLevel(99))));
    }

    #[test]
    fn bad_expression_sets_last_error() {
        let mut r = runner(0);
        assert!(!r.set_expression("x +* 2"));
        assert!(!r.last_error().is_empty());
        assert!(r.set_expression("0.1*x*x"));
        assert!(r.last_error().is_empty());
    }

    #[test]
    fn tick_redraws_each_frame() {
        let mut r = runner(1);
        assert!(r.start());
        r.surface_mut().drain();
        assert_eq!(r.tick(1.0 / 60.0), RunStatus::Running);
        let cmds = r.surface_mut().drain();
        assert!(matches!(cmds.first(), Some(DrawCommand::Clear { .. })));
        assert!(matches!(cmds.last(), Some(DrawCommand::Circle { .. })));
        assert_eq!(r.finish_time_ms(), None);
    }

    #[test]
    fn stop_removes_ball_from_frame() {
        let mut r = runner(0);
        r.start();
        r.stop();
        let cmds = r.surface_mut().drain();
        let last = cmds.iter().rev().find(|c| !matches!(c, DrawCommand::Rect { .. }));
        assert!(matches!(last, Some(DrawCommand::Polyline { .. })));
        assert_eq!(r.session().status(), RunStatus::Idle);
    }
}
