/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// What a frame tick reports back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No ball in play (before start, after stop, or when no rail exists).
    Idle,
    /// The ball is rolling.
    Running,
    /// Every visit zone was touched and the ball reached the finish zone.
    Finished { time_ms: u64 },
    /// The ball left the playable extent.
    OutOfBounds,
}

impl RunStatus {
    /// Numeric code used across the WASM boundary.
    pub fn code(self) -> u32 {
        match self {
            RunStatus::Idle => 0,
            RunStatus::Running => 1,
            RunStatus::Finished { .. } => 2,
            RunStatus::OutOfBounds => 3,
        }
    }

    /// Whether the run has ended (finish or out of bounds).
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Finished { .. } | RunStatus::OutOfBounds)
    }
}
