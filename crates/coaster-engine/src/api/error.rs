use thiserror::Error;

/// Reportable failures of the coaster core.
///
/// Missing samples while discretizing a rail are data, not errors, and never
/// show up here.
#[derive(Debug, Error)]
pub enum CoasterError {
    #[error("expression is empty")]
    EmptyExpression,

    #[error("cannot parse expression: {0}")]
    Expression(String),

    /// Fewer than two usable samples; the configuration cannot be simulated.
    #[error("function produced fewer than two usable rail points")]
    NoRail,

    #[error("invalid level data: {0}")]
    Level(#[from] serde_json::Error),

    #[error("no level with id {0}")]
    UnknownLevel(u32),
}
