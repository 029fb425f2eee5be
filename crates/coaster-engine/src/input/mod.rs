pub mod expression;
pub mod queue;
