pub mod ball;
pub mod rail;
pub mod render;
pub mod tracker;
