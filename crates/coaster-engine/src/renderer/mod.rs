pub mod traits;

pub use traits::{CommandBuffer, DrawCommand, DrawSurface};
