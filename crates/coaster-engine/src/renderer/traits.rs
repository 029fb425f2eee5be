//! Drawing surface contract.
//!
//! The engine never talks to a canvas directly. The frame renderer emits
//! immediate-mode calls against [`DrawSurface`], addressed in canvas pixels
//! (y down). The web bridge implements it over a 2D canvas context; tests and
//! headless hosts use the recording [`CommandBuffer`].

use glam::DVec2;

use crate::components::style::RenderStyle;

/// A 2D immediate-mode drawing target in canvas pixel coordinates.
pub trait DrawSurface {
    /// Clear the logical `width` × `height` area.
    fn clear(&mut self, width: f64, height: f64);

    /// Filled and stroked circle.
    fn circle(&mut self, center: DVec2, radius: f64, style: &RenderStyle);

    /// Stroked open polyline. Fewer than two points draws nothing.
    fn polyline(&mut self, points: &[DVec2], style: &RenderStyle);

    /// Filled and stroked axis-aligned rectangle; `min` is the top-left corner.
    fn rect(&mut self, min: DVec2, size: DVec2, style: &RenderStyle);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    Circle { center: DVec2, radius: f64, style: RenderStyle },
    Polyline { points: Vec<DVec2>, style: RenderStyle },
    Rect { min: DVec2, size: DVec2, style: RenderStyle },
}

/// A [`DrawSurface`] that records commands instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Take the recorded commands, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Replay the recorded commands onto another surface.
    pub fn replay(&self, surface: &mut impl DrawSurface) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear { width, height } => surface.clear(*width, *height),
                DrawCommand::Circle { center, radius, style } => surface.circle(*center, *radius, style),
                DrawCommand::Polyline { points, style } => surface.polyline(points, style),
                DrawCommand::Rect { min, size, style } => surface.rect(*min, *size, style),
            }
        }
    }
}

impl DrawSurface for CommandBuffer {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn circle(&mut self, center: DVec2, radius: f64, style: &RenderStyle) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: *style,
        });
    }

    fn polyline(&mut self, points: &[DVec2], style: &RenderStyle) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn rect(&mut self, min: DVec2, size: DVec2, style: &RenderStyle) {
        self.commands.push(DrawCommand::Rect {
            min,
            size,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_and_skips_short_polylines() {
        let mut buf = CommandBuffer::new();
        let style = RenderStyle::DEFAULT;
        buf.clear(100.0, 50.0);
        buf.polyline(&[DVec2::ZERO], &style);
        buf.circle(DVec2::new(10.0, 10.0), 4.0, &style);
        assert_eq!(buf.len(), 2);
        assert!(matches!(buf.commands()[0], DrawCommand::Clear { width, .. } if width == 100.0));
        assert!(matches!(buf.commands()[1], DrawCommand::Circle { .. }));
    }

    #[test]
    fn replay_reproduces_commands() {
        let mut source = CommandBuffer::new();
        let style = RenderStyle::DEFAULT;
        source.clear(10.0, 10.0);
        source.rect(DVec2::ZERO, DVec2::ONE, &style);
        source.polyline(&[DVec2::ZERO, DVec2::ONE], &style);

        let mut copy = CommandBuffer::new();
        source.replay(&mut copy);
        assert_eq!(copy.commands(), source.commands());
        assert_eq!(source.clone().drain().len(), 3);
    }
}
