//! Render styles, kept in a side-table keyed by entity rather than on the
//! physics body.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::types::EntityId;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS color string: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

/// How an entity is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub fill: Color,
    pub stroke: Color,
    /// Stroke width in canvas pixels.
    pub line_width: f64,
}

impl RenderStyle {
    /// Fallback for entities with no registered style.
    pub const DEFAULT: Self = Self {
        fill: Color::hex(0x4fc3f7),
        stroke: Color::hex(0x29b6f6),
        line_width: 2.0,
    };

    pub const fn with_fill(self, fill: Color) -> Self {
        Self { fill, ..self }
    }

    pub const fn with_stroke(self, stroke: Color) -> Self {
        Self { stroke, ..self }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Entity → style lookup owned by the frame renderer.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: HashMap<EntityId, RenderStyle>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, style: RenderStyle) {
        self.styles.insert(id, style);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<RenderStyle> {
        self.styles.remove(&id)
    }

    /// Style for `id`, or [`RenderStyle::DEFAULT`] if none was registered.
    pub fn get(&self, id: EntityId) -> RenderStyle {
        self.styles.get(&id).copied().unwrap_or(RenderStyle::DEFAULT)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn clear(&mut self) {
        self.styles.clear();
    }
}
