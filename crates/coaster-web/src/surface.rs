use coaster_engine::{DrawSurface, RenderStyle};
use glam::DVec2;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`DrawSurface`] over a 2D canvas context. Coordinates are canvas pixels,
/// which is what the context already uses.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `<canvas id=canvas_id>` and take its 2D context.
    pub fn from_canvas_id(canvas_id: &str) -> Result<(Self, HtmlCanvasElement), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok((Self { ctx }, canvas))
    }

    fn apply(&self, style: &RenderStyle) {
        self.ctx.set_fill_style_str(&style.fill.to_css());
        self.ctx.set_stroke_style_str(&style.stroke.to_css());
        self.ctx.set_line_width(style.line_width);
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn circle(&mut self, center: DVec2, radius: f64, style: &RenderStyle) {
        self.apply(style);
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(center.x, center.y, radius, 0.0, TAU) {
            log::warn!("canvas: arc failed: {:?}", e);
            return;
        }
        self.ctx.fill();
        self.ctx.stroke();
    }

    fn polyline(&mut self, points: &[DVec2], style: &RenderStyle) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        self.apply(style);
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.stroke();
    }

    fn rect(&mut self, min: DVec2, size: DVec2, style: &RenderStyle) {
        self.apply(style);
        self.ctx.fill_rect(min.x, min.y, size.x, size.y);
        self.ctx.stroke_rect(min.x, min.y, size.x, size.y);
    }
}
