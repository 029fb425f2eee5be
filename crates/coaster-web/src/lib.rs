//! WASM bridge: owns one [`CoasterRunner`] drawing onto a page canvas and
//! exports the host loop entry points.

pub mod runner;
pub mod surface;

pub use runner::CoasterRunner;
pub use surface::CanvasSurface;

use std::cell::RefCell;

use coaster_engine::{InputEvent, RunStatus, SessionConfig};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<CoasterRunner<CanvasSurface>>> = RefCell::new(None);
}

/// Run `f` against the runner, or return `default` before `coaster_init`.
fn with_runner<R>(default: R, f: impl FnOnce(&mut CoasterRunner<CanvasSurface>) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("coaster: not initialized, call coaster_init() first");
            default
        }
    })
}

/// Set up the canvas and session with default settings. `level_id` 0 is free
/// play.
#[wasm_bindgen]
pub fn coaster_init(canvas_id: &str, level_id: u32) -> Result<(), JsValue> {
    init(canvas_id, level_id, SessionConfig::default())
}

/// Like [`coaster_init`], with a JSON [`SessionConfig`]. Missing fields take
/// their defaults.
#[wasm_bindgen]
pub fn coaster_init_with_config(canvas_id: &str, level_id: u32, config_json: &str) -> Result<(), JsValue> {
    let config = SessionConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    init(canvas_id, level_id, config)
}

fn init(canvas_id: &str, level_id: u32, mut config: SessionConfig) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let (surface, canvas) = CanvasSurface::from_canvas_id(canvas_id)?;
    config.transform = config
        .transform
        .with_canvas_size(canvas.width() as f64, canvas.height() as f64);

    let mut runner =
        CoasterRunner::new(config, level_id, surface).map_err(|e| JsValue::from_str(&e.to_string()))?;
    runner.draw();
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));

    log::info!("coaster: initialized on #{} (level {})", canvas_id, level_id);
    Ok(())
}

/// Apply a new rail formula. Returns false when it does not compile (the old
/// rail stays) or leaves too few points (no rail); see [`coaster_last_error`].
#[wasm_bindgen]
pub fn coaster_set_expression(text: &str) -> bool {
    with_runner(false, |r| r.set_expression(text))
}

/// Canvas click in pixels. Moves the free-play spawn point while idle.
#[wasm_bindgen]
pub fn coaster_pointer_down(x: f64, y: f64) {
    with_runner((), |r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn coaster_start() -> bool {
    with_runner(false, |r| r.start())
}

/// Queue a restart for the next tick.
#[wasm_bindgen]
pub fn coaster_restart() {
    with_runner((), |r| r.push_input(InputEvent::Restart));
}

#[wasm_bindgen]
pub fn coaster_stop() {
    with_runner((), |r| r.stop());
}

/// Advance by `dt` seconds and redraw. Returns the status code: 0 idle,
/// 1 running, 2 finished, 3 out of bounds.
#[wasm_bindgen]
pub fn coaster_tick(dt: f32) -> u32 {
    with_runner(RunStatus::Idle, |r| r.tick(dt)).code()
}

/// Finish time of the completed run in milliseconds, or -1.
#[wasm_bindgen]
pub fn coaster_finish_time_ms() -> f64 {
    with_runner(None, |r| r.finish_time_ms()).map_or(-1.0, |ms| ms as f64)
}

/// Message of the last failed call, empty after a success.
#[wasm_bindgen]
pub fn coaster_last_error() -> String {
    with_runner(String::new(), |r| r.last_error().to_string())
}
