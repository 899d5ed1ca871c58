// ==================== Imports ====================
use wasm_bindgen::prelude::*;

#[macro_use]
mod browser;
pub mod config;
pub mod engine;
pub mod game;
pub mod sprite;

use engine::{GameLoop, Point, Renderer};
use game::Runner;

const STARTUP_FAILED: &str = "Could not start the game, see console";
const STARTUP_FAILED_COLOR: &str = "#c00";

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs panic hook
/// - spawns the game loop, which waits for every image before its first tick
/// - a startup failure is logged and written on the canvas, never retried
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(Runner::new()).await {
            error!("Could not start game : {:#?}", err);
            report_startup_failure();
        }
    });

    Ok(())
}

fn report_startup_failure() {
    match browser::context() {
        Ok(context) => {
            let renderer = Renderer::new(context);
            let position = Point { x: 16.0, y: 32.0 };
            if let Err(err) = renderer.draw_text(STARTUP_FAILED, &position, STARTUP_FAILED_COLOR) {
                error!("{:#?}", err);
            }
        }
        Err(err) => {
            error!("No canvas to report on : {:#?}", err);
        }
    }
}
