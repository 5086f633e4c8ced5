mod animation;
mod camera;
mod card;
mod config;
mod dom;
mod flip;
mod geometry;
mod render_loop;
mod scene;
mod tween;
mod viewer;
mod wasm_utils;

use wasm_bindgen::{prelude::wasm_bindgen, JsValue};

pub use animation::{Animator, FlipOutcome, FlipTask};
pub use camera::{canvas_size, OrthoCamera};
pub use card::{build_stack, Card, CardHandle, Transform};
pub use config::{BookConfig, CardDimensions, Color, ExtrudeSettings, InitialPose};
pub use flip::{flip_timeline, ControlState, Direction, FlipController, FlipPlan, PageState};
pub use geometry::{card_mesh, rounded_card, Mesh, Shape};
pub use tween::{Ease, Timeline};
pub use viewer::BookViewer;

// Use `wee_alloc` as the global allocator when the feature is enabled.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // register a panic hook that forwards Rust panics to JS console
    wasm_utils::set_panic_hook();
    log!("wasm-flipbook loaded, presets: {:?}", config::PRESETS);
    Ok(())
}
