mod app;
mod components;
mod models;
mod services;
mod state;
mod utils;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run_app() {
    utils::set_panic_hook();
    yew::Renderer::<App>::new().render();
}
