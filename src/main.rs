//! Entity Desk Frontend Entry Point

mod browser;
mod commands;
mod context;
mod store;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

/// Lines kept for the activity panel
const LOG_CAPACITY: usize = 200;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger("EntityDesk", LOG_CAPACITY, log::LevelFilter::Debug) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }
    mount_to_body(App);
}
