//! Deal Pipeline Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod error;
mod format;
mod guard;
mod interceptor;
mod logging;
mod models;
mod normalize;
mod notify;
mod routes;
mod session;
mod store;
mod validate;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    mount_to_body(App);
}
