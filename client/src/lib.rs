//! # client
//!
//! Leptos + WASM frontend for the job-application assistant.
//!
//! This crate contains pages, components, application state, the REST client,
//! and the websocket frame client. Frame decoding and dispatch live in the
//! `frames` crate so the CLI shares them.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: installs logging and hydrates the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        leptos::logging::warn!("console logger already set: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
