//! # pulse
//!
//! Leptos + WASM client for the Pulse realtime events dashboard.
//!
//! The app is a thin front over an external backend platform: email/password
//! auth, a protected dashboard showing a live row count for the `events`
//! table, and a websocket subscription that bumps the count on each insert.
//! All heavy lifting (session validation, change-feed delivery, counting)
//! happens on the platform; this crate contains pages, state, and the thin
//! gateway wrappers.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
