//! # orchard-client
//!
//! Leptos + WASM storefront frontend for Orchard Market, an
//! agricultural-goods shop. This crate contains the pages, components,
//! application state, network types, and the real-time support-chat
//! gateway client.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
