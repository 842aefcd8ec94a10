//! # auth-client
//!
//! Client-side authentication layer for the Leptos frontend: a reactive
//! session holder, a route guard, and an HTTP client wrapper that echoes the
//! backend's CSRF cookie back as a header.
//!
//! `net` talks to the accounts API, `state` holds who is signed in, `util`
//! gates protected routes, and `app`/`pages` wire them into the router.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

/// Browser entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
