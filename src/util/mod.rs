//! Utility helpers shared across pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Keeps navigation policy out of page components so it can be tested without
//! a browser.

pub mod auth;
