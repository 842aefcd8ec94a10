//! Networking modules for the accounts API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the shared HTTP client and the endpoint calls, `csrf` is the
//! outgoing-request interceptor, `types` defines the wire schema, and `error`
//! is the single error type every call returns.

pub mod api;
pub mod csrf;
pub mod error;
pub mod types;
