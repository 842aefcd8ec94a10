//! Runtime configuration for the API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read once at startup and handed to [`crate::net::api::ApiClient::new`].
//! CSRF cookie/header names are fixed conventions in `net::csrf` and are not
//! part of this surface.

use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_API_ROOT: &str = "http://127.0.0.1:8000";

pub const API_ROOT_VAR: &str = "AUTH_API_ROOT";
pub const MEDIA_ROOT_VAR: &str = "AUTH_MEDIA_ROOT";
pub const REQUEST_TIMEOUT_VAR: &str = "AUTH_REQUEST_TIMEOUT_SECS";

/// Configuration could not be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A base address is not an absolute http(s) URL.
    #[error("invalid URL in {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },

    /// The request timeout is not a positive integer number of seconds.
    #[error("invalid {var}: {value}")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Backend origin, without the `/api` prefix.
    pub api_root: Url,
    /// Optional origin for media assets (audio files, covers).
    pub media_root: Option<Url>,
    /// Whole-request timeout. Native builds only; browsers ignore it.
    pub request_timeout: Option<Duration>,
}

impl AuthConfig {
    /// Config pointing at `api_root` with no media origin and no timeout.
    #[must_use]
    pub fn new(api_root: Url) -> Self {
        Self { api_root, media_root: None, request_timeout: None }
    }

    /// Build config from the process environment.
    ///
    /// Natively a `.env` file is loaded first if one exists.
    ///
    /// - `AUTH_API_ROOT`: default `http://127.0.0.1:8000`
    /// - `AUTH_MEDIA_ROOT`: unset by default
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: unset by default
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from values baked in at compile time. Browser builds have
    /// no process environment, so this is how they pick up overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value fails to parse.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let baked = match key {
                API_ROOT_VAR => option_env!("AUTH_API_ROOT"),
                MEDIA_ROOT_VAR => option_env!("AUTH_MEDIA_ROOT"),
                REQUEST_TIMEOUT_VAR => option_env!("AUTH_REQUEST_TIMEOUT_SECS"),
                _ => None,
            };
            baked.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_root = match non_empty(lookup(API_ROOT_VAR)) {
            Some(raw) => parse_root(API_ROOT_VAR, &raw)?,
            None => parse_root(API_ROOT_VAR, DEFAULT_API_ROOT)?,
        };
        let media_root = non_empty(lookup(MEDIA_ROOT_VAR))
            .map(|raw| parse_root(MEDIA_ROOT_VAR, &raw))
            .transpose()?;
        let request_timeout = non_empty(lookup(REQUEST_TIMEOUT_VAR))
            .map(|raw| parse_timeout(&raw))
            .transpose()?;

        Ok(Self { api_root, media_root, request_timeout })
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Parse a base address, trimming any trailing slash so paths can be joined
/// with a leading `/`.
fn parse_root(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl { var, value: raw.to_owned() };
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout { var: REQUEST_TIMEOUT_VAR, value: raw.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
