//! CSRF token interceptor for outgoing API requests.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend sets a `csrftoken` cookie and expects it echoed back in the
//! `X-CSRFToken` header on state-changing requests. Whether a cookie store is
//! reachable at all is decided at construction via [`CookieAccess`]: the
//! browser build reads `document.cookie`, server rendering has no store and
//! passes requests through untouched.
//!
//! TRADE-OFFS
//! ==========
//! The transform never fails a request. A missing, empty, duplicated, or
//! non-header-safe cookie just means no header is attached and the backend
//! decides.

#[cfg(test)]
#[path = "csrf_test.rs"]
mod tests;

use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue};

/// Cookie the backend stores the CSRF token in.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend reads the CSRF token from.
pub const CSRF_HEADER: &str = "X-CSRFToken";

fn csrf_header_name() -> HeaderName {
    HeaderName::from_static("x-csrftoken")
}

/// Something that can produce a `document.cookie`-style string
/// (`name=value; other=value`).
pub trait CookieSource: Send + Sync {
    fn cookie_string(&self) -> Option<String>;
}

/// Whether the running context can see a cookie store.
#[derive(Clone, Default)]
pub enum CookieAccess {
    /// Server rendering: no cookie store, requests pass through unchanged.
    #[default]
    None,
    /// Browser-like context with a readable cookie store.
    Source(Arc<dyn CookieSource>),
}

impl CookieAccess {
    pub fn source<S: CookieSource + 'static>(source: S) -> Self {
        Self::Source(Arc::new(source))
    }
}

impl std::fmt::Debug for CookieAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("CookieAccess::None"),
            Self::Source(_) => f.write_str("CookieAccess::Source(..)"),
        }
    }
}

/// Copies the CSRF cookie into the CSRF header.
#[derive(Clone, Debug, Default)]
pub struct CsrfInterceptor {
    access: CookieAccess,
}

impl CsrfInterceptor {
    #[must_use]
    pub fn new(access: CookieAccess) -> Self {
        Self { access }
    }

    /// The token that would be attached right now, if any.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        match &self.access {
            CookieAccess::None => None,
            CookieAccess::Source(source) => read_cookie(&source.cookie_string()?, CSRF_COOKIE),
        }
    }

    /// Attach the CSRF header to `request` when a token is available.
    /// Only headers are touched.
    pub fn apply(&self, request: &mut reqwest::Request) {
        let Some(token) = self.current_token() else {
            return;
        };
        match HeaderValue::from_str(&token) {
            Ok(value) => {
                tracing::debug!(url = %request.url(), "attaching CSRF header");
                request.headers_mut().insert(csrf_header_name(), value);
            }
            Err(_) => tracing::debug!("CSRF cookie is not a valid header value; skipping"),
        }
    }
}

/// Look up `name` in a `document.cookie`-style string.
///
/// Returns `None` when the cookie is absent, empty, or present more than
/// once, matching how browser helpers split on `"; name="`.
#[must_use]
pub fn read_cookie(raw: &str, name: &str) -> Option<String> {
    let haystack = format!("; {raw}");
    let needle = format!("; {name}=");
    let mut parts = haystack.split(needle.as_str()).skip(1);
    let tail = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let value = tail.split(';').next().unwrap_or_default();
    (!value.is_empty()).then(|| value.to_owned())
}

// =============================================================================
// COOKIE SOURCES
// =============================================================================

/// A fixed cookie string. Useful for SSR forwarding of an incoming request's
/// `Cookie` header, and for tests.
#[derive(Clone, Debug)]
pub struct StaticCookies(pub String);

impl CookieSource for StaticCookies {
    fn cookie_string(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// The native client's cookie jar, scoped to the API origin.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct JarCookies {
    jar: Arc<reqwest::cookie::Jar>,
    url: reqwest::Url,
}

#[cfg(not(target_arch = "wasm32"))]
impl JarCookies {
    #[must_use]
    pub fn new(jar: Arc<reqwest::cookie::Jar>, url: reqwest::Url) -> Self {
        Self { jar, url }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CookieSource for JarCookies {
    fn cookie_string(&self) -> Option<String> {
        use reqwest::cookie::CookieStore;

        let header = self.jar.cookies(&self.url)?;
        header.to_str().ok().map(str::to_owned)
    }
}

/// `document.cookie` in the browser.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

#[cfg(feature = "hydrate")]
impl CookieSource for DocumentCookies {
    fn cookie_string(&self) -> Option<String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let html = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
        html.cookie().ok()
    }
}
