//! REST client for the accounts API.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`ApiClient`] is built at startup and shared (clones share the same
//! connection pool and interceptor). Every request goes through
//! `ApiClient::send`, which applies the CSRF interceptor and maps non-2xx
//! statuses to [`ApiError::Status`].
//!
//! Browser builds send cookies cross-origin (`credentials: include`); native
//! builds keep their own cookie jar so server-set cookies round-trip the same
//! way.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here retries or swallows errors. Deciding what a failure means for
//! the session is `state::session`'s job.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::csrf::{CookieAccess, CsrfInterceptor};
use super::error::{ApiError, extract_detail};
use super::types::{
    Credentials, LoginResponse, MessageResponse, PasswordReset, PasswordResetRequest, Registration, User,
};
use crate::config::AuthConfig;

pub const LOGIN_PATH: &str = "/api/login";
pub const USER_PATH: &str = "/api/user";
pub const LOGOUT_PATH: &str = "/api/logout";
pub const REGISTER_PATH: &str = "/api/register";
pub const REQUEST_PASSWORD_RESET_PATH: &str = "/api/request-password-reset/";
pub const RESET_PASSWORD_PATH: &str = "/api/reset-password/";
pub const REFRESH_PATH: &str = "/api/refresh/";

/// Backend calls the session depends on. Enables mocking in tests.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AuthBackend: Send + Sync {
    /// Submit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 401/403 when the backend rejects the
    /// credentials, or any transport/decode error unchanged.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// Fetch the user the current cookies (or bearer token) belong to.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status, or a
    /// malformed body.
    async fn current_user(&self, bearer: Option<&str>) -> Result<User, ApiError>;

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    async fn logout(&self, bearer: Option<&str>) -> Result<(), ApiError>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    api_root: Url,
    media_root: Option<Url>,
    csrf: CsrfInterceptor,
}

impl ApiClient {
    /// Build the shared client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &AuthConfig, cookies: CookieAccess) -> Result<Self, ApiError> {
        #[allow(unused_mut)]
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.cookie_store(true);
            if let Some(timeout) = config.request_timeout {
                builder = builder.timeout(timeout);
            }
        }
        let http = builder.build().map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self::from_parts(http, config, cookies))
    }

    /// Native client whose CSRF source is its own cookie jar, so a token the
    /// backend sets is echoed back on later requests.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_cookie_jar(config: &AuthConfig) -> Result<Self, ApiError> {
        let jar = std::sync::Arc::new(reqwest::cookie::Jar::default());
        let mut builder = reqwest::Client::builder().cookie_provider(std::sync::Arc::clone(&jar));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let cookies = CookieAccess::source(super::csrf::JarCookies::new(jar, config.api_root.clone()));
        Ok(Self::from_parts(http, config, cookies))
    }

    fn from_parts(http: reqwest::Client, config: &AuthConfig, cookies: CookieAccess) -> Self {
        Self {
            http,
            api_root: config.api_root.clone(),
            media_root: config.media_root.clone(),
            csrf: CsrfInterceptor::new(cookies),
        }
    }

    /// Absolute URL for an API path, preserving any path prefix on the root.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the joined string does not parse.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        join_root(&self.api_root, path).ok_or_else(|| ApiError::InvalidUrl(path.to_owned()))
    }

    /// Absolute URL for a media asset, or `None` when no media root is set.
    #[must_use]
    pub fn media_url(&self, path: &str) -> Option<Url> {
        join_root(self.media_root.as_ref()?, path)
    }

    // =========================================================================
    // REQUEST PLUMBING
    // =========================================================================

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> Result<reqwest::RequestBuilder, ApiError> {
        let mut builder = self.http.request(method, self.url(path)?);
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Intercept, send, and reject non-2xx responses.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let mut request = builder.build().map_err(|e| ApiError::RequestBuild(e.to_string()))?;
        self.csrf.apply(&mut request);
        let method = request.method().clone();
        let url = request.url().path().to_owned();

        let resp = self.http.execute(request).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(%method, path = %url, status = status.as_u16(), "API request rejected");
        Err(ApiError::Status { status: status.as_u16(), detail: extract_detail(&body) })
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let body = resp.text().await?;
        decode_body(&body)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path, None)?.json(body);
        let resp = self.send(builder).await?;
        Self::read_json(resp).await
    }

    // =========================================================================
    // ACCOUNT ENDPOINTS
    // =========================================================================

    /// `POST /api/register`. The backend emails an activation link.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`].
    pub async fn register(&self, registration: &Registration) -> Result<MessageResponse, ApiError> {
        self.post_json(REGISTER_PATH, registration).await
    }

    /// `POST /api/request-password-reset/`. The backend answers the same way
    /// whether or not the account exists.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`].
    pub async fn request_password_reset(&self, request: &PasswordResetRequest) -> Result<MessageResponse, ApiError> {
        self.post_json(REQUEST_PASSWORD_RESET_PATH, request).await
    }

    /// `POST /api/reset-password/` with the token from the reset email.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`].
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<MessageResponse, ApiError> {
        self.post_json(RESET_PASSWORD_PATH, reset).await
    }

    /// `POST /api/refresh/`. Exchanges the refresh cookie for a new access
    /// cookie.
    ///
    /// # Errors
    ///
    /// Propagates any [`ApiError`]; 401/403 means the refresh cookie is gone
    /// or expired.
    pub async fn refresh(&self) -> Result<MessageResponse, ApiError> {
        let resp = self.send(self.request(Method::POST, REFRESH_PATH, None)?).await?;
        Self::read_json(resp).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl AuthBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.post_json(LOGIN_PATH, credentials).await
    }

    async fn current_user(&self, bearer: Option<&str>) -> Result<User, ApiError> {
        let resp = self.send(self.request(Method::GET, USER_PATH, bearer)?).await?;
        Self::read_json(resp).await
    }

    async fn logout(&self, bearer: Option<&str>) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, LOGOUT_PATH, bearer)?).await?;
        Ok(())
    }
}

/// Decode a success body. An empty body is read as `{}` so types whose fields
/// are all defaulted still decode from `204`-style responses.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn join_root(root: &Url, path: &str) -> Option<Url> {
    let base = root.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}")).ok()
}
