//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering. Built once in `app::App` and
//! provided through Leptos context; clones share the same signals.
//!
//! DESIGN
//! ======
//! The session is either anonymous (no user) or authenticated (user present).
//! `is_authenticated` is never stored: every read derives it from the user
//! signal, so the two cannot drift apart.
//!
//! `login`, `fetch_user` and `logout` are serialized on a per-session async
//! lock, so overlapping calls apply in call order rather than in network
//! completion order.
//!
//! ERROR HANDLING
//! ==============
//! Login failures propagate to the caller. A failed user fetch is logged and
//! resets the session to anonymous. Logout clears local state even when the
//! backend call fails, then reports that failure.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use futures::lock::Mutex;
use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::api::AuthBackend;
use crate::net::error::ApiError;
use crate::net::types::{Credentials, User};
use crate::util::auth::LOGIN_ROUTE;

#[derive(Clone)]
pub struct Session {
    backend: Arc<dyn AuthBackend>,
    user: ArcRwSignal<Option<User>>,
    token: ArcRwSignal<Option<String>>,
    op_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.get_untracked())
            .field("has_token", &self.token.with_untracked(Option::is_some))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Anonymous session backed by `backend`.
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            user: ArcRwSignal::new(None),
            token: ArcRwSignal::new(None),
            op_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The signed-in user, if any. Tracked: reactive readers re-run on change.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.user.get()
    }

    /// Read-only handle for views.
    #[must_use]
    pub fn user_signal(&self) -> ArcReadSignal<Option<User>> {
        self.user.read_only()
    }

    /// `true` iff a user is present. Tracked.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.with(Option::is_some)
    }

    /// Bearer token from the last login, if the backend issued one.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.token.get()
    }

    /// Submit credentials, replace the bearer token with whatever the backend
    /// issued (possibly none), then load the user.
    ///
    /// Returns `Ok(())` once the follow-up fetch has run. If that fetch fails
    /// the session ends up anonymous; check [`Session::is_authenticated`].
    ///
    /// # Errors
    ///
    /// Returns the backend's [`ApiError`] unchanged when login itself fails
    /// (rejection or transport). Session state is left as it was.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let _op = self.op_lock.lock().await;

        let resp = match self.backend.login(credentials).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::info!(email = credentials.email(), code = e.error_code(), "login rejected");
                return Err(e);
            }
        };
        tracing::info!(email = credentials.email(), bearer = resp.access_token.is_some(), "login accepted");
        // Always replace: a stale bearer shadows the new session cookie.
        self.token.set(resp.access_token);
        self.load_user().await;
        Ok(())
    }

    /// Refresh the current user from the backend. Failures never reach the
    /// caller; they leave the session anonymous.
    pub async fn fetch_user(&self) {
        let _op = self.op_lock.lock().await;
        self.load_user().await;
    }

    /// End the session on the backend, clear local state, and redirect to
    /// the login route.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`ApiError`] if the logout call failed. Local
    /// state is already cleared and the redirect already issued by then.
    pub async fn logout<F>(&self, navigate: F) -> Result<(), ApiError>
    where
        F: Fn(&str, NavigateOptions),
    {
        let result = {
            let _op = self.op_lock.lock().await;
            let bearer = self.token.get_untracked();
            let result = self.backend.logout(bearer.as_deref()).await;
            self.clear();
            result
        };
        match &result {
            Ok(()) => tracing::info!("logged out"),
            Err(e) => tracing::warn!(error = %e, "backend logout failed; local session cleared anyway"),
        }
        navigate(LOGIN_ROUTE, NavigateOptions::default());
        result
    }

    /// Drop local state without contacting the backend.
    pub fn reset(&self) {
        self.clear();
    }

    async fn load_user(&self) {
        let bearer = self.token.get_untracked();
        match self.backend.current_user(bearer.as_deref()).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "session user loaded");
                self.user.set(Some(user));
            }
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "failed to fetch user; session reset");
                self.clear();
            }
        }
    }

    fn clear(&self) {
        self.user.set(None);
        self.token.set(None);
    }
}
