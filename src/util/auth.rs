//! Route guard for protected pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes apply identical unauthenticated redirect behavior. The
//! check is a synchronous read of the session; it never calls the network and
//! never mutates the session. This is a UX gate only: the API still validates
//! every request.
//!
//! On a cold page load the session starts anonymous while `App` is still
//! fetching the user behind an existing session cookie. `StartupFetch` marks
//! that window so the redirect effect waits for the answer instead of
//! bouncing through `/login`. The session itself stays two-state.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::session::Session;

/// Where anonymous visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(&'static str),
}

/// Decide whether a protected navigation may proceed.
pub fn guard_decision(session: &Session) -> GuardDecision {
    if session.is_authenticated() {
        GuardDecision::Proceed
    } else {
        GuardDecision::Redirect(LOGIN_ROUTE)
    }
}

/// Run `enter` only when the session is authenticated; otherwise redirect and
/// cancel the navigation (`enter` is never called).
pub fn guard_navigation<T, N, E>(session: &Session, navigate: N, enter: E) -> Option<T>
where
    N: FnOnce(&str, NavigateOptions),
    E: FnOnce() -> T,
{
    match guard_decision(session) {
        GuardDecision::Proceed => Some(enter()),
        GuardDecision::Redirect(to) => {
            tracing::debug!(to, "guard redirecting anonymous visitor");
            navigate(to, NavigateOptions::default());
            None
        }
    }
}

/// Whether the mount-time user fetch is still in flight.
///
/// Provided through context by `App`; clones share one flag. The default is
/// settled, so pages mounted without it redirect immediately.
#[derive(Clone, Debug)]
pub struct StartupFetch(ArcRwSignal<bool>);

impl Default for StartupFetch {
    fn default() -> Self {
        Self(ArcRwSignal::new(false))
    }
}

impl StartupFetch {
    #[must_use]
    pub fn pending() -> Self {
        Self(ArcRwSignal::new(true))
    }

    #[must_use]
    pub fn settled() -> Self {
        Self::default()
    }

    /// Tracked.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.0.get()
    }

    pub fn finish(&self) {
        self.0.set(false);
    }
}

/// Redirect an anonymous session unless the startup fetch is still running.
/// Returns whether a redirect was issued.
pub fn redirect_if_settled<F>(session: &Session, startup: &StartupFetch, navigate: F) -> bool
where
    F: FnOnce(&str, NavigateOptions),
{
    if startup.is_pending() {
        return false;
    }
    guard_navigation(session, navigate, || ()).is_none()
}

/// Redirect to `/login` whenever the session is or becomes anonymous, once
/// the startup fetch has settled.
pub fn install_unauth_redirect<F>(session: Session, startup: StartupFetch, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        redirect_if_settled(&session, &startup, navigate.clone());
    });
}

/// Renders its children only while a user is signed in.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<Session>();
    let startup = use_context::<StartupFetch>().unwrap_or_default();
    install_unauth_redirect(session.clone(), startup, use_navigate());

    view! {
        <Show when=move || session.is_authenticated()>
            {children()}
        </Show>
    }
}
