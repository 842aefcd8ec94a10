//! Landing page for email activation links.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend's verify-email endpoint activates the account and redirects
//! here with one of `?success=true`, `?already_active=true` or
//! `?error=<code>`. The page only reports the outcome; it never calls the API.

#[cfg(test)]
#[path = "activation_test.rs"]
mod activation_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use crate::util::auth::LOGIN_ROUTE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated,
    AlreadyActive,
    InvalidToken,
    UserNotFound,
    /// Unrecognized error code, kept for the log line.
    Failed(String),
    /// No token was supplied to the backend.
    Missing,
}

impl ActivationOutcome {
    /// Classify the redirect's query parameters. `error` wins over the
    /// success flags.
    #[must_use]
    pub fn from_query(success: Option<&str>, already_active: Option<&str>, error: Option<&str>) -> Self {
        match (error, success, already_active) {
            (Some("invalid_token"), ..) => Self::InvalidToken,
            (Some("user_not_found"), ..) => Self::UserNotFound,
            (Some(other), ..) => Self::Failed(other.to_owned()),
            (None, Some("true"), _) => Self::Activated,
            (None, _, Some("true")) => Self::AlreadyActive,
            _ => Self::Missing,
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Activated => "Your account is active. You can sign in now.",
            Self::AlreadyActive => "This account is already active. Sign in to continue.",
            Self::InvalidToken => "This activation link is invalid or has expired.",
            Self::UserNotFound => "No account matches this activation link.",
            Self::Failed(_) => "Activation failed. Try the link again.",
            Self::Missing => "The activation link is incomplete.",
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Activated | Self::AlreadyActive)
    }
}

#[component]
pub fn ActivationPage() -> impl IntoView {
    let query = use_query_map();
    let outcome = Memo::new(move |_| {
        query.with(|q| {
            ActivationOutcome::from_query(
                q.get_str("success"),
                q.get_str("already_active"),
                q.get_str("error"),
            )
        })
    });

    Effect::new(move || {
        let outcome = outcome.get();
        if !outcome.is_success() {
            tracing::warn!(?outcome, "account activation failed");
        }
    });

    view! {
        <div class="activation-page">
            <p
                class="activation-message"
                class:activation-error=move || !outcome.with(ActivationOutcome::is_success)
            >
                {move || outcome.with(ActivationOutcome::message)}
            </p>
            <A href=LOGIN_ROUTE>"Go to sign in"</A>
        </div>
    }
}
