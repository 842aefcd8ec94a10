//! Login page with email + password sign-in.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::error::ApiError;
use crate::net::types::{Credentials, CredentialsError};
use crate::state::session::Session;

/// Where a signed-in user lands.
pub const HOME_ROUTE: &str = "/";

pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<Credentials, &'static str> {
    Credentials::new(email, password).map_err(|e| match e {
        CredentialsError::MissingPassword => "Enter your password.",
        _ => "Enter a valid email address.",
    })
}

pub(crate) fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { detail: Some(detail), .. } if err.is_auth_rejection() => detail.clone(),
        _ if err.is_auth_rejection() => "Invalid email or password.".to_owned(),
        ApiError::Transport(_) => "Could not reach the server. Try again.".to_owned(),
        other => format!("Sign-in failed: {other}"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<Session>();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Leave as soon as the session is authenticated, whether from this form
    // or from the startup user fetch.
    let effect_session = session.clone();
    Effect::new(move || {
        if effect_session.is_authenticated() {
            navigate(HOME_ROUTE, NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_login_input(&email.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                match session.login(&credentials).await {
                    Ok(()) if session.is_authenticated() => info.set(String::new()),
                    Ok(()) => info.set("Signed in, but your account could not be loaded.".to_owned()),
                    Err(e) => info.set(login_error_message(&e)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&session, credentials);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign in"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
