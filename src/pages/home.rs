//! Authenticated landing page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `RequireAuth`, so a user is normally present; the view still
//! renders nothing for the user block if the session drops mid-render.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::Session;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<Session>();
    let navigate = use_navigate();
    let user = session.user_signal();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                if let Err(e) = session.logout(navigate).await {
                    tracing::debug!(code = e.error_code(), retryable = e.retryable(), "logout finished with backend error");
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&session, &navigate);
        }
    };

    view! {
        <div class="home-page">
            {move || {
                user.get()
                    .map(|u| {
                        view! {
                            <p class="home-user">
                                <span class="home-user__name">{u.name}</span>
                                <span class="home-user__email">{u.email}</span>
                            </p>
                        }
                    })
            }}
            <button class="logout-button" on:click=on_logout>
                "Log out"
            </button>
        </div>
    }
}
