//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::{AuthConfig, ConfigError};
use crate::net::api::ApiClient;
use crate::net::csrf::CookieAccess;
use crate::pages::{activation::ActivationPage, home::HomePage, login::LoginPage};
use crate::state::session::Session;
use crate::util::auth::{RequireAuth, StartupFetch};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

fn load_config() -> Result<AuthConfig, ConfigError> {
    #[cfg(target_arch = "wasm32")]
    {
        AuthConfig::from_build_env()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        AuthConfig::from_env()
    }
}

/// Browser builds read `document.cookie`; server rendering has no cookie store.
fn cookie_access() -> CookieAccess {
    #[cfg(feature = "hydrate")]
    {
        CookieAccess::source(crate::net::csrf::DocumentCookies)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        CookieAccess::None
    }
}

fn build_client() -> Result<ApiClient, String> {
    let config = load_config().map_err(|e| e.to_string())?;
    ApiClient::new(&config, cookie_access()).map_err(|e| e.to_string())
}

/// Root application component.
///
/// Builds the one API client and the one session for this page, provides both
/// via context, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let client = match build_client() {
        Ok(client) => client,
        Err(message) => {
            tracing::error!(%message, "API client setup failed");
            return view! { <p class="fatal-error">{message}</p> }.into_any();
        }
    };
    let session = Session::new(Arc::new(client.clone()));
    provide_context(client);
    provide_context(session.clone());

    #[cfg(feature = "hydrate")]
    {
        let startup = StartupFetch::pending();
        provide_context(startup.clone());
        leptos::task::spawn_local(async move {
            session.fetch_user().await;
            startup.finish();
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        provide_context(StartupFetch::settled());
        let _ = session;
    }

    view! {
        <Title text="Sign in"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("activation") view=ActivationPage/>
                <Route
                    path=StaticSegment("")
                    view=|| view! { <RequireAuth><HomePage/></RequireAuth> }
                />
            </Routes>
        </Router>
    }
    .into_any()
}
