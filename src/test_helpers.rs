//! Shared fixtures for unit tests.

use std::sync::{Arc, Mutex};

use leptos_router::NavigateOptions;

use crate::net::api::AuthBackend;
use crate::net::error::ApiError;
use crate::net::types::{Credentials, LoginResponse, User};
use crate::state::session::Session;

pub fn user_a() -> User {
    User { id: 1, name: "A".to_owned(), email: "a@b.com".to_owned() }
}

pub fn creds() -> Credentials {
    Credentials::new("a@b.com", "x").unwrap()
}

pub fn rejected(status: u16) -> ApiError {
    ApiError::Status { status, detail: None }
}

/// Scripted [`AuthBackend`]. Each call pops the next scripted result; an
/// empty script falls back to login OK / user 401 / logout OK.
#[derive(Default)]
pub struct MockBackend {
    pub logins: Mutex<Vec<Result<LoginResponse, ApiError>>>,
    pub users: Mutex<Vec<Result<User, ApiError>>>,
    pub logouts: Mutex<Vec<Result<(), ApiError>>>,
    pub calls: Mutex<Vec<String>>,
    /// Yield to the executor inside each call so concurrent callers interleave.
    pub yield_inside: bool,
}

impl MockBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn maybe_yield(&self) {
        if self.yield_inside {
            tokio::task::yield_now().await;
        }
    }
}

fn pop<T>(script: &Mutex<Vec<T>>) -> Option<T> {
    let mut script = script.lock().unwrap();
    if script.is_empty() { None } else { Some(script.remove(0)) }
}

#[async_trait::async_trait]
impl AuthBackend for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.calls.lock().unwrap().push(format!("login {}", credentials.email()));
        self.maybe_yield().await;
        pop(&self.logins).unwrap_or_else(|| Ok(LoginResponse::default()))
    }

    async fn current_user(&self, bearer: Option<&str>) -> Result<User, ApiError> {
        self.calls.lock().unwrap().push(format!("user {}", bearer.unwrap_or("-")));
        self.maybe_yield().await;
        pop(&self.users).unwrap_or_else(|| Err(rejected(401)))
    }

    async fn logout(&self, bearer: Option<&str>) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("logout {}", bearer.unwrap_or("-")));
        self.maybe_yield().await;
        pop(&self.logouts).unwrap_or(Ok(()))
    }
}

pub fn session_with(backend: MockBackend) -> (Session, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    let session = Session::new(Arc::clone(&backend) as Arc<dyn AuthBackend>);
    (session, backend)
}

/// Records every path passed to `navigate`.
#[derive(Clone, Default)]
pub struct NavLog(Arc<Mutex<Vec<String>>>);

impl NavLog {
    pub fn navigator(&self) -> impl Fn(&str, NavigateOptions) + Clone + use<> {
        let log = Arc::clone(&self.0);
        move |path: &str, _opts: NavigateOptions| log.lock().unwrap().push(path.to_owned())
    }

    pub fn paths(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
