use super::*;
use crate::net::types::LoginResponse;
use crate::test_helpers::{MockBackend, NavLog, creds, rejected, session_with, user_a};
use crate::util::auth::{GuardDecision, guard_decision};

fn assert_in_sync(session: &Session) {
    assert_eq!(session.is_authenticated(), session.current_user().is_some());
}

fn token_login() -> Result<LoginResponse, ApiError> {
    Ok(LoginResponse { access_token: Some("tok1".to_owned()), message: None })
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_session_is_anonymous() {
    let (session, backend) = session_with(MockBackend::default());
    assert!(!session.is_authenticated());
    assert_eq!(session.current_user(), None);
    assert_eq!(session.bearer_token(), None);
    assert!(backend.calls().is_empty());
}

// =============================================================
// login
// =============================================================

#[tokio::test]
async fn login_stores_token_then_loads_user() {
    let (session, backend) = session_with(MockBackend {
        logins: vec![token_login()].into(),
        users: vec![Ok(user_a())].into(),
        ..MockBackend::default()
    });

    session.login(&creds()).await.unwrap();

    assert_eq!(session.current_user(), Some(user_a()));
    assert!(session.is_authenticated());
    assert_eq!(session.bearer_token().as_deref(), Some("tok1"));
    assert_eq!(backend.calls(), vec!["login a@b.com", "user tok1"]);
}

#[tokio::test]
async fn login_without_token_relies_on_cookies() {
    let (session, backend) = session_with(MockBackend {
        users: vec![Ok(user_a())].into(),
        ..MockBackend::default()
    });

    session.login(&creds()).await.unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.bearer_token(), None);
    assert_eq!(backend.calls(), vec!["login a@b.com", "user -"]);
}

#[tokio::test]
async fn login_rejection_propagates_and_skips_fetch() {
    let (session, backend) = session_with(MockBackend {
        logins: vec![Err(rejected(403))].into(),
        ..MockBackend::default()
    });

    let err = session.login(&creds()).await.unwrap_err();

    assert!(err.is_auth_rejection());
    assert!(!session.is_authenticated());
    assert_eq!(backend.calls(), vec!["login a@b.com"]);
}

#[tokio::test]
async fn login_rejection_keeps_existing_session() {
    let (session, _backend) = session_with(MockBackend {
        logins: vec![Ok(LoginResponse::default()), Err(rejected(401))].into(),
        users: vec![Ok(user_a())].into(),
        ..MockBackend::default()
    });
    session.login(&creds()).await.unwrap();

    assert!(session.login(&creds()).await.is_err());
    assert_eq!(session.current_user(), Some(user_a()));
}

#[tokio::test]
async fn login_with_failed_fetch_ends_anonymous() {
    let (session, _backend) = session_with(MockBackend {
        logins: vec![token_login()].into(),
        users: vec![Err(rejected(500))].into(),
        ..MockBackend::default()
    });

    session.login(&creds()).await.unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(session.bearer_token(), None);
    assert_in_sync(&session);
}

#[tokio::test]
async fn relogin_without_token_drops_previous_bearer() {
    let user_b = User { id: 2, name: "B".to_owned(), email: "b@c.com".to_owned() };
    let (session, backend) = session_with(MockBackend {
        logins: vec![token_login(), Ok(LoginResponse::default())].into(),
        users: vec![Ok(user_a()), Ok(user_b.clone())].into(),
        ..MockBackend::default()
    });
    session.login(&creds()).await.unwrap();
    assert_eq!(session.bearer_token().as_deref(), Some("tok1"));

    session.login(&Credentials::new("b@c.com", "y").unwrap()).await.unwrap();

    assert_eq!(session.bearer_token(), None);
    assert_eq!(session.current_user(), Some(user_b));
    assert_eq!(
        backend.calls(),
        vec!["login a@b.com", "user tok1", "login b@c.com", "user -"]
    );
}

// =============================================================
// fetch_user
// =============================================================

#[tokio::test]
async fn fetch_user_replaces_user_wholesale() {
    let renamed = User { name: "Anna".to_owned(), ..user_a() };
    let (session, _backend) = session_with(MockBackend {
        users: vec![Ok(user_a()), Ok(renamed.clone())].into(),
        ..MockBackend::default()
    });

    session.fetch_user().await;
    assert_eq!(session.current_user(), Some(user_a()));
    session.fetch_user().await;
    assert_eq!(session.current_user(), Some(renamed));
}

#[tokio::test]
async fn fetch_user_failure_clears_user_and_token() {
    let (session, backend) = session_with(MockBackend {
        logins: vec![token_login()].into(),
        users: vec![Ok(user_a()), Err(rejected(401))].into(),
        ..MockBackend::default()
    });
    session.login(&creds()).await.unwrap();
    assert!(session.is_authenticated());

    session.fetch_user().await;

    assert_eq!(session.current_user(), None);
    assert_eq!(session.bearer_token(), None);
    assert!(!session.is_authenticated());
    assert_eq!(backend.calls().last().map(String::as_str), Some("user tok1"));
}

#[tokio::test]
async fn fetch_user_decode_failure_is_swallowed() {
    let (session, _backend) = session_with(MockBackend {
        users: vec![Err(ApiError::Decode("missing field `email`".to_owned()))].into(),
        ..MockBackend::default()
    });
    session.fetch_user().await;
    assert!(!session.is_authenticated());
}

// =============================================================
// logout
// =============================================================

#[tokio::test]
async fn logout_clears_and_redirects() {
    let (session, backend) = session_with(MockBackend {
        logins: vec![token_login()].into(),
        users: vec![Ok(user_a())].into(),
        ..MockBackend::default()
    });
    session.login(&creds()).await.unwrap();
    let nav = NavLog::default();

    session.logout(nav.navigator()).await.unwrap();

    assert_eq!(session.current_user(), None);
    assert_eq!(session.bearer_token(), None);
    assert_eq!(nav.paths(), vec![LOGIN_ROUTE]);
    assert_eq!(backend.calls().last().map(String::as_str), Some("logout tok1"));
    assert_eq!(guard_decision(&session), GuardDecision::Redirect(LOGIN_ROUTE));
}

#[tokio::test]
async fn logout_backend_failure_still_clears_and_redirects() {
    let (session, _backend) = session_with(MockBackend {
        users: vec![Ok(user_a())].into(),
        logouts: vec![Err(rejected(502))].into(),
        ..MockBackend::default()
    });
    session.fetch_user().await;
    let nav = NavLog::default();

    let err = session.logout(nav.navigator()).await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert!(!session.is_authenticated());
    assert_eq!(nav.paths(), vec![LOGIN_ROUTE]);
}

#[tokio::test]
async fn logout_when_anonymous_is_harmless() {
    let (session, _backend) = session_with(MockBackend::default());
    let nav = NavLog::default();
    session.logout(nav.navigator()).await.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(nav.paths(), vec![LOGIN_ROUTE]);
}

#[tokio::test]
async fn reset_clears_without_backend_call() {
    let (session, backend) = session_with(MockBackend {
        users: vec![Ok(user_a())].into(),
        ..MockBackend::default()
    });
    session.fetch_user().await;
    session.reset();
    assert!(!session.is_authenticated());
    assert_eq!(backend.calls(), vec!["user -"]);
}

// =============================================================
// Invariants
// =============================================================

#[tokio::test]
async fn authenticated_flag_tracks_user_through_sequence() {
    let (session, _backend) = session_with(MockBackend {
        logins: vec![token_login(), Err(rejected(403)), Ok(LoginResponse::default())].into(),
        users: vec![Ok(user_a()), Err(rejected(401)), Ok(user_a())].into(),
        logouts: vec![Err(rejected(500))].into(),
        ..MockBackend::default()
    });
    let nav = NavLog::default();

    assert_in_sync(&session);
    session.login(&creds()).await.unwrap();
    assert_in_sync(&session);
    session.fetch_user().await;
    assert_in_sync(&session);
    let _ = session.login(&creds()).await;
    assert_in_sync(&session);
    session.login(&creds()).await.unwrap();
    assert_in_sync(&session);
    assert!(session.is_authenticated());
    let _ = session.logout(nav.navigator()).await;
    assert_in_sync(&session);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn clones_share_state() {
    let (session, _backend) = session_with(MockBackend {
        users: vec![Ok(user_a())].into(),
        ..MockBackend::default()
    });
    let view_handle = session.clone();
    let signal = session.user_signal();

    session.fetch_user().await;

    assert!(view_handle.is_authenticated());
    assert_eq!(signal.get_untracked(), Some(user_a()));
}

#[tokio::test]
async fn overlapping_login_and_logout_apply_in_call_order() {
    let (session, backend) = session_with(MockBackend {
        logins: vec![token_login()].into(),
        users: vec![Ok(user_a())].into(),
        yield_inside: true,
        ..MockBackend::default()
    });
    let nav = NavLog::default();
    let creds = creds();

    let (login, logout) = futures::join!(session.login(&creds), session.logout(nav.navigator()));

    login.unwrap();
    logout.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(session.bearer_token(), None);
    assert_eq!(backend.calls(), vec!["login a@b.com", "user tok1", "logout tok1"]);
}
