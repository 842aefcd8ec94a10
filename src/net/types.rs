//! Wire types for the accounts API.
//!
//! DESIGN
//! ======
//! Request payloads are built from validated constructors so malformed input
//! is rejected before any request leaves the client.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// The authenticated principal as reported by `GET /api/user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Input rejected before reaching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("email is required")]
    MissingEmail,
    #[error("email address is malformed")]
    MalformedEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("name is required")]
    MissingName,
    #[error("token is required")]
    MissingToken,
}

/// Email + password pair for `POST /api/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validate and build credentials. The email is trimmed; the password is
    /// kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialsError`] for an empty/malformed email or an
    /// empty password.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(CredentialsError::MissingPassword);
        }
        Ok(Self { email, password: password.to_owned() })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Payload for `POST /api/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    name: String,
    email: String,
    password: String,
}

impl Registration {
    /// # Errors
    ///
    /// Returns a [`CredentialsError`] if any field is empty or the email is
    /// malformed.
    pub fn new(name: &str, email: &str, password: &str) -> Result<Self, CredentialsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsError::MissingName);
        }
        let credentials = Credentials::new(email, password)?;
        Ok(Self { name: name.to_owned(), email: credentials.email, password: credentials.password })
    }
}

/// Payload for `POST /api/request-password-reset/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordResetRequest {
    email: String,
}

impl PasswordResetRequest {
    /// # Errors
    ///
    /// Returns a [`CredentialsError`] if the email is empty or malformed.
    pub fn new(email: &str) -> Result<Self, CredentialsError> {
        Ok(Self { email: validate_email(email)? })
    }
}

/// Payload for `POST /api/reset-password/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    token: String,
    new_password: String,
}

impl PasswordReset {
    /// # Errors
    ///
    /// Returns a [`CredentialsError`] if the token or password is empty.
    pub fn new(token: &str, new_password: &str) -> Result<Self, CredentialsError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CredentialsError::MissingToken);
        }
        if new_password.is_empty() {
            return Err(CredentialsError::MissingPassword);
        }
        Ok(Self { token: token.to_owned(), new_password: new_password.to_owned() })
    }
}

/// Body of a successful login. Cookie-based backends send only `message`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

fn validate_email(raw: &str) -> Result<String, CredentialsError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(CredentialsError::MissingEmail);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_owned()),
        _ => Err(CredentialsError::MalformedEmail),
    }
}
