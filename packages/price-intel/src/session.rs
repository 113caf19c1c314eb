//! Explicit session context.
//!
//! The token and user are carried by value instead of living in a
//! process-wide slot. The token is wrapped with `secrecy` so it never shows
//! up in logs or debug output.

use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token for backend calls.
pub struct AuthToken(SecretBox<str>);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the token. Only call this when building a request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for AuthToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for AuthToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AuthToken {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// Who is using the tool right now.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<AuthToken>,
    user: Option<User>,
}

impl Session {
    /// Session with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for a logged-in user.
    pub fn authenticated(token: impl Into<AuthToken>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Session holding a stored token that has not been checked yet.
    pub fn from_token(token: impl Into<AuthToken>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }

    /// Both a token and a user are present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

/// Result of checking a session against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<User>,
}

impl AuthStatus {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }
}
