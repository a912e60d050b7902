//! Session resolution: who is signed in and which dashboard to show.

use crate::error::{ErrorKind, Result};
use crate::store::TokenStore;
use crate::token;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Student,
    #[default]
    None,
}

impl Role {
    pub fn parse(role: &str) -> Role {
        match role {
            "admin" => Role::Admin,
            "student" => Role::Student,
            "" => Role::None,
            other => {
                log::warn!("Unknown role {other:?} in token, treating as signed out");
                Role::None
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::None => "",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    /// Never fails: a missing or malformed token resolves to the empty
    /// session. Signature and expiry are not checked.
    pub fn resolve(token: Option<&str>) -> Session {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Session::default();
        };

        match token::decode_claims(token) {
            Ok(claims) => Session {
                username: claims.username,
                role: Role::parse(&claims.role),
            },
            Err(e) => {
                log::debug!("Ignoring unreadable token: {e}");
                Session::default()
            }
        }
    }
}

/// The token plus what it claims, handed to every view controller.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<String>,
    session: Session,
}

impl SessionContext {
    pub fn from_token(token: Option<String>) -> SessionContext {
        let token = token.filter(|t| !t.trim().is_empty());
        let session = Session::resolve(token.as_deref());
        SessionContext { token, session }
    }

    pub fn load(store: &impl TokenStore) -> Result<SessionContext> {
        Ok(SessionContext::from_token(store.load()?))
    }

    pub fn signed_out() -> SessionContext {
        SessionContext::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn username(&self) -> &str {
        &self.session.username
    }

    pub fn role(&self) -> Role {
        self.session.role
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Token for the `Authorization` header, or `Unauthenticated` so the
    /// caller can redirect to login instead of sending a doomed request.
    pub fn bearer(&self) -> Result<&str> {
        self.token()
            .ok_or_else(|| ErrorKind::Unauthenticated("No token stored".to_string()).into())
    }
}
