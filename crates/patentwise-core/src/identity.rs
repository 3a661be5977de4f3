//! Identity model: who the current session belongs to and what role they hold.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Role carried by an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Inventor,
    Analyst,
    Admin,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inventor => "inventor",
            Self::Analyst => "analyst",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inventor" => Ok(Self::Inventor),
            "analyst" => Ok(Self::Analyst),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// The authenticated user behind a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Details for a self-service account. Serialized as the registration
/// request body.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Session lifecycle: starts `Authenticating`, resolves once, then moves
/// between `Unauthenticated` and `Authenticated` on sign-in/sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Authenticating,
    Unauthenticated,
    Authenticated(Principal),
}

impl SessionState {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(p) => Some(p),
            Self::Authenticating | Self::Unauthenticated => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.principal().map(|p| p.role)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// A user account as listed in the admin directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl UserAccount {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" inventor ".parse::<Role>(), Ok(Role::Inventor));
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn session_starts_authenticating() {
        let state = SessionState::default();
        assert_eq!(state, SessionState::Authenticating);
        assert!(state.principal().is_none());
        assert!(!state.is_authenticated());
    }

    #[test]
    fn authenticated_state_exposes_role() {
        let state = SessionState::Authenticated(Principal {
            user_id: UserId::from("u1"),
            email: "analyst1@example.com".into(),
            name: "Jane Analyst".into(),
            role: Role::Analyst,
        });
        assert_eq!(state.role(), Some(Role::Analyst));
        assert!(state.is_authenticated());
    }

    #[test]
    fn account_json_uses_lowercase_enums() {
        let json = r#"{"id":"4","email":"inventor2@example.com","name":"Bob Smith",
                       "role":"inventor","status":"inactive"}"#;
        let account: UserAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.status, UserStatus::Inactive);
        assert!(account.last_login.is_none());
        assert_eq!(account.principal().role, Role::Inventor);
    }

    #[test]
    fn registration_debug_hides_password() {
        let reg = Registration {
            email: "new@example.com".into(),
            password: "hunter2".into(),
            name: "New User".into(),
            role: Role::Inventor,
        };
        let shown = format!("{reg:?}");
        assert!(shown.contains("new@example.com"));
        assert!(!shown.contains("hunter2"));
    }
}
