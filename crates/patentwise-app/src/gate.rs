//! Identity gate: owns the session state and answers admission questions.

use std::sync::Arc;

use std::fmt;

use patentwise_core::{Principal, Registration, Role, SessionState};
use patentwise_store::{SessionError, SessionProvider};
use thiserror::Error;
use tracing::{info, warn};

use crate::routes::{Admission, Route, admit};

#[derive(Debug, Error)]
pub enum GateError {
    #[error("sign-in is only possible while signed out")]
    AlreadySignedIn,
    #[error("session is still being resolved")]
    Unresolved,
    #[error("sign-in required")]
    SignInRequired,
    #[error("administrator role required")]
    AccessDenied,
    #[error(transparent)]
    Signup(#[from] SignupError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("the {0} role cannot be chosen at sign-up")]
    RoleNotSelectable(Role),
}

/// The sign-up page's fields. New accounts are inventors unless another
/// role is picked.
#[derive(Clone)]
pub struct SignupForm {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl SignupForm {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            role: Role::Inventor,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Check the form and turn it into a registration request. Admins are
    /// appointed from the admin console, never self-selected.
    pub fn validate(self) -> Result<Registration, SignupError> {
        let email = self.email.trim();
        let name = self.name.trim();
        if email.is_empty() {
            return Err(SignupError::Missing("email"));
        }
        if name.is_empty() {
            return Err(SignupError::Missing("name"));
        }
        if self.password.is_empty() {
            return Err(SignupError::Missing("password"));
        }
        if self.password != self.confirm_password {
            return Err(SignupError::PasswordMismatch);
        }
        match self.role {
            Role::Inventor | Role::Analyst => {}
            Role::Admin => return Err(SignupError::RoleNotSelectable(self.role)),
        }
        Ok(Registration {
            email: email.to_string(),
            name: name.to_string(),
            password: self.password,
            role: self.role,
        })
    }
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Session state for one client. Starts `Authenticating` until [`resolve`]
/// runs.
///
/// [`resolve`]: IdentityGate::resolve
pub struct IdentityGate {
    sessions: Arc<dyn SessionProvider>,
    state: SessionState,
}

impl IdentityGate {
    pub fn new(sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            sessions,
            state: SessionState::Authenticating,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.state.principal()
    }

    /// Look up the current session once. A missing session and a failed
    /// lookup both leave the gate `Unauthenticated`; later calls are no-ops.
    pub async fn resolve(&mut self) -> &SessionState {
        if self.state != SessionState::Authenticating {
            return &self.state;
        }
        self.state = match self.sessions.current_session().await {
            Ok(Some(principal)) => {
                info!(user = %principal.user_id, role = %principal.role, "session resolved");
                SessionState::Authenticated(principal)
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(e) => {
                warn!(error = %e, "session lookup failed, continuing signed out");
                SessionState::Unauthenticated
            }
        };
        &self.state
    }

    fn ensure_signed_out(&self) -> Result<(), GateError> {
        match self.state {
            SessionState::Unauthenticated => Ok(()),
            SessionState::Authenticating => Err(GateError::Unresolved),
            SessionState::Authenticated(_) => Err(GateError::AlreadySignedIn),
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Principal, GateError> {
        self.ensure_signed_out()?;
        let principal = self.sessions.sign_in(email, password).await?;
        info!(user = %principal.user_id, role = %principal.role, "signed in");
        self.state = SessionState::Authenticated(principal.clone());
        Ok(principal)
    }

    /// Register a new account and sign it in. Only accepted while signed out;
    /// the form is checked before anything is sent.
    pub async fn sign_up(&mut self, form: SignupForm) -> Result<Principal, GateError> {
        self.ensure_signed_out()?;
        let registration = form.validate()?;
        let principal = self.sessions.sign_up(&registration).await?;
        info!(user = %principal.user_id, role = %principal.role, "account created");
        self.state = SessionState::Authenticated(principal.clone());
        Ok(principal)
    }

    /// Always ends signed out, even if the provider call fails.
    pub async fn sign_out(&mut self) {
        if let Err(e) = self.sessions.sign_out().await {
            warn!(error = %e, "sign-out call failed, clearing local session anyway");
        }
        self.state = SessionState::Unauthenticated;
    }

    pub fn admit(&self, path: &str) -> Admission {
        admit(&Route::parse(path), &self.state)
    }

    /// The signed-in principal, or why there is none.
    pub fn require_principal(&self) -> Result<&Principal, GateError> {
        match &self.state {
            SessionState::Authenticated(p) => Ok(p),
            SessionState::Authenticating => Err(GateError::Unresolved),
            SessionState::Unauthenticated => Err(GateError::SignInRequired),
        }
    }

    /// The signed-in principal if it holds the admin role.
    pub fn require_admin(&self) -> Result<&Principal, GateError> {
        let principal = self.require_principal()?;
        match principal.role {
            Role::Admin => Ok(principal),
            Role::Inventor | Role::Analyst => Err(GateError::AccessDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentwise_store::{FIXTURE_PASSWORD, FixtureBackend};

    fn gate(backend: &FixtureBackend) -> IdentityGate {
        IdentityGate::new(Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn starts_authenticating_and_holds_routes() {
        let backend = FixtureBackend::seeded();
        let gate = gate(&backend);
        assert_eq!(gate.state(), &SessionState::Authenticating);
        assert_eq!(gate.admit("/dashboard"), Admission::Pending);
        assert_eq!(gate.admit("/"), Admission::Admit);
    }

    #[tokio::test]
    async fn no_session_resolves_unauthenticated() {
        let backend = FixtureBackend::seeded();
        let mut gate = gate(&backend);
        assert_eq!(gate.resolve().await, &SessionState::Unauthenticated);
        assert_eq!(gate.admit("/dashboard"), Admission::Redirect(Route::Login));
    }

    #[tokio::test]
    async fn lookup_failure_resolves_unauthenticated() {
        let backend = FixtureBackend::seeded();
        backend.set_session_failure(Some(SessionError::Unavailable("timeout".into())));
        let mut gate = gate(&backend);
        assert_eq!(gate.resolve().await, &SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn existing_session_is_picked_up_once() {
        let backend = FixtureBackend::seeded();
        let admin = backend
            .sign_in("admin@example.com", FIXTURE_PASSWORD)
            .await
            .unwrap();
        let mut gate = gate(&backend);
        assert_eq!(gate.resolve().await.role(), Some(Role::Admin));

        // A second resolve does not re-query.
        backend.set_session_failure(Some(SessionError::Unavailable("down".into())));
        assert_eq!(gate.resolve().await.principal(), Some(&admin));
        assert_eq!(gate.admit("/admin"), Admission::Admit);
    }

    #[tokio::test]
    async fn sign_in_and_out() {
        let backend = FixtureBackend::seeded();
        let mut gate = gate(&backend);
        assert!(matches!(
            gate.sign_in("inventor1@example.com", FIXTURE_PASSWORD).await,
            Err(GateError::Unresolved)
        ));

        gate.resolve().await;
        assert!(matches!(
            gate.sign_in("inventor1@example.com", "nope").await,
            Err(GateError::Session(SessionError::InvalidCredentials))
        ));
        assert_eq!(gate.state(), &SessionState::Unauthenticated);

        let principal = gate
            .sign_in("inventor1@example.com", FIXTURE_PASSWORD)
            .await
            .unwrap();
        assert_eq!(principal.role, Role::Inventor);
        assert_eq!(gate.admit("/admin"), Admission::Redirect(Route::Dashboard));
        assert!(matches!(gate.require_admin(), Err(GateError::AccessDenied)));
        assert!(matches!(
            gate.sign_in("inventor1@example.com", FIXTURE_PASSWORD).await,
            Err(GateError::AlreadySignedIn)
        ));

        gate.sign_out().await;
        assert_eq!(gate.state(), &SessionState::Unauthenticated);
        assert!(matches!(gate.require_principal(), Err(GateError::SignInRequired)));
        assert_eq!(backend.current_session().await.unwrap(), None);
    }

    #[test]
    fn signup_form_checks_fields() {
        let form = SignupForm::new("new@example.com", "New", "pw", "pw");
        assert_eq!(form.clone().validate().unwrap().role, Role::Inventor);
        assert_eq!(
            SignupForm::new("new@example.com", "New", "pw", "pW").validate(),
            Err(SignupError::PasswordMismatch)
        );
        assert_eq!(
            SignupForm::new(" ", "New", "pw", "pw").validate(),
            Err(SignupError::Missing("email"))
        );
        assert_eq!(
            form.clone().with_role(Role::Admin).validate(),
            Err(SignupError::RoleNotSelectable(Role::Admin))
        );
        assert_eq!(
            form.with_role(Role::Analyst).validate().unwrap().role,
            Role::Analyst
        );
    }

    #[tokio::test]
    async fn sign_up_only_while_signed_out() {
        let backend = FixtureBackend::seeded();
        let mut gate = gate(&backend);
        let form = || SignupForm::new("new@example.com", "New Inventor", "pw", "pw");
        assert!(matches!(gate.sign_up(form()).await, Err(GateError::Unresolved)));

        gate.resolve().await;
        assert!(matches!(
            gate.sign_up(SignupForm::new("new@example.com", "New", "pw", "other")).await,
            Err(GateError::Signup(SignupError::PasswordMismatch))
        ));
        assert!(matches!(
            gate.sign_up(SignupForm::new("admin@example.com", "Dup", "pw", "pw")).await,
            Err(GateError::Session(SessionError::Rejected(_)))
        ));
        assert_eq!(gate.state(), &SessionState::Unauthenticated);

        let principal = gate.sign_up(form()).await.unwrap();
        assert_eq!(principal.role, Role::Inventor);
        assert_eq!(gate.admit("/dashboard"), Admission::Admit);
        assert!(matches!(gate.sign_up(form()).await, Err(GateError::AlreadySignedIn)));
        assert_eq!(backend.current_session().await.unwrap(), Some(principal));
    }
}
