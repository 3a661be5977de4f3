//! Route table and admission decisions.

use std::fmt;

use patentwise_core::{Role, SessionState, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    Dashboard,
    Submit,
    Analysis(SubmissionId),
    Admin,
    /// Any path not in the table. Treated as public.
    NotFound(String),
}

/// Who may reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admit,
    Redirect(Route),
    /// The session is still being resolved; render nothing yet.
    Pending,
}

impl Route {
    /// Parse a request path. Query strings, fragments and a trailing slash
    /// are ignored. An empty path is the root; any other path must be absolute.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        if !path.is_empty() && !path.starts_with('/') {
            return Route::NotFound(path.to_string());
        }
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["dashboard"] => Route::Dashboard,
            ["submit"] => Route::Submit,
            ["admin"] => Route::Admin,
            ["analysis", id] if !id.is_empty() => Route::Analysis(SubmissionId::from(*id)),
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Login | Route::Signup | Route::NotFound(_) => Access::Public,
            Route::Dashboard | Route::Submit | Route::Analysis(_) => Access::Protected,
            Route::Admin => Access::Admin,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Login => "/login".into(),
            Route::Signup => "/signup".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Submit => "/submit".into(),
            Route::Analysis(id) => format!("/analysis/{id}"),
            Route::Admin => "/admin".into(),
            Route::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide whether `state` may enter `route`.
pub fn admit(route: &Route, state: &SessionState) -> Admission {
    match (route.access(), state) {
        (Access::Public, _) => Admission::Admit,
        (_, SessionState::Authenticating) => Admission::Pending,
        (_, SessionState::Unauthenticated) => Admission::Redirect(Route::Login),
        (Access::Protected, SessionState::Authenticated(_)) => Admission::Admit,
        (Access::Admin, SessionState::Authenticated(p)) => match p.role {
            Role::Admin => Admission::Admit,
            Role::Inventor | Role::Analyst => Admission::Redirect(Route::Dashboard),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentwise_core::{Principal, UserId};

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Principal {
            user_id: UserId::from("u1"),
            email: "u1@example.com".into(),
            name: "U One".into(),
            role,
        })
    }

    #[test]
    fn parses_route_table() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/submit?step=2"), Route::Submit);
        assert_eq!(
            Route::parse("/analysis/42"),
            Route::Analysis(SubmissionId::from("42"))
        );
        assert_eq!(
            Route::parse("/analysis"),
            Route::NotFound("/analysis".into())
        );
        assert_eq!(
            Route::parse("/analysis/42/extra"),
            Route::NotFound("/analysis/42/extra".into())
        );
        assert_eq!(Route::parse("/nowhere"), Route::NotFound("/nowhere".into()));
    }

    #[test]
    fn relative_paths_are_not_routes() {
        for path in ["dashboard", "admin", "analysis/1", "login?next=/"] {
            assert!(matches!(Route::parse(path), Route::NotFound(_)), "{path:?}");
        }
        let anonymous = SessionState::Unauthenticated;
        assert_eq!(admit(&Route::parse("admin"), &anonymous), Admission::Admit);
        assert_eq!(Route::parse("admin").access(), Access::Public);
    }

    #[test]
    fn path_round_trips_known_routes() {
        for path in ["/", "/login", "/signup", "/dashboard", "/submit", "/admin", "/analysis/7"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn unauthenticated_protected_redirects_to_login() {
        let state = SessionState::Unauthenticated;
        assert_eq!(
            admit(&Route::Dashboard, &state),
            Admission::Redirect(Route::Login)
        );
        assert_eq!(admit(&Route::Admin, &state), Admission::Redirect(Route::Login));
        assert_eq!(admit(&Route::Login, &state), Admission::Admit);
    }

    #[test]
    fn non_admin_is_sent_to_dashboard() {
        for role in [Role::Inventor, Role::Analyst] {
            assert_eq!(
                admit(&Route::Admin, &signed_in(role)),
                Admission::Redirect(Route::Dashboard)
            );
            assert_eq!(admit(&Route::Submit, &signed_in(role)), Admission::Admit);
        }
        assert_eq!(admit(&Route::Admin, &signed_in(Role::Admin)), Admission::Admit);
    }

    #[test]
    fn authenticating_holds_gated_routes() {
        let state = SessionState::Authenticating;
        assert_eq!(admit(&Route::Dashboard, &state), Admission::Pending);
        assert_eq!(admit(&Route::Admin, &state), Admission::Pending);
        assert_eq!(admit(&Route::Home, &state), Admission::Admit);
        assert_eq!(
            admit(&Route::NotFound("/x".into()), &state),
            Admission::Admit
        );
    }
}
