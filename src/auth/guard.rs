use crate::auth::models::StaffUser;
use crate::db::models::Author;
use crate::error::AppError;

/// Why a request was refused at the staff boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// No valid session.
    SignedOut,
    /// Signed in, but no author profile with a recognized role.
    NoRole,
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::SignedOut => AppError::Auth("Not signed in".into()),
            AccessDenied::NoRole => AppError::Forbidden("Access Denied".into()),
        }
    }
}

/// Decide whether a signed-in identity is a staff member.
pub fn resolve_staff(
    uid: &str,
    email: &str,
    author: Option<&Author>,
) -> Result<StaffUser, AccessDenied> {
    let author = author.ok_or(AccessDenied::NoRole)?;
    let role = author.role.ok_or(AccessDenied::NoRole)?;

    Ok(StaffUser {
        uid: uid.to_string(),
        email: if author.email.is_empty() {
            email.to_string()
        } else {
            author.email.clone()
        },
        name: author.name.clone(),
        role,
    })
}

/// `/admin` and everything below it.
pub fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

#[cfg(feature = "ssr")]
mod server {
    use axum::extract::{FromRequestParts, Request, State};
    use axum::http::request::Parts;
    use axum::middleware::Next;
    use axum::response::{IntoResponse, Redirect, Response};
    use axum_extra::extract::CookieJar;

    use super::*;
    use crate::app::AppState;
    use crate::auth::session::SESSION_COOKIE;

    /// Resolve the staff member behind a request's session cookie.
    ///
    /// Runs on every request; nothing is cached.
    pub async fn authorize(state: &AppState, jar: &CookieJar) -> Result<StaffUser, AppError> {
        let cookie = jar.get(SESSION_COOKIE).ok_or(AccessDenied::SignedOut)?;
        let claims = state
            .sessions
            .verify(cookie.value())
            .map_err(|_| AccessDenied::SignedOut)?;

        let author = state.authors.find_by_id(&claims.sub).await?;
        let staff = resolve_staff(&claims.sub, &claims.email, author.as_ref()).inspect_err(|_| {
            tracing::warn!(uid = %claims.sub, "Signed-in user has no staff role");
        })?;

        Ok(staff)
    }

    /// Staff member for the current server function call.
    pub async fn current_staff() -> Result<StaffUser, leptos::prelude::ServerFnError> {
        let state = leptos::prelude::expect_context::<AppState>();
        let jar: CookieJar = leptos_axum::extract().await?;
        authorize(&state, &jar)
            .await
            .map_err(AppError::into_server_fn_error)
    }

    impl FromRequestParts<AppState> for StaffUser {
        type Rejection = AppError;

        async fn from_request_parts(
            parts: &mut Parts,
            state: &AppState,
        ) -> Result<Self, Self::Rejection> {
            let jar = CookieJar::from_headers(&parts.headers);
            authorize(state, &jar).await
        }
    }

    /// Redirect `/admin` requests without a valid session cookie to the
    /// login page before any page renders.
    pub async fn admin_edge_guard(
        State(state): State<AppState>,
        jar: CookieJar,
        request: Request,
        next: Next,
    ) -> Response {
        if !is_admin_path(request.uri().path()) {
            return next.run(request).await;
        }

        let valid = jar
            .get(SESSION_COOKIE)
            .is_some_and(|c| state.sessions.verify(c.value()).is_ok());

        if valid {
            next.run(request).await
        } else {
            Redirect::to("/auth/login").into_response()
        }
    }
}

#[cfg(feature = "ssr")]
pub use server::{admin_edge_guard, authorize, current_staff};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    fn author(role: Option<Role>) -> Author {
        Author {
            id: "uid-1".into(),
            uid: "uid-1".into(),
            email: "grace@example.com".into(),
            name: "Grace".into(),
            city: String::new(),
            job: String::new(),
            avatar: String::new(),
            avatar_alt: String::new(),
            biography: Default::default(),
            role,
            slug: "grace".into(),
            socials: Default::default(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_no_profile_is_denied() {
        assert_eq!(
            resolve_staff("uid-1", "x@example.com", None),
            Err(AccessDenied::NoRole)
        );
    }

    #[test]
    fn test_unrecognized_role_is_denied() {
        let a = author(None);
        assert_eq!(
            resolve_staff("uid-1", "x@example.com", Some(&a)),
            Err(AccessDenied::NoRole)
        );
    }

    #[test]
    fn test_each_role_is_allowed() {
        for role in Role::ALL {
            let a = author(Some(role));
            let staff = resolve_staff("uid-1", "x@example.com", Some(&a)).unwrap();
            assert_eq!(staff.role, role);
            assert_eq!(staff.name, "Grace");
            assert_eq!(staff.email, "grace@example.com");
        }
    }

    #[test]
    fn test_denials_map_to_status_errors() {
        assert!(matches!(AppError::from(AccessDenied::SignedOut), AppError::Auth(_)));
        assert!(matches!(AppError::from(AccessDenied::NoRole), AppError::Forbidden(_)));
    }

    #[test]
    fn test_admin_paths() {
        assert!(is_admin_path("/admin"));
        assert!(is_admin_path("/admin/articles/new"));
        assert!(!is_admin_path("/administrator"));
        assert!(!is_admin_path("/auth/login"));
        assert!(!is_admin_path("/api/v1/articles"));
    }
}
