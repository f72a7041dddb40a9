use serde::{Deserialize, Serialize};

use crate::auth::guard::resolve_staff;
use crate::auth::identity::{Identity, IdentityProvider};
use crate::auth::models::StaffUser;
use crate::db::models::Author;
use crate::db::repository::Repository;
use crate::error::AppError;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: StaffUser,
}

/// Check credentials and staff membership.
///
/// A valid credential without a staff profile is refused, so no session
/// is ever issued to a non-staff identity.
pub async fn process_login(
    identity: &dyn IdentityProvider,
    authors: &dyn Repository<Author>,
    request: &LoginRequest,
) -> Result<(Identity, StaffUser), AppError> {
    let account = identity
        .sign_in(request.email.trim(), &request.password)
        .await?;

    let author = authors.find_by_id(&account.uid).await?;
    let staff = resolve_staff(&account.uid, &account.email, author.as_ref())?;

    tracing::info!(uid = %staff.uid, role = %staff.role, "Signed in");
    Ok((account, staff))
}

#[cfg(feature = "ssr")]
mod handlers {
    use axum::extract::State;
    use axum::Json;
    use axum_extra::extract::CookieJar;

    use super::*;
    use crate::app::AppState;
    use crate::auth::session::removal_cookie;

    /// `POST /api/auth/login`: sets the `token` session cookie.
    pub async fn login_handler(
        State(state): State<AppState>,
        jar: CookieJar,
        Json(request): Json<LoginRequest>,
    ) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
        let (account, user) =
            process_login(state.identity.as_ref(), state.authors.as_ref(), &request).await?;

        let token = state.sessions.issue(&account)?;
        let jar = jar.add(state.sessions.session_cookie(token));

        Ok((
            jar,
            Json(LoginResponse {
                message: "Login successful".to_string(),
                user,
            }),
        ))
    }

    /// `GET /api/auth/me`
    pub async fn me_handler(staff: StaffUser) -> Json<StaffUser> {
        Json(staff)
    }

    /// `POST /api/auth/logout`
    pub async fn logout_handler(jar: CookieJar) -> CookieJar {
        jar.remove(removal_cookie())
    }
}

#[cfg(feature = "ssr")]
pub use handlers::*;
