use serde::{Deserialize, Serialize};

use crate::api::team::apply_member_update;
use crate::auth::identity::IdentityProvider;
use crate::auth::models::StaffUser;
use crate::db::models::{Author, MemberInput};
use crate::db::repository::Repository;
use crate::error::AppError;
use crate::models::form::FormModel;

/// Request body for `POST /api/auth/password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub new_password: String,
}

fn missing_profile() -> AppError {
    AppError::NotFound("Your profile was not found".into())
}

/// The signed-in member's own profile.
pub async fn process_get_profile(
    authors: &dyn Repository<Author>,
    actor: &StaffUser,
) -> Result<Author, AppError> {
    authors
        .find_by_id(&actor.uid)
        .await?
        .ok_or_else(missing_profile)
}

/// Edit one's own profile. The role is never changed here.
pub async fn process_update_profile(
    authors: &dyn Repository<Author>,
    actor: &StaffUser,
    input: MemberInput,
) -> Result<Author, AppError> {
    input.check()?;

    let existing = process_get_profile(authors, actor).await?;
    let updated = apply_member_update(existing, input, false);
    if !authors.replace(updated.clone()).await? {
        return Err(missing_profile());
    }
    Ok(updated)
}

pub async fn process_change_password(
    identity: &dyn IdentityProvider,
    actor: &StaffUser,
    request: PasswordChange,
) -> Result<(), AppError> {
    if request.new_password.is_empty() {
        return Err(AppError::BadRequest("New password is required.".into()));
    }
    identity
        .update_password(&actor.uid, &request.new_password)
        .await?;
    tracing::info!(uid = %actor.uid, "Password changed");
    Ok(())
}

#[cfg(feature = "ssr")]
mod handlers {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;

    use super::*;
    use crate::app::AppState;

    /// `GET /api/v1/profile`
    pub async fn get_profile_handler(
        State(state): State<AppState>,
        staff: StaffUser,
    ) -> Result<Json<Author>, AppError> {
        Ok(Json(process_get_profile(state.authors.as_ref(), &staff).await?))
    }

    /// `PUT /api/v1/profile`
    pub async fn update_profile_handler(
        State(state): State<AppState>,
        staff: StaffUser,
        Json(input): Json<MemberInput>,
    ) -> Result<Json<Author>, AppError> {
        Ok(Json(
            process_update_profile(state.authors.as_ref(), &staff, input).await?,
        ))
    }

    /// `POST /api/auth/password`
    pub async fn change_password_handler(
        State(state): State<AppState>,
        staff: StaffUser,
        Json(request): Json<PasswordChange>,
    ) -> Result<StatusCode, AppError> {
        process_change_password(state.identity.as_ref(), &staff, request).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

#[cfg(feature = "ssr")]
pub use handlers::*;
