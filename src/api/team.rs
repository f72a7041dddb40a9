use chrono::Utc;

use crate::auth::identity::IdentityProvider;
use crate::auth::models::{Role, StaffUser};
use crate::db::models::{Author, MemberInput, NewMemberInput};
use crate::db::repository::Repository;
use crate::error::AppError;
use crate::models::form::FormModel;
use crate::models::slug::resolve_slug;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Team member '{id}' not found"))
}

pub async fn process_list_members(authors: &dyn Repository<Author>) -> Result<Vec<Author>, AppError> {
    authors.list_all().await
}

pub async fn process_get_member(
    authors: &dyn Repository<Author>,
    id: &str,
) -> Result<Author, AppError> {
    authors.find_by_id(id).await?.ok_or_else(|| not_found(id))
}

/// Provision a credential, then write the profile keyed by its UID.
///
/// If the profile write fails the credential is deleted again.
pub async fn process_create_member(
    authors: &dyn Repository<Author>,
    identity: &dyn IdentityProvider,
    actor: &StaffUser,
    input: NewMemberInput,
) -> Result<Author, AppError> {
    if !actor.role.can_create_members() {
        return Err(AppError::Forbidden(
            "Only admins can create team members".into(),
        ));
    }
    input.check()?;
    let role = input
        .assigned_role()
        .ok_or_else(|| AppError::BadRequest("Role must be Admin or Manager.".into()))?;

    let account = identity.create_account(&input.email, &input.password).await?;

    let author = Author {
        id: account.uid.clone(),
        uid: account.uid.clone(),
        email: account.email,
        slug: resolve_slug(&input.slug, &input.name),
        name: input.name,
        city: input.city,
        job: input.job,
        avatar: String::new(),
        avatar_alt: String::new(),
        biography: Default::default(),
        role: Some(role),
        socials: Default::default(),
        created_at: Utc::now(),
    };

    if let Err(e) = authors.insert(author.clone()).await {
        tracing::error!(uid = %account.uid, error = %e, "Profile write failed, rolling back credential");
        if let Err(rollback) = identity.delete_account(&account.uid).await {
            tracing::error!(uid = %account.uid, error = %rollback, "Credential rollback failed");
        }
        return Err(e);
    }

    tracing::info!(uid = %author.uid, role = %role, by = %actor.uid, "Team member created");
    Ok(author)
}

/// Apply an edit to a stored profile. `role_editable` decides whether the
/// requested role is honoured; otherwise the stored role is kept silently.
pub fn apply_member_update(existing: Author, input: MemberInput, role_editable: bool) -> Author {
    let role = if role_editable {
        input.role.or(existing.role)
    } else {
        existing.role
    };

    Author {
        slug: resolve_slug(&input.slug, &input.name),
        name: input.name,
        city: input.city,
        job: input.job,
        avatar: input.avatar,
        avatar_alt: input.avatar_alt,
        biography: input.biography,
        socials: input.socials,
        role,
        ..existing
    }
}

pub async fn process_update_member(
    authors: &dyn Repository<Author>,
    actor: &StaffUser,
    id: &str,
    input: MemberInput,
) -> Result<Author, AppError> {
    input.check()?;

    let existing = authors.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    let previous_role = existing.role;
    let updated = apply_member_update(existing, input, actor.role.can_change_roles());

    if updated.role != previous_role {
        tracing::info!(uid = %updated.uid, by = %actor.uid, role = ?updated.role, "Role changed");
    }

    if !authors.replace(updated.clone()).await? {
        return Err(not_found(id));
    }
    Ok(updated)
}

/// Delete a profile and, best effort, its credential.
pub async fn process_delete_member(
    authors: &dyn Repository<Author>,
    identity: &dyn IdentityProvider,
    actor: &StaffUser,
    id: &str,
) -> Result<(), AppError> {
    if !actor.role.can_delete_members() {
        return Err(AppError::Forbidden(
            "Only super admins can delete team members".into(),
        ));
    }

    let existing = authors.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    if !authors.delete(id).await? {
        return Err(not_found(id));
    }

    if let Err(e) = identity.delete_account(&existing.uid).await {
        tracing::warn!(uid = %existing.uid, error = %e, "Profile deleted but credential removal failed");
    }

    tracing::info!(uid = %existing.uid, by = %actor.uid, "Team member deleted");
    Ok(())
}

/// Whether any stored profile holds the given role.
pub async fn has_member_with_role(
    authors: &dyn Repository<Author>,
    role: Role,
) -> Result<bool, AppError> {
    Ok(authors
        .list_all()
        .await?
        .iter()
        .any(|a| a.role == Some(role)))
}

#[cfg(feature = "ssr")]
mod handlers {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;

    use super::*;
    use crate::app::AppState;

    pub async fn list_members_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
    ) -> Result<Json<Vec<Author>>, AppError> {
        Ok(Json(process_list_members(state.authors.as_ref()).await?))
    }

    pub async fn create_member_handler(
        State(state): State<AppState>,
        staff: StaffUser,
        Json(input): Json<NewMemberInput>,
    ) -> Result<(StatusCode, Json<Author>), AppError> {
        let author = process_create_member(
            state.authors.as_ref(),
            state.identity.as_ref(),
            &staff,
            input,
        )
        .await?;
        Ok((StatusCode::CREATED, Json(author)))
    }

    pub async fn get_member_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Path(id): Path<String>,
    ) -> Result<Json<Author>, AppError> {
        Ok(Json(process_get_member(state.authors.as_ref(), &id).await?))
    }

    pub async fn update_member_handler(
        State(state): State<AppState>,
        staff: StaffUser,
        Path(id): Path<String>,
        Json(input): Json<MemberInput>,
    ) -> Result<Json<Author>, AppError> {
        Ok(Json(
            process_update_member(state.authors.as_ref(), &staff, &id, input).await?,
        ))
    }

    pub async fn delete_member_handler(
        State(state): State<AppState>,
        staff: StaffUser,
        Path(id): Path<String>,
    ) -> Result<StatusCode, AppError> {
        process_delete_member(state.authors.as_ref(), state.identity.as_ref(), &staff, &id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

#[cfg(feature = "ssr")]
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::{Identity, IdentityError, MockIdentityProvider};
    use crate::db::memory::MemoryRepository;
    use async_trait::async_trait;

    fn actor(role: Role) -> StaffUser {
        StaffUser {
            uid: format!("uid-{}", role.as_str()),
            email: format!("{}@example.com", role.as_str()),
            name: role.label().to_string(),
            role,
        }
    }

    fn new_member(role: &str) -> NewMemberInput {
        NewMemberInput {
            name: "Grace Hopper".into(),
            role: role.into(),
            email: "grace@example.com".into(),
            password: "secret1".into(),
            ..Default::default()
        }
    }

    fn stored(uid: &str, role: Role) -> Author {
        Author {
            id: uid.into(),
            uid: uid.into(),
            email: format!("{uid}@example.com"),
            name: "Linus".into(),
            city: "Helsinki".into(),
            job: "Maintainer".into(),
            avatar: String::new(),
            avatar_alt: String::new(),
            biography: Default::default(),
            role: Some(role),
            slug: "linus".into(),
            socials: Default::default(),
            created_at: Utc::now(),
        }
    }

    fn edit(name: &str, role: Option<Role>) -> MemberInput {
        MemberInput {
            name: name.into(),
            role,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_admin_creates_member_with_identity_uid() {
        let authors = MemoryRepository::new();
        let mut idp = MockIdentityProvider::new();
        idp.expect_create_account()
            .withf(|email, password| email == "grace@example.com" && password == "secret1")
            .times(1)
            .returning(|email, _| {
                Ok(Identity {
                    uid: "uid-grace".into(),
                    email: email.to_string(),
                })
            });

        let author = process_create_member(&authors, &idp, &actor(Role::Admin), new_member("manager"))
            .await
            .unwrap();

        assert_eq!(author.id, "uid-grace");
        assert_eq!(author.uid, "uid-grace");
        assert_eq!(author.role, Some(Role::Manager));
        assert_eq!(author.slug, "grace-hopper");
        assert!(authors.find_by_id("uid-grace").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_manager_cannot_create_member() {
        let authors = MemoryRepository::new();
        let mut idp = MockIdentityProvider::new();
        idp.expect_create_account().never();

        let err = process_create_member(&authors, &idp, &actor(Role::Manager), new_member("manager"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_super_role_cannot_be_assigned_on_create() {
        let authors = MemoryRepository::new();
        let mut idp = MockIdentityProvider::new();
        idp.expect_create_account().never();

        let err = process_create_member(&authors, &idp, &actor(Role::Super), new_member("super"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_identity_error_surfaces_friendly_message() {
        let authors = MemoryRepository::new();
        let mut idp = MockIdentityProvider::new();
        idp.expect_create_account()
            .returning(|_, _| Err(IdentityError::EmailExists));

        let err = process_create_member(&authors, &idp, &actor(Role::Super), new_member("admin"))
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "An account already exists with this email address."
        );
        assert_eq!(authors.count().await.unwrap(), 0);
    }

    /// A repository whose writes always fail.
    struct BrokenAuthors;

    #[async_trait]
    impl Repository<Author> for BrokenAuthors {
        async fn list_all(&self) -> Result<Vec<Author>, AppError> {
            Ok(vec![])
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<Author>, AppError> {
            Ok(None)
        }
        async fn insert(&self, _doc: Author) -> Result<(), AppError> {
            Err(AppError::Database("write refused".into()))
        }
        async fn replace(&self, _doc: Author) -> Result<bool, AppError> {
            Err(AppError::Database("write refused".into()))
        }
        async fn delete(&self, _id: &str) -> Result<bool, AppError> {
            Err(AppError::Database("write refused".into()))
        }
        async fn count(&self) -> Result<u64, AppError> {
            Ok(0)
        }
        async fn latest(&self, _limit: usize) -> Result<Vec<Author>, AppError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_failed_profile_write_rolls_back_credential() {
        let mut idp = MockIdentityProvider::new();
        idp.expect_create_account().returning(|email, _| {
            Ok(Identity {
                uid: "uid-orphan".into(),
                email: email.to_string(),
            })
        });
        idp.expect_delete_account()
            .withf(|uid| uid == "uid-orphan")
            .times(1)
            .returning(|_| Ok(()));

        let err = process_create_member(&BrokenAuthors, &idp, &actor(Role::Admin), new_member("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_admin_role_change_is_silently_ignored() {
        let authors = MemoryRepository::with_documents(vec![stored("uid-linus", Role::Manager)]);

        let updated = process_update_member(
            &authors,
            &actor(Role::Admin),
            "uid-linus",
            edit("Linus T.", Some(Role::Super)),
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Linus T.");
        assert_eq!(updated.role, Some(Role::Manager));
    }

    #[tokio::test]
    async fn test_super_can_change_role() {
        let authors = MemoryRepository::with_documents(vec![stored("uid-linus", Role::Manager)]);

        let updated = process_update_member(
            &authors,
            &actor(Role::Super),
            "uid-linus",
            edit("Linus", Some(Role::Admin)),
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Some(Role::Admin));

        // No role in the payload keeps the stored one.
        let kept = process_update_member(&authors, &actor(Role::Super), "uid-linus", edit("Linus", None))
            .await
            .unwrap();
        assert_eq!(kept.role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_update_preserves_identity_fields() {
        let original = stored("uid-linus", Role::Manager);
        let authors = MemoryRepository::with_documents(vec![original.clone()]);

        let updated = process_update_member(&authors, &actor(Role::Manager), "uid-linus", edit("Linus", None))
            .await
            .unwrap();

        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.email, original.email);
        assert_eq!(updated.uid, original.uid);
        assert_eq!(updated.city, "");
    }

    #[tokio::test]
    async fn test_update_requires_name() {
        let authors = MemoryRepository::with_documents(vec![stored("uid-linus", Role::Manager)]);
        let err = process_update_member(&authors, &actor(Role::Super), "uid-linus", edit("", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_only_super_deletes_and_credential_is_removed() {
        let authors = MemoryRepository::with_documents(vec![stored("uid-linus", Role::Manager)]);

        for role in [Role::Admin, Role::Manager] {
            let mut idp = MockIdentityProvider::new();
            idp.expect_delete_account().never();
            let err = process_delete_member(&authors, &idp, &actor(role), "uid-linus")
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)));
        }

        let mut idp = MockIdentityProvider::new();
        idp.expect_delete_account()
            .withf(|uid| uid == "uid-linus")
            .times(1)
            .returning(|_| Ok(()));
        process_delete_member(&authors, &idp, &actor(Role::Super), "uid-linus")
            .await
            .unwrap();
        assert_eq!(authors.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_credential_removal_fails() {
        let authors = MemoryRepository::with_documents(vec![stored("uid-linus", Role::Manager)]);
        let mut idp = MockIdentityProvider::new();
        idp.expect_delete_account()
            .returning(|_| Err(IdentityError::Unknown("HTTP 500".into())));

        process_delete_member(&authors, &idp, &actor(Role::Super), "uid-linus")
            .await
            .unwrap();
        assert_eq!(authors.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_has_member_with_role() {
        let authors = MemoryRepository::with_documents(vec![stored("uid-linus", Role::Manager)]);
        assert!(has_member_with_role(&authors, Role::Manager).await.unwrap());
        assert!(!has_member_with_role(&authors, Role::Super).await.unwrap());
    }
}
