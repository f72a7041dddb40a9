use chrono::{Duration, Utc};

use crate::api::team::has_member_with_role;
use crate::app::AppState;
use crate::auth::identity::IdentityProvider;
use crate::auth::models::Role;
use crate::config::Settings;
use crate::db::models::{new_document_id, Article, Author, Biography, NewsItem};
use crate::db::repository::Repository;
use crate::error::AppError;
use crate::models::slug::slugify;

pub const DEMO_SUPER_EMAIL: &str = "super@demo.lap.dev";
pub const DEMO_SUPER_PASSWORD: &str = "super-demo";

/// Create a credential and its profile with any role, super included.
///
/// This is the provisioning path for bootstrap and demo data; members added
/// through the panel go through `process_create_member` instead.
pub async fn provision_member(
    authors: &dyn Repository<Author>,
    identity: &dyn IdentityProvider,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Author, AppError> {
    let account = identity.create_account(email, password).await?;

    let author = Author {
        id: account.uid.clone(),
        uid: account.uid.clone(),
        email: account.email,
        name: name.to_string(),
        city: String::new(),
        job: String::new(),
        avatar: String::new(),
        avatar_alt: String::new(),
        biography: Biography::default(),
        role: Some(role),
        slug: slugify(name),
        socials: Default::default(),
        created_at: Utc::now(),
    };

    if let Err(e) = authors.insert(author.clone()).await {
        if let Err(rollback) = identity.delete_account(&account.uid).await {
            tracing::error!(uid = %account.uid, error = %rollback, "Failed to roll back credential");
        }
        return Err(e);
    }
    Ok(author)
}

/// Provision the configured super user unless one already exists.
pub async fn bootstrap_super(
    settings: &Settings,
    authors: &dyn Repository<Author>,
    identity: &dyn IdentityProvider,
) -> Result<(), AppError> {
    let Some((email, password)) = settings.bootstrap_credentials() else {
        return Ok(());
    };

    if has_member_with_role(authors, Role::Super).await? {
        tracing::info!("A super user already exists, skipping bootstrap.");
        return Ok(());
    }

    let author = provision_member(
        authors,
        identity,
        &settings.bootstrap.super_name,
        email,
        password,
        Role::Super,
    )
    .await?;
    tracing::info!(uid = %author.uid, email = %author.email, "Bootstrapped super user");
    Ok(())
}

/// Fill the in-memory stores with staff, posts and news for demo mode.
pub async fn seed_demo_data(state: &AppState) {
    tracing::info!("Starting demo data seeding...");

    let demo_members = [
        ("Sam Super", DEMO_SUPER_EMAIL, DEMO_SUPER_PASSWORD, Role::Super, "Milan", "Editor in chief"),
        ("Ada Admin", "admin@demo.lap.dev", "admin-demo", Role::Admin, "Turin", "Editor"),
        ("Max Manager", "manager@demo.lap.dev", "manager-demo", Role::Manager, "Rome", "Writer"),
    ];

    let mut super_user = None;
    for (name, email, password, role, city, job) in demo_members {
        match provision_member(
            state.authors.as_ref(),
            state.identity.as_ref(),
            name,
            email,
            password,
            role,
        )
        .await
        {
            Ok(author) => {
                let author = Author {
                    city: city.to_string(),
                    job: job.to_string(),
                    ..author
                };
                if let Err(e) = state.authors.replace(author.clone()).await {
                    tracing::error!("Failed to complete profile for '{}': {}", email, e);
                }
                tracing::info!("Created demo {} '{}'.", role, email);
                if role == Role::Super {
                    super_user = Some(author);
                }
            }
            Err(e) => tracing::error!("Failed to create demo user '{}': {}", email, e),
        }
    }

    let (author_name, author_uid) = super_user
        .map(|a| (a.name, a.uid))
        .unwrap_or_else(|| ("LAP Team".to_string(), String::new()));

    let demo_articles = [
        ("Welcome to the LAP blog", "News", "2 min", include_str!("../demo_data/welcome.md"), true, 3),
        ("Markdown cheat sheet", "Guide", "4 min", include_str!("../demo_data/markdown_guide.md"), true, 2),
        ("Meet the team", "Team", "3 min", include_str!("../demo_data/team_update.md"), false, 1),
    ];

    let now = Utc::now();
    for (title, label, read, content, published, days_ago) in demo_articles {
        let created = now - Duration::days(days_ago);
        let article = Article {
            id: new_document_id(),
            title: title.to_string(),
            content: content.to_string(),
            description: content.lines().nth(2).unwrap_or_default().to_string(),
            img: String::new(),
            img_alt: String::new(),
            label: label.to_string(),
            popularity: published,
            read: read.to_string(),
            slug: slugify(title),
            author_name: author_name.clone(),
            author_uid: author_uid.clone(),
            created_at: created,
            date: created,
            published,
        };
        match state.articles.insert(article).await {
            Ok(()) => tracing::info!("Inserted demo article '{}'.", title),
            Err(e) => tracing::error!("Failed to insert demo article '{}': {}", title, e),
        }
    }

    let demo_news = [
        ("New editorial calendar published", 5),
        ("Team offsite in Turin", 2),
        ("Admin panel now supports Markdown preview", 0),
    ];
    for (title, days_ago) in demo_news {
        let item = NewsItem {
            id: new_document_id(),
            title: title.to_string(),
            created_at: now - Duration::days(days_ago),
        };
        if let Err(e) = state.news.insert(item).await {
            tracing::error!("Failed to insert demo news '{}': {}", title, e);
        }
    }

    tracing::info!("Demo data seeding completed.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::demo_auth::DemoIdentityProvider;
    use crate::auth::identity::{Identity, IdentityError, MockIdentityProvider};
    use crate::db::memory::MemoryRepository;
    use async_trait::async_trait;

    fn settings_with_bootstrap() -> Settings {
        Settings::from_toml(
            r#"
            [bootstrap]
            super_email = "root@example.com"
            super_password = "hunter22"
            super_name = "Root"
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_bootstrap_creates_super_once() {
        let authors = MemoryRepository::<Author>::new();
        let identity = DemoIdentityProvider::new();
        let settings = settings_with_bootstrap();

        bootstrap_super(&settings, &authors, &identity).await.unwrap();
        bootstrap_super(&settings, &authors, &identity).await.unwrap();

        let all = authors.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, Some(Role::Super));
        assert_eq!(all[0].name, "Root");
        assert_eq!(all[0].slug, "root");

        let signed_in = identity.sign_in("root@example.com", "hunter22").await.unwrap();
        assert_eq!(signed_in.uid, all[0].uid);
    }

    #[tokio::test]
    async fn test_bootstrap_without_credentials_is_noop() {
        let authors = MemoryRepository::<Author>::new();
        let identity = DemoIdentityProvider::new();
        let settings = Settings::from_toml("").unwrap();

        bootstrap_super(&settings, &authors, &identity).await.unwrap();
        assert_eq!(authors.count().await.unwrap(), 0);
    }

    struct RefusingAuthors;

    #[async_trait]
    impl Repository<Author> for RefusingAuthors {
        async fn list_all(&self) -> Result<Vec<Author>, AppError> {
            Ok(vec![])
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<Author>, AppError> {
            Ok(None)
        }
        async fn insert(&self, _doc: Author) -> Result<(), AppError> {
            Err(AppError::Database("insert refused".into()))
        }
        async fn replace(&self, _doc: Author) -> Result<bool, AppError> {
            Ok(false)
        }
        async fn delete(&self, _id: &str) -> Result<bool, AppError> {
            Ok(false)
        }
        async fn count(&self) -> Result<u64, AppError> {
            Ok(0)
        }
        async fn latest(&self, _limit: usize) -> Result<Vec<Author>, AppError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_failed_rollback_keeps_write_error() {
        let mut idp = MockIdentityProvider::new();
        idp.expect_create_account().returning(|email, _| {
            Ok(Identity {
                uid: "uid-stray".into(),
                email: email.to_string(),
            })
        });
        idp.expect_delete_account()
            .withf(|uid| uid == "uid-stray")
            .times(1)
            .returning(|_| Err(IdentityError::Unknown("backend offline".into())));

        let err = provision_member(
            &RefusingAuthors,
            &idp,
            "Stray",
            "stray@example.com",
            "password1",
            Role::Admin,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Database(ref m) if m == "insert refused"));
    }
}
