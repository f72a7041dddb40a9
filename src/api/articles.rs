use chrono::Utc;

use crate::auth::models::StaffUser;
use crate::db::models::{new_document_id, Article, ArticleInput};
use crate::db::repository::Repository;
use crate::error::AppError;
use crate::models::form::FormModel;
use crate::models::slug::resolve_slug;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Article '{id}' not found"))
}

/// All articles in store order.
pub async fn process_list_articles(
    repo: &dyn Repository<Article>,
) -> Result<Vec<Article>, AppError> {
    repo.list_all().await
}

pub async fn process_get_article(
    repo: &dyn Repository<Article>,
    id: &str,
) -> Result<Article, AppError> {
    repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
}

/// Create an article owned by the acting staff member.
pub async fn process_create_article(
    repo: &dyn Repository<Article>,
    actor: &StaffUser,
    input: ArticleInput,
) -> Result<Article, AppError> {
    input.check()?;

    let now = Utc::now();
    let article = Article {
        id: new_document_id(),
        slug: resolve_slug(&input.slug, &input.title),
        title: input.title,
        content: input.content,
        description: input.description,
        img: input.img,
        img_alt: input.img_alt,
        label: input.label,
        popularity: input.popularity,
        read: input.read,
        author_name: input.author_name,
        author_uid: actor.uid.clone(),
        created_at: now,
        date: now,
        published: input.published,
    };

    repo.insert(article.clone()).await?;
    tracing::info!(id = %article.id, slug = %article.slug, by = %actor.uid, "Article created");
    Ok(article)
}

/// Overwrite every editable field; `created_at` and `author_uid` are kept,
/// `date` is refreshed.
pub async fn process_update_article(
    repo: &dyn Repository<Article>,
    id: &str,
    input: ArticleInput,
) -> Result<Article, AppError> {
    input.check()?;

    let existing = repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    let article = Article {
        id: existing.id,
        slug: resolve_slug(&input.slug, &input.title),
        title: input.title,
        content: input.content,
        description: input.description,
        img: input.img,
        img_alt: input.img_alt,
        label: input.label,
        popularity: input.popularity,
        read: input.read,
        author_name: input.author_name,
        author_uid: existing.author_uid,
        created_at: existing.created_at,
        date: Utc::now(),
        published: input.published,
    };

    if !repo.replace(article.clone()).await? {
        return Err(not_found(id));
    }
    Ok(article)
}

pub async fn process_delete_article(
    repo: &dyn Repository<Article>,
    id: &str,
) -> Result<(), AppError> {
    if !repo.delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!(id = %id, "Article deleted");
    Ok(())
}

#[cfg(feature = "ssr")]
mod handlers {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;

    use super::*;
    use crate::app::AppState;

    /// `GET /api/v1/articles`
    pub async fn list_articles_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
    ) -> Result<Json<Vec<Article>>, AppError> {
        Ok(Json(process_list_articles(state.articles.as_ref()).await?))
    }

    /// `POST /api/v1/articles`
    pub async fn create_article_handler(
        State(state): State<AppState>,
        staff: StaffUser,
        Json(input): Json<ArticleInput>,
    ) -> Result<(StatusCode, Json<Article>), AppError> {
        let article = process_create_article(state.articles.as_ref(), &staff, input).await?;
        Ok((StatusCode::CREATED, Json(article)))
    }

    /// `GET /api/v1/articles/{id}`
    pub async fn get_article_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Path(id): Path<String>,
    ) -> Result<Json<Article>, AppError> {
        Ok(Json(process_get_article(state.articles.as_ref(), &id).await?))
    }

    /// `PUT /api/v1/articles/{id}`
    pub async fn update_article_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Path(id): Path<String>,
        Json(input): Json<ArticleInput>,
    ) -> Result<Json<Article>, AppError> {
        Ok(Json(
            process_update_article(state.articles.as_ref(), &id, input).await?,
        ))
    }

    /// `DELETE /api/v1/articles/{id}`
    pub async fn delete_article_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Path(id): Path<String>,
    ) -> Result<StatusCode, AppError> {
        process_delete_article(state.articles.as_ref(), &id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

#[cfg(feature = "ssr")]
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::db::memory::MemoryRepository;

    fn staff() -> StaffUser {
        StaffUser {
            uid: "uid-ada".into(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            role: Role::Manager,
        }
    }

    fn input(title: &str) -> ArticleInput {
        ArticleInput {
            title: title.into(),
            content: "# Body".into(),
            author_name: "Ada".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_owner() {
        let repo = MemoryRepository::new();
        let article = process_create_article(&repo, &staff(), input("Hello World"))
            .await
            .unwrap();

        assert_eq!(article.slug, "hello-world");
        assert_eq!(article.author_uid, "uid-ada");
        assert_eq!(article.created_at, article.date);
        assert_ne!(article.id, article.slug);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_slug() {
        let repo = MemoryRepository::new();
        let mut req = input("Hello World");
        req.slug = "custom".into();
        let article = process_create_article(&repo, &staff(), req).await.unwrap();
        assert_eq!(article.slug, "custom");
    }

    #[tokio::test]
    async fn test_create_without_author_is_rejected_before_write() {
        let repo = MemoryRepository::new();
        let req = ArticleInput {
            title: "Only a title".into(),
            ..Default::default()
        };
        let err = process_create_article(&repo, &staff(), req).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_owner() {
        let repo = MemoryRepository::new();
        let created = process_create_article(&repo, &staff(), input("First"))
            .await
            .unwrap();

        let mut req = input("Second");
        req.published = true;
        let updated = process_update_article(&repo, &created.id, req).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.author_uid, "uid-ada");
        assert!(updated.date >= created.date);
        assert_eq!(updated.slug, "second");
        assert!(updated.published);

        let stored = process_get_article(&repo, &created.id).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found() {
        let repo = MemoryRepository::new();
        assert!(matches!(
            process_get_article(&repo, "nope").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            process_update_article(&repo, "nope", input("x")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            process_delete_article(&repo, "nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MemoryRepository::new();
        let created = process_create_article(&repo, &staff(), input("Gone"))
            .await
            .unwrap();
        process_delete_article(&repo, &created.id).await.unwrap();
        assert!(process_list_articles(&repo).await.unwrap().is_empty());
    }
}
