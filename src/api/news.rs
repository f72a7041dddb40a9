use chrono::Utc;

use crate::db::models::{new_document_id, NewsInput, NewsItem};
use crate::db::repository::Repository;
use crate::error::AppError;
use crate::models::form::FormModel;

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("News item '{id}' not found"))
}

pub async fn process_list_news(repo: &dyn Repository<NewsItem>) -> Result<Vec<NewsItem>, AppError> {
    repo.list_all().await
}

pub async fn process_get_news(
    repo: &dyn Repository<NewsItem>,
    id: &str,
) -> Result<NewsItem, AppError> {
    repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
}

pub async fn process_create_news(
    repo: &dyn Repository<NewsItem>,
    input: NewsInput,
) -> Result<NewsItem, AppError> {
    input.check()?;

    let item = NewsItem {
        id: new_document_id(),
        title: input.title,
        created_at: Utc::now(),
    };
    repo.insert(item.clone()).await?;
    tracing::info!(id = %item.id, "News item created");
    Ok(item)
}

/// Replace the title; the original timestamp is kept.
pub async fn process_update_news(
    repo: &dyn Repository<NewsItem>,
    id: &str,
    input: NewsInput,
) -> Result<NewsItem, AppError> {
    input.check()?;

    let existing = repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    let item = NewsItem {
        title: input.title,
        ..existing
    };
    if !repo.replace(item.clone()).await? {
        return Err(not_found(id));
    }
    Ok(item)
}

pub async fn process_delete_news(repo: &dyn Repository<NewsItem>, id: &str) -> Result<(), AppError> {
    if !repo.delete(id).await? {
        return Err(not_found(id));
    }
    Ok(())
}

#[cfg(feature = "ssr")]
mod handlers {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;

    use super::*;
    use crate::app::AppState;
    use crate::auth::models::StaffUser;

    pub async fn list_news_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
    ) -> Result<Json<Vec<NewsItem>>, AppError> {
        Ok(Json(process_list_news(state.news.as_ref()).await?))
    }

    pub async fn create_news_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Json(input): Json<NewsInput>,
    ) -> Result<(StatusCode, Json<NewsItem>), AppError> {
        let item = process_create_news(state.news.as_ref(), input).await?;
        Ok((StatusCode::CREATED, Json(item)))
    }

    pub async fn get_news_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Path(id): Path<String>,
    ) -> Result<Json<NewsItem>, AppError> {
        Ok(Json(process_get_news(state.news.as_ref(), &id).await?))
    }

    pub async fn update_news_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Path(id): Path<String>,
        Json(input): Json<NewsInput>,
    ) -> Result<Json<NewsItem>, AppError> {
        Ok(Json(process_update_news(state.news.as_ref(), &id, input).await?))
    }

    pub async fn delete_news_handler(
        State(state): State<AppState>,
        _staff: StaffUser,
        Path(id): Path<String>,
    ) -> Result<StatusCode, AppError> {
        process_delete_news(state.news.as_ref(), &id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}

#[cfg(feature = "ssr")]
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryRepository;

    #[tokio::test]
    async fn test_create_requires_title() {
        let repo = MemoryRepository::new();
        let err = process_create_news(&repo, NewsInput { title: "  ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_edit_keeps_timestamp() {
        let repo = MemoryRepository::new();
        let created = process_create_news(&repo, NewsInput { title: "Launch".into() })
            .await
            .unwrap();

        let updated = process_update_news(&repo, &created.id, NewsInput { title: "Relaunch".into() })
            .await
            .unwrap();

        assert_eq!(updated.title, "Relaunch");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(process_get_news(&repo, &created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let repo: MemoryRepository<NewsItem> = MemoryRepository::new();
        assert!(matches!(
            process_delete_news(&repo, "ghost").await,
            Err(AppError::NotFound(_))
        ));
    }
}
