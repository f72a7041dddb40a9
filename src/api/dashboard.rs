use serde::{Deserialize, Serialize};

use crate::db::models::{Article, Author, NewsItem};
use crate::db::repository::Repository;
use crate::error::AppError;

/// How many recent articles and news items the dashboard shows.
pub const LATEST_LIMIT: usize = 3;

/// Summary shown on the admin landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub article_count: u64,
    pub member_count: u64,
    pub news_count: u64,
    /// Newest first.
    pub latest_articles: Vec<Article>,
    /// Newest first.
    pub latest_news: Vec<NewsItem>,
}

pub async fn process_dashboard(
    articles: &dyn Repository<Article>,
    authors: &dyn Repository<Author>,
    news: &dyn Repository<NewsItem>,
) -> Result<DashboardSummary, AppError> {
    let (article_count, member_count, news_count, latest_articles, latest_news) = futures::try_join!(
        articles.count(),
        authors.count(),
        news.count(),
        articles.latest(LATEST_LIMIT),
        news.latest(LATEST_LIMIT),
    )?;

    Ok(DashboardSummary {
        article_count,
        member_count,
        news_count,
        latest_articles,
        latest_news,
    })
}

/// `GET /api/v1/dashboard`
#[cfg(feature = "ssr")]
pub async fn dashboard_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    _staff: crate::auth::models::StaffUser,
) -> Result<axum::Json<DashboardSummary>, AppError> {
    let summary = process_dashboard(
        state.articles.as_ref(),
        state.authors.as_ref(),
        state.news.as_ref(),
    )
    .await?;
    Ok(axum::Json(summary))
}
