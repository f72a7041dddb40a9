use std::sync::RwLock;

use async_trait::async_trait;

use crate::db::models::StoredDocument;
use crate::db::repository::Repository;
use crate::error::AppError;

/// In-process repository backed by a vector.
///
/// Used in demo mode and unit tests. Insertion order is the "store order"
/// returned by `list_all`, mirroring a collection scan.
pub struct MemoryRepository<T> {
    documents: RwLock<Vec<T>>,
}

impl<T: StoredDocument> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }

    pub fn with_documents(documents: Vec<T>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    fn poisoned() -> AppError {
        AppError::Database(format!("{} store lock poisoned", T::COLLECTION))
    }
}

impl<T: StoredDocument> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: StoredDocument> Repository<T> for MemoryRepository<T> {
    async fn list_all(&self) -> Result<Vec<T>, AppError> {
        let docs = self.documents.read().map_err(|_| Self::poisoned())?;
        Ok(docs.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        let docs = self.documents.read().map_err(|_| Self::poisoned())?;
        Ok(docs.iter().find(|d| d.id() == id).cloned())
    }

    async fn insert(&self, doc: T) -> Result<(), AppError> {
        let mut docs = self.documents.write().map_err(|_| Self::poisoned())?;
        if docs.iter().any(|d| d.id() == doc.id()) {
            return Err(AppError::Database(format!(
                "duplicate id '{}' in {}",
                doc.id(),
                T::COLLECTION
            )));
        }
        docs.push(doc);
        Ok(())
    }

    async fn replace(&self, doc: T) -> Result<bool, AppError> {
        let mut docs = self.documents.write().map_err(|_| Self::poisoned())?;
        match docs.iter_mut().find(|d| d.id() == doc.id()) {
            Some(slot) => {
                *slot = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut docs = self.documents.write().map_err(|_| Self::poisoned())?;
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        Ok(docs.len() != before)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let docs = self.documents.read().map_err(|_| Self::poisoned())?;
        Ok(docs.len() as u64)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<T>, AppError> {
        let mut docs = self.list_all().await?;
        docs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        docs.truncate(limit);
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewsItem;
    use chrono::{Duration, Utc};

    fn news(id: &str, minutes_ago: i64) -> NewsItem {
        NewsItem {
            id: id.to_string(),
            title: format!("News {id}"),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_insert_find_delete() {
        let repo = MemoryRepository::new();
        repo.insert(news("n1", 0)).await.unwrap();

        assert!(repo.find_by_id("n1").await.unwrap().is_some());
        assert!(repo.delete("n1").await.unwrap());
        assert!(!repo.delete("n1").await.unwrap());
        assert!(repo.find_by_id("n1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let repo = MemoryRepository::new();
        repo.insert(news("n1", 0)).await.unwrap();
        assert!(repo.insert(news("n1", 1)).await.is_err());
    }

    #[tokio::test]
    async fn test_replace_missing_returns_false() {
        let repo: MemoryRepository<NewsItem> = MemoryRepository::new();
        assert!(!repo.replace(news("ghost", 0)).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_latest_orders_newest_first() {
        let repo = MemoryRepository::with_documents(vec![
            news("old", 30),
            news("newest", 1),
            news("mid", 10),
            news("older", 20),
        ]);

        let latest = repo.latest(3).await.unwrap();
        let ids: Vec<&str> = latest.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "mid", "older"]);
    }

    #[tokio::test]
    async fn test_list_all_keeps_store_order() {
        let repo = MemoryRepository::with_documents(vec![news("b", 1), news("a", 2)]);
        let ids: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
