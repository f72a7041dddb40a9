use async_trait::async_trait;

use crate::db::models::StoredDocument;
use crate::error::AppError;

/// Repository trait for whole-document operations on one collection.
///
/// This trait allows swapping the database layer in tests and demo mode.
#[async_trait]
pub trait Repository<T: StoredDocument>: Send + Sync {
    /// Fetch the entire collection in store order.
    async fn list_all(&self) -> Result<Vec<T>, AppError>;

    /// Find a document by its id.
    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError>;

    /// Insert a new document.
    async fn insert(&self, doc: T) -> Result<(), AppError>;

    /// Overwrite an existing document (matched by id).
    ///
    /// Returns `false` if no document with that id exists.
    async fn replace(&self, doc: T) -> Result<bool, AppError>;

    /// Delete a document by id. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Number of documents in the collection.
    async fn count(&self) -> Result<u64, AppError>;

    /// The `limit` most recently created documents, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<T>, AppError>;
}

/// MongoDB implementation of the Repository.
///
/// This is only available when the `ssr` feature is enabled (i.e., server-side).
#[cfg(feature = "ssr")]
pub struct MongoRepository<T: StoredDocument> {
    collection: mongodb::Collection<T>,
}

#[cfg(feature = "ssr")]
impl<T: StoredDocument> MongoRepository<T> {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(T::COLLECTION),
        }
    }

    async fn collect(
        &self,
        filter: mongodb::bson::Document,
        options: Option<mongodb::options::FindOptions>,
    ) -> Result<Vec<T>, AppError> {
        use futures::TryStreamExt;

        let mut cursor = self
            .collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut documents = Vec::new();
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            documents.push(doc);
        }

        Ok(documents)
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl<T: StoredDocument> Repository<T> for MongoRepository<T> {
    async fn list_all(&self) -> Result<Vec<T>, AppError> {
        use mongodb::bson::doc;

        self.collect(doc! {}, None).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert(&self, doc: T) -> Result<(), AppError> {
        self.collection
            .insert_one(&doc)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn replace(&self, doc: T) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .replace_one(doc! { "_id": doc.id() }, &doc)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    async fn count(&self) -> Result<u64, AppError> {
        use mongodb::bson::doc;

        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn latest(&self, limit: usize) -> Result<Vec<T>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit as i64)
            .build();

        self.collect(doc! {}, Some(options)).await
    }
}
