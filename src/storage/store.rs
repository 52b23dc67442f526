//! The document store seam and its JSONL-backed implementation.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{Collection, CollectionFile, Query, StorageConfig, StorageError};
use crate::models::EntityId;

/// A document database with four collections.
///
/// Documents are JSON objects carrying their ID in an `id` field.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Documents matching the query, filtered, ordered and limited.
    async fn fetch_all(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Value>, StorageError>;

    /// A single document by ID.
    async fn get(&self, collection: Collection, id: &EntityId)
        -> Result<Option<Value>, StorageError>;

    /// Insert a document; the store assigns and returns a fresh ID.
    async fn add(&self, collection: Collection, record: Value) -> Result<EntityId, StorageError>;

    /// Shallow-merge `partial` into an existing document.
    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        partial: Value,
    ) -> Result<(), StorageError>;

    /// Remove a document. Removing a missing ID is not an error.
    async fn delete(&self, collection: Collection, id: &EntityId) -> Result<(), StorageError>;
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Store keeping one JSONL file per collection.
///
/// Writes take a process-wide lock and rewrite the file; there is no
/// cross-process locking, so the last writer wins.
pub struct JsonlStore {
    config: StorageConfig,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn file(&self, collection: Collection) -> CollectionFile {
        CollectionFile::open(&self.config, collection)
    }
}

#[async_trait]
impl DocumentStore for JsonlStore {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn fetch_all(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Value>, StorageError> {
        let docs = self.file(collection).load_filtered(|doc| query.matches(doc))?;
        Ok(query.finish(docs))
    }

    async fn get(
        &self,
        collection: Collection,
        id: &EntityId,
    ) -> Result<Option<Value>, StorageError> {
        let docs = self.file(collection).load()?;
        Ok(docs.into_iter().find(|d| doc_id(d) == Some(id.as_str())))
    }

    async fn add(&self, collection: Collection, record: Value) -> Result<EntityId, StorageError> {
        let Value::Object(mut fields) = record else {
            return Err(StorageError::InvalidRecord(format!(
                "{} documents must be JSON objects",
                collection
            )));
        };

        let id = EntityId::random();
        fields.insert("id".to_string(), Value::String(id.to_string()));

        let _guard = self.write_lock.lock().await;
        self.file(collection).append(&Value::Object(fields))?;

        info!("Added {} to {}", id, collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        partial: Value,
    ) -> Result<(), StorageError> {
        let Value::Object(changes) = partial else {
            return Err(StorageError::InvalidRecord(
                "partial update must be a JSON object".to_string(),
            ));
        };

        let _guard = self.write_lock.lock().await;
        let mut docs = self.file(collection).load()?;
        let doc = docs
            .iter_mut()
            .find(|d| doc_id(d) == Some(id.as_str()))
            .ok_or_else(|| StorageError::NotFound {
                collection: collection.name(),
                id: id.clone(),
            })?;

        if let Value::Object(fields) = doc {
            for (key, value) in changes {
                if key != "id" {
                    fields.insert(key, value);
                }
            }
        }

        self.file(collection).replace(&docs)?;
        info!("Updated {} in {}", id, collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &EntityId) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.file(collection).load()?;
        let before = docs.len();
        docs.retain(|d| doc_id(d) != Some(id.as_str()));

        if docs.len() == before {
            debug!("Delete of missing {} in {} ignored", id, collection);
            return Ok(());
        }

        self.file(collection).replace(&docs)?;
        info!("Deleted {} from {}", id, collection);
        Ok(())
    }
}
