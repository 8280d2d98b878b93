use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{matches_all, union_into, Document, DocumentStore, Predicate, Record};
use crate::errors::StoreError;

/// In-process document store. Collections are created on first insert.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Record>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Record, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn query(&self, collection: &str, predicates: &[Predicate]) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, data)| matches_all(data, predicates))
            .map(|(id, data)| Document { id: id.clone(), data: data.clone() })
            .collect())
    }

    async fn insert(&self, collection: &str, record: Record) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().insert(id.clone(), record);
        Ok(id)
    }

    async fn array_union(&self, collection: &str, id: &str, field: &str, value: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or(StoreError::NotFound)?;
        union_into(record, field, value)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        v.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn insert_get_delete() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        let id = store.insert("things", record(json!({"name": "a"}))).await?;
        assert!(!id.is_empty());
        assert_eq!(store.get("things", &id).await?["name"], "a");

        store.delete("things", &id).await?;
        assert!(matches!(store.get("things", &id).await, Err(StoreError::NotFound)));
        store.delete("things", &id).await?;
        store.delete("never-created", "x").await?;
        Ok(())
    }

    #[tokio::test]
    async fn collections_are_isolated() -> Result<(), anyhow::Error> {
        let store = MemoryDocumentStore::new();
        let id = store.insert("a", record(json!({"k": 1}))).await?;
        assert!(matches!(store.get("b", &id).await, Err(StoreError::NotFound)));
        assert!(store.query("b", &[]).await?.is_empty());
        assert_eq!(store.query("a", &[]).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn array_union_on_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let res = store.array_union("a", "nope", "images", json!("x")).await;
        assert!(matches!(res, Err(StoreError::NotFound)));
    }
}
