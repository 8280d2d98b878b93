use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{matches_all, union_into, Document, DocumentStore, Predicate, Record};
use crate::{errors::StoreError, storage::json_map_store::JsonMapStore};

type Collection = HashMap<String, Record>;

/// Document store persisted to a single JSON file, keyed by collection name.
/// Same semantics as [`MemoryDocumentStore`](super::MemoryDocumentStore).
pub struct FileDocumentStore {
    inner: Arc<JsonMapStore<String, Collection>>,
}

impl FileDocumentStore {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        Ok(Self { inner: JsonMapStore::open(path).await? })
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Record, StoreError> {
        self.inner
            .read(|m| m.get(collection).and_then(|docs| docs.get(id)).cloned())
            .await
            .ok_or(StoreError::NotFound)
    }

    async fn query(&self, collection: &str, predicates: &[Predicate]) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .inner
            .read(|m| {
                m.get(collection)
                    .map(|docs| {
                        docs.iter()
                            .filter(|(_, data)| matches_all(data, predicates))
                            .map(|(id, data)| Document { id: id.clone(), data: data.clone() })
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .await)
    }

    async fn insert(&self, collection: &str, record: Record) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.inner
            .update(|m| {
                m.entry(collection.to_string()).or_default().insert(id.clone(), record);
                Ok(())
            })
            .await?;
        Ok(id)
    }

    async fn array_union(&self, collection: &str, id: &str, field: &str, value: Value) -> Result<(), StoreError> {
        self.inner
            .update(|m| {
                let record = m
                    .get_mut(collection)
                    .and_then(|docs| docs.get_mut(id))
                    .ok_or(StoreError::NotFound)?;
                union_into(record, field, value)
            })
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner
            .update(|m| {
                if let Some(docs) = m.get_mut(collection) {
                    docs.remove(id);
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn documents_survive_reopen() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("docs_{}.json", Uuid::new_v4()));
        let store = FileDocumentStore::open(&tmp).await?;
        let data = json!({"name": "foo", "images": []}).as_object().cloned().unwrap_or_default();
        let id = store.insert("businesses", data).await?;
        store.array_union("businesses", &id, "images", json!("k1")).await?;
        drop(store);

        let reopened = FileDocumentStore::open(&tmp).await?;
        let got = reopened.get("businesses", &id).await?;
        assert_eq!(got["images"], json!(["k1"]));
        assert_eq!(reopened.query("businesses", &[Predicate::field_eq("name", "foo")]).await?.len(), 1);

        reopened.delete("businesses", &id).await?;
        assert!(matches!(reopened.get("businesses", &id).await, Err(StoreError::NotFound)));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
