//! Document store boundary.
//!
//! Records are schemaless JSON objects grouped into named collections. The
//! store assigns identifiers on insert and keeps them outside the record body.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::StoreError;

pub mod file;
pub mod memory;

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;

/// Body of a stored document, without its identifier.
pub type Record = Map<String, Value>;

/// A record together with the identifier the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Record,
}

/// Field equality predicate used by [`DocumentStore::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub value: Value,
}

impl Predicate {
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { field: field.into(), value: value.into() }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. Absence is `StoreError::NotFound`.
    async fn get(&self, collection: &str, id: &str) -> Result<Record, StoreError>;

    /// All documents matching every predicate. No predicates lists the collection.
    async fn query(&self, collection: &str, predicates: &[Predicate]) -> Result<Vec<Document>, StoreError>;

    /// Store a record under a fresh identifier and return it.
    async fn insert(&self, collection: &str, record: Record) -> Result<String, StoreError>;

    /// Add `value` to the array at `field` unless an equal element is present.
    /// A missing document is `StoreError::NotFound`.
    async fn array_union(&self, collection: &str, id: &str, field: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a document. Removing an absent id succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

pub(crate) fn matches_all(record: &Record, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| p.matches(record))
}

/// Array-union on a single record field. A missing or null field becomes a
/// one-element array; a non-array field is a backend error.
pub(crate) fn union_into(record: &mut Record, field: &str, value: Value) -> Result<(), StoreError> {
    let slot = record.entry(field.to_string()).or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => {
            if !items.contains(&value) {
                items.push(value);
            }
            Ok(())
        }
        _ => Err(StoreError::Backend(format!("field `{field}` is not an array"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn predicates_combine_with_and() {
        let r = record(json!({"clientId": "c1", "businessId": "google"}));
        assert!(matches_all(&r, &[]));
        assert!(matches_all(&r, &[Predicate::field_eq("businessId", "google")]));
        assert!(!matches_all(&r, &[Predicate::field_eq("businessId", "google"), Predicate::field_eq("clientId", "c2")]));
        assert!(!matches_all(&r, &[Predicate::field_eq("missing", "x")]));
    }

    #[test]
    fn union_skips_present_values() {
        let mut r = record(json!({"images": null}));
        union_into(&mut r, "images", json!("a")).unwrap();
        union_into(&mut r, "images", json!("a")).unwrap();
        union_into(&mut r, "images", json!("b")).unwrap();
        assert_eq!(r["images"], json!(["a", "b"]));
    }

    #[test]
    fn union_rejects_scalar_fields() {
        let mut r = record(json!({"name": "foo"}));
        assert!(matches!(union_into(&mut r, "name", json!("a")), Err(StoreError::Backend(_))));
    }
}
