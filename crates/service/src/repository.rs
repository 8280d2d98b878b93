use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::RepoError;
use crate::store::{DocumentStore, Predicate, Record};

/// A record type persisted through a [`Repository`].
///
/// The identifier lives in the record as `id` for callers, but is stripped
/// before storage and restored from the store on every read.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Used in not-found messages, e.g. `business not found`.
    const KIND: &'static str;

    /// Caller-supplied fields for a record that does not exist yet.
    type New: Send;

    /// Optional equality predicates accepted by `list`.
    type Filter: Send + Sync;

    fn from_new(new: Self::New) -> Self;

    fn set_id(&mut self, id: String);

    fn predicates(filter: &Self::Filter) -> Vec<Predicate>;
}

/// Entities carrying an append-only set of image URLs.
pub trait HasImages: Entity {
    const IMAGES_FIELD: &'static str = "images";

    fn images(&self) -> &[String];
}

/// CRUD over one collection of a [`DocumentStore`].
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    collection: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), collection: self.collection.clone(), _entity: PhantomData }
    }
}

impl<T: Entity> Repository<T> {
    /// Bind a repository to `collection`. Separate collections in one store
    /// never see each other's records.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::{Business, BusinessFilter, Category, NewBusiness};
    /// use service::{repository::Repository, store::MemoryDocumentStore};
    ///
    /// let repo: Repository<Business> = Repository::new(Arc::new(MemoryDocumentStore::new()), "businesses");
    /// let created = tokio_test::block_on(repo.create(NewBusiness {
    ///     name: "foo".into(),
    ///     category: Category::Pets,
    ///     user_id: "u1".into(),
    /// }))
    /// .unwrap();
    /// let all = tokio_test::block_on(repo.list(&BusinessFilter::default())).unwrap();
    /// assert_eq!(all, vec![created]);
    /// ```
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self { store, collection: collection.into(), _entity: PhantomData }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn get_by_id(&self, id: &str) -> Result<T, RepoError> {
        let data = self
            .store
            .get(&self.collection, id)
            .await
            .map_err(|e| RepoError::from_store(T::KIND, e))?;
        hydrate(id.to_string(), data)
    }

    #[instrument(skip(self, filter), fields(collection = %self.collection))]
    pub async fn list(&self, filter: &T::Filter) -> Result<Vec<T>, RepoError> {
        let predicates = T::predicates(filter);
        let docs = self
            .store
            .query(&self.collection, &predicates)
            .await
            .map_err(|e| RepoError::from_store(T::KIND, e))?;
        debug!(count = docs.len(), predicates = predicates.len(), "listed");
        docs.into_iter().map(|d| hydrate(d.id, d.data)).collect()
    }

    #[instrument(skip(self, new), fields(collection = %self.collection))]
    pub async fn create(&self, new: T::New) -> Result<T, RepoError> {
        let mut record = T::from_new(new);
        let data = dehydrate(&record)?;
        let id = self
            .store
            .insert(&self.collection, data)
            .await
            .map_err(|e| RepoError::from_store(T::KIND, e))?;
        debug!(%id, kind = T::KIND, "created");
        record.set_id(id);
        Ok(record)
    }

    /// Unconditional delete; an absent id is not an error.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn delete(&self, id: &str) -> Result<(), RepoError> {
        self.store
            .delete(&self.collection, id)
            .await
            .map_err(|e| RepoError::from_store(T::KIND, e))
    }
}

impl<T: HasImages> Repository<T> {
    /// Union `value` into the record's images. Deduplication is the store's job.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn append_image(&self, id: &str, value: &str) -> Result<(), RepoError> {
        self.store
            .array_union(&self.collection, id, T::IMAGES_FIELD, Value::String(value.to_string()))
            .await
            .map_err(|e| RepoError::from_store(T::KIND, e))
    }
}

fn dehydrate<T: Entity>(record: &T) -> Result<Record, RepoError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(mut data)) => {
            data.remove("id");
            Ok(data)
        }
        Ok(other) => Err(RepoError::Store(format!("{} is not an object: {other}", T::KIND))),
        Err(e) => Err(RepoError::Store(e.to_string())),
    }
}

fn hydrate<T: Entity>(id: String, mut data: Record) -> Result<T, RepoError> {
    data.insert("id".to_string(), Value::String(id));
    serde_json::from_value(Value::Object(data)).map_err(|e| RepoError::Store(format!("decode {}: {e}", T::KIND)))
}
