//! In-memory storage implementation for document stores.
//!
//! Documents are kept as BSON values in HashMaps behind async-safe read-write locks.

use std::{collections::{HashMap, HashSet}, sync::Arc, cmp::Ordering};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, oid::ObjectId};

use academia_store::{
    query::{Query, SortDirection},
    error::{DocumentStoreError, DocumentStoreResult},
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::{DocumentEvaluator, Comparable};

type CollectionMap = HashMap<ObjectId, Bson>;
type StoreMap = HashMap<String, CollectionMap>;
/// collection name -> fields carrying a unique index
type UniqueIndexMap = HashMap<String, HashSet<String>>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// Unique indexes are honoured: a write that would give two documents of a
/// collection the same non-null value for a uniquely indexed field fails with
/// [`DocumentStoreError::DuplicateKey`]. Queries scan the whole collection.
///
/// # Example
///
/// ```ignore
/// use academia_store_memory::InMemoryStore;
/// use academia_store::backend::StoreBackend;
/// use bson::{oid::ObjectId, Bson, doc};
///
/// let store = InMemoryStore::new();
/// let id = ObjectId::new();
/// store.insert_documents(vec![(id, Bson::Document(doc! { "_id": id }))], "cursos").await?;
/// assert_eq!(store.get_documents(vec![id], "cursos").await?.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
    unique_indexes: Arc<RwLock<UniqueIndexMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            unique_indexes: Arc::new(RwLock::new(UniqueIndexMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }

    /// Fails if `doc` collides with another document of the collection on a unique field.
    fn check_unique(
        collection_map: &CollectionMap,
        unique_fields: Option<&HashSet<String>>,
        id: &ObjectId,
        doc: &Bson,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        let Some(fields) = unique_fields else {
            return Ok(());
        };

        for field in fields {
            let value = Comparable::field_of(doc, field);
            if value == Comparable::Null {
                continue;
            }

            let taken = collection_map
                .iter()
                .any(|(other_id, other)| other_id != id && Comparable::field_of(other, field) == value);

            if taken {
                return Err(DocumentStoreError::DuplicateKey {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value: render_value(doc, field),
                });
            }
        }

        Ok(())
    }
}

fn render_value(doc: &Bson, field: &str) -> String {
    match doc.as_document().and_then(|d| d.get(field)) {
        Some(Bson::String(value)) => value.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(&self, documents: Vec<(ObjectId, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let indexes = self.unique_indexes.read().await;
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            if collection_map.contains_key(&id) {
                return Err(DocumentStoreError::DocumentAlreadyExists(id.to_hex(), collection.to_string()));
            }

            Self::check_unique(collection_map, indexes.get(collection), &id, &doc, collection)?;
            collection_map.insert(id, doc);
        }

        Ok(())
    }

    async fn update_documents(&self, documents: Vec<(ObjectId, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        let indexes = self.unique_indexes.read().await;
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            if !collection_map.contains_key(&id) {
                return Err(DocumentStoreError::DocumentNotFound(id.to_hex(), collection.to_string()));
            }

            Self::check_unique(collection_map, indexes.get(collection), &id, &doc, collection)?;
            collection_map.insert(id, doc);
        }

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Err(DocumentStoreError::DocumentNotFound(
                ids.first().map(|id| id.to_hex()).unwrap_or_default(),
                collection.to_string(),
            ));
        };

        for id in ids {
            if collection_map.remove(&id).is_none() {
                return Err(DocumentStoreError::DocumentNotFound(id.to_hex(), collection.to_string()));
            }
        }

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(vec![]);
        };

        Ok(
            ids.iter()
                .filter_map(|id| collection_map.get(id))
                .cloned()
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(vec![]);
        };

        let mut documents = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(
                collection_map.values(),
                filter,
            ),
            None => collection_map
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        if let Some(sort) = &query.sort {
            documents.sort_by(|a, b| {
                let left = Comparable::field_of(a, &sort.field);
                let right = Comparable::field_of(b, &sort.field);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });
        }

        Ok(documents)
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        // Only unique indexes change behaviour here; plain indexes are a no-op.
        if !unique {
            return Ok(());
        }

        let mut indexes = self.unique_indexes.write().await;
        let store = self.store.read().await;

        if let Some(collection_map) = store.get(collection) {
            let single = HashSet::from([field.to_string()]);
            for (id, doc) in collection_map {
                Self::check_unique(collection_map, Some(&single), id, doc, collection)?;
            }
        }

        indexes
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string());

        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
