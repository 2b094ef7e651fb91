//! The document store handle shared by the service.
//!
//! [`DocumentStore`] owns a type-erased backend so the concrete backend can be
//! chosen from configuration at startup.
//!
//! # Example
//!
//! ```ignore
//! use academia_store::store::DocumentStore;
//!
//! let store = DocumentStore::from_backend(backend);
//! let rooms = store.typed_collection::<Room>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

#[derive(Debug)]
pub struct DocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DocumentStore {
    /// Creates a new document store with the given backend trait object.
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    /// Creates a new document store that owns `backend`.
    pub fn from_backend<B: StoreBackend + 'static>(backend: B) -> Self {
        Self::new(Box::new(backend))
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<D: Document>(&self) -> TypedCollection<'_, D> {
        TypedCollection::new(D::collection_name().to_string(), &*self.backend)
    }

    /// Adds an index to a field in a collection.
    ///
    /// # Arguments
    ///
    /// * `collection` - The name of the collection
    /// * `field` - The field to index
    /// * `unique` - Whether the index should enforce uniqueness
    pub async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()> {
        self.backend
            .add_index(collection, field, unique)
            .await
    }

    /// Shuts down the store and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}
