//! Typed access to a single collection.
//!
//! A [`TypedCollection`] borrows the store's backend and converts documents to
//! and from BSON on every call.
//!
//! # Example
//!
//! ```ignore
//! let rooms = store.typed_collection::<Room>();
//! rooms.insert(vec![Room { id: ObjectId::new(), name: "A1".to_string() }]).await?;
//! ```

use bson::{Bson, oid::ObjectId};
use std::marker::PhantomData;

use crate::{
    backend::DynStoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::Query,
};

#[derive(Debug)]
pub struct TypedCollection<'a, D: Document> {
    name: String,
    backend: &'a dyn DynStoreBackend,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> TypedCollection<'a, D> {
    pub(crate) fn new(name: String, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts new documents into the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or insertion fails.
    pub async fn insert(&self, documents: Vec<D>) -> DocumentStoreResult<()> {
        self.backend
            .insert_documents(Self::encode(documents)?, self.name())
            .await
    }

    /// Replaces existing documents in the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or update fails.
    pub async fn update(&self, documents: Vec<D>) -> DocumentStoreResult<()> {
        self.backend
            .update_documents(Self::encode(documents)?, self.name())
            .await
    }

    /// Deletes documents from the collection by their ids.
    pub async fn delete(&self, ids: Vec<ObjectId>) -> DocumentStoreResult<()> {
        self.backend
            .delete_documents(ids, self.name())
            .await
    }

    /// Retrieves documents from the collection by their ids.
    ///
    /// Ids that don't exist are omitted from the result.
    pub async fn get(&self, ids: Vec<ObjectId>) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .get_documents(ids, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect::<Result<Vec<D>, _>>()
    }

    /// Retrieves a single document by id, or `None` if it doesn't exist.
    pub async fn find(&self, id: ObjectId) -> DocumentStoreResult<Option<D>> {
        Ok(self
            .get(vec![id])
            .await?
            .into_iter()
            .next())
    }

    /// Queries documents in the collection using a structured query.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect::<Result<Vec<D>, _>>()
    }

    fn encode(documents: Vec<D>) -> DocumentStoreResult<Vec<(ObjectId, Bson)>> {
        documents
            .into_iter()
            .map(|d| {
                d.to_bson()
                    .map(|b| (*d.id(), b))
            })
            .collect()
    }
}
