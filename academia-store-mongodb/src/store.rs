use std::collections::HashSet;
use async_trait::async_trait;
use futures::{stream::iter, StreamExt, TryStreamExt};
use bson::{Document, Bson, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{ClientOptions, FindOptions, IndexOptions},
};
use academia_store::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Query, QueryVisitor, SortDirection},
};

use crate::{error::map_error, query::MongoQueryTranslator};


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    /// Unwraps the document and pins its `_id` to the id it is stored under.
    fn prepare_document(&self, id: &ObjectId, document: Bson) -> DocumentStoreResult<Document> {
        let mut document = match document {
            Bson::Document(document) => document,
            _ => return Err(DocumentStoreError::InvalidDocument("Expected document".into())),
        };
        document.insert("_id", *id);

        Ok(document)
    }

    async fn close(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(&self, documents: Vec<(ObjectId, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        // One insert per document so a unique-index rejection surfaces as a plain write error.
        iter(documents)
            .then(async |(id, doc)| {
                let document = self.prepare_document(&id, doc)?;
                self.get_collection(collection)
                    .insert_one(document)
                    .await
                    .map_err(|e| map_error(e, collection))
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn update_documents(&self, documents: Vec<(ObjectId, Bson)>, collection: &str) -> DocumentStoreResult<()> {
        iter(documents)
            .then(async |(id, doc)| {
                let document = self.prepare_document(&id, doc)?;
                let result = self.get_collection(collection)
                    .replace_one(doc! { "_id": id }, document)
                    .await
                    .map_err(|e| map_error(e, collection))?;

                if result.matched_count == 0 {
                    return Err(DocumentStoreError::DocumentNotFound(id.to_hex(), collection.to_string()));
                }

                Ok(())
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<ObjectId>, collection: &str) -> DocumentStoreResult<()> {
        let result = self.get_collection(collection)
            .delete_many(doc! { "_id": { "$in": ids.clone() } })
            .await
            .map_err(|e| map_error(e, collection))?;

        check_deleted(result.deleted_count, &ids, collection)
    }

    async fn get_documents(&self, ids: Vec<ObjectId>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        Ok(
            self.get_collection(collection)
                .find(doc! { "_id": { "$in": ids } })
                .await
                .map_err(|e| map_error(e, collection))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| map_error(e, collection))?
                .into_iter()
                .map(Bson::Document)
                .collect()
        )
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            })
        }

        Ok(
            self.get_collection(collection)
                .find(
                    if let Some(expr) = &query.filter {
                        MongoQueryTranslator.visit_expr(expr)?
                    } else {
                        doc! {}
                    },
                )
                .with_options(options)
                .await
                .map_err(|e| map_error(e, collection))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| map_error(e, collection))?
                .into_iter()
                .map(Bson::Document)
                .collect()
        )
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                    .unique(unique)
                    .build()
                )
                .build()
            )
            .await
            .map_err(|e| map_error(e, collection))?;

        Ok(())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.close().await
    }
}

/// Fails with `DocumentNotFound` when fewer documents were deleted than distinct ids requested.
fn check_deleted(deleted: u64, ids: &[ObjectId], collection: &str) -> DocumentStoreResult<()> {
    let requested = ids.iter().collect::<HashSet<_>>();

    if deleted < requested.len() as u64 {
        return Err(DocumentStoreError::DocumentNotFound(
            ids.iter().map(|id| id.to_hex()).collect::<Vec<_>>().join(", "),
            collection.to_string(),
        ));
    }

    Ok(())
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_document_pins_id() {
        // Client construction does not contact the server.
        let store = MongoDbStore::builder("mongodb://localhost:27017", "academia_test")
            .build()
            .await
            .unwrap();
        let id = ObjectId::new();

        let prepared = store
            .prepare_document(&id, Bson::Document(doc! { "_id": ObjectId::new(), "titulo": "Math" }))
            .unwrap();
        assert_eq!(prepared.get_object_id("_id").unwrap(), id);
        assert_eq!(prepared.get_str("titulo").unwrap(), "Math");

        assert!(store.prepare_document(&id, Bson::Int32(1)).is_err());
    }

    #[test]
    fn test_short_delete_is_not_found() {
        let (ana, luis) = (ObjectId::new(), ObjectId::new());

        assert!(check_deleted(2, &[ana, luis], "estudiantes").is_ok());
        assert!(check_deleted(1, &[ana, ana], "estudiantes").is_ok());

        let err = check_deleted(1, &[ana, luis], "estudiantes").unwrap_err();
        assert!(matches!(err, DocumentStoreError::DocumentNotFound(_, ref collection) if collection == "estudiantes"));
    }
}
