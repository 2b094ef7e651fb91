//! MongoDB backend implementation for the academia store.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! It is the production backend of the service and works against an existing
//! database laid out as one collection per entity (`estudiantes`, `cursos`).
//!
//! # Features
//!
//! - **Persistent storage** - Documents keep their ObjectId as the MongoDB `_id`
//! - **Native filtering** - The store's query AST is translated to MongoDB filters
//! - **Unique indexes** - Duplicate-key write errors (code 11000) are reported as
//!   `DocumentStoreError::DuplicateKey`
//!
//! # Example
//!
//! ```ignore
//! use academia_store::backend::StoreBackendBuilder;
//! use academia_store_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "academia")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as academia_store_mongodb;

pub mod store;
pub mod query;
mod error;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
