//! In-memory document storage backend for the academia store.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and backs development
//! runs (`--backend memory`) and the service's tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Type-erased storage** - Stores documents as BSON keyed by ObjectId
//! - **Filtering and sorting** - Evaluates the store's query AST in process
//! - **Unique indexes** - Rejects duplicate values the way MongoDB does
//!
//! # Quick Start
//!
//! ```ignore
//! use academia_store::{backend::StoreBackendBuilder, store::DocumentStore};
//! use academia_store_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = InMemoryStore::builder().build().await.unwrap();
//!     let store = DocumentStore::from_backend(backend);
//!     store.add_index("estudiantes", "correo", true).await.unwrap();
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as academia_store_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
