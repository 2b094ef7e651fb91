//! Student and course enrollment service.
//!
//! Students and courses live in two collections of a document store and point
//! at each other through their enrollment lists. The crate is layered the same
//! way requests flow through it:
//!
//! - **Validation** ([`validation`]) - Checks raw JSON payloads and trims text fields
//! - **Entity store** ([`repository`]) - Create, list, update and delete over a [`DocumentStore`](academia_store::store::DocumentStore)
//! - **Relationship manager** ([`enrollment`]) - Keeps both sides of an enrollment in step
//! - **HTTP handlers** ([`http`]) - The axum router mounted under `/api`
//! - **Seed loader** ([`seed`]) - Imports a JSON file of students and courses at startup
//! - **Configuration** ([`config`]) - Flags and environment variables for the binary
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use academia::{http::{router, AppState}, repository::Repository};
//! use academia_store::store::DocumentStore;
//! use academia_store_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repository = Repository::new(DocumentStore::from_backend(InMemoryStore::new()));
//!     repository.ensure_indexes().await?;
//!
//!     let app = router(AppState::new(Arc::new(repository)));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod enrollment;
pub mod error;
pub mod http;
pub mod model;
pub mod repository;
pub mod seed;
pub mod validation;
