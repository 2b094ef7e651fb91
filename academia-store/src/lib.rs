//! Document store layer for the academia service.
//!
//! This crate provides the storage seam the service is written against:
//!
//! - **Document traits** ([`document`]) - How a record names its id and collection and converts to BSON
//! - **Store backend abstraction** ([`backend`]) - Traits implemented by the in-memory and MongoDB backends
//! - **Query and filtering API** ([`query`]) - Filter expressions, sorting, and a visitor for backends
//! - **Collections interface** ([`collection`]) - Typed access to one collection
//! - **Document store** ([`store`]) - The process-wide handle shared by request handlers
//! - **Error handling** ([`error`]) - Store error and result types
//!
//! # Example
//!
//! ```ignore
//! use academia_store::{document::Document, store::DocumentStore};
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Room {
//!     #[serde(rename = "_id")]
//!     pub id: ObjectId,
//!     pub name: String,
//! }
//!
//! impl Document for Room {
//!     fn id(&self) -> &ObjectId {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "rooms"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as academia_store;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
