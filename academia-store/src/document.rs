//! Core traits for document representation and serialization.
//!
//! Every record kept in a store implements [`Document`]; [`DocumentExt`] adds the
//! BSON conversions backends work with.

use bson::{Bson, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::DocumentStoreResult;

/// Core trait that all documents stored in a document store must implement.
///
/// Every document carries an [`ObjectId`] and names the collection it lives in.
/// Documents are expected to serialize their id under `_id`, which is where
/// MongoDB keeps the primary key.
///
/// # Example
///
/// ```ignore
/// use academia_store::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Room {
///     #[serde(rename = "_id")]
///     pub id: ObjectId,
///     pub name: String,
/// }
///
/// impl Document for Room {
///     fn id(&self) -> &ObjectId {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "rooms"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's unique identifier.
    fn id(&self) -> &ObjectId;

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Room {
        #[serde(rename = "_id")]
        id: ObjectId,
        name: String,
    }

    impl Document for Room {
        fn id(&self) -> &ObjectId {
            &self.id
        }

        fn collection_name() -> &'static str {
            "rooms"
        }
    }

    #[test]
    fn test_id_is_stored_under_underscore_id() {
        let room = Room { id: ObjectId::new(), name: "A1".to_string() };
        let bson = room.to_bson().unwrap();
        let doc = bson.as_document().unwrap();

        assert_eq!(doc.get("_id"), Some(&Bson::ObjectId(room.id)));
        assert_eq!(Room::from_bson(bson).unwrap(), room);
    }

    #[test]
    fn test_from_bson_rejects_wrong_shape() {
        assert!(Room::from_bson(Bson::String("nope".to_string())).is_err());
    }
}
