//! Mapping of MongoDB driver errors onto store errors.
//!
//! Writes rejected by a unique index come back from the server as error code
//! 11000 with a message such as
//! `E11000 duplicate key error collection: academia.estudiantes index: correo_1 dup key: { correo: "ana@x.com" }`.
//! Those become [`DocumentStoreError::DuplicateKey`]; everything else is a
//! [`DocumentStoreError::Backend`].

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

use academia_store::error::DocumentStoreError;

const DUPLICATE_KEY_CODE: i32 = 11000;

pub(crate) fn map_error(err: MongoError, collection: &str) -> DocumentStoreError {
    match duplicate_key_message(&err) {
        Some(message) => {
            let (field, value) = parse_dup_key(message).unwrap_or_default();
            DocumentStoreError::DuplicateKey {
                collection: collection.to_string(),
                field,
                value,
            }
        }
        None => DocumentStoreError::Backend(err.to_string()),
    }
}

fn duplicate_key_message(err: &MongoError) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE => {
            Some(write.message.as_str())
        }
        ErrorKind::Command(command) if command.code == DUPLICATE_KEY_CODE => {
            Some(command.message.as_str())
        }
        _ => None,
    }
}

/// Pulls the field and value out of the `dup key: { field: value }` part of a message.
fn parse_dup_key(message: &str) -> Option<(String, String)> {
    let (_, rest) = message.split_once("dup key: {")?;
    let body = rest.trim_end().strip_suffix('}')?.trim();
    let (field, value) = body.split_once(':')?;

    Some((
        field.trim().to_string(),
        value.trim().trim_matches('"').to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dup_key_message() {
        let message = r#"E11000 duplicate key error collection: academia.estudiantes index: correo_1 dup key: { correo: "ana@x.com" }"#;

        assert_eq!(
            parse_dup_key(message),
            Some(("correo".to_string(), "ana@x.com".to_string()))
        );
    }

    #[test]
    fn test_parse_dup_key_without_key_section() {
        assert_eq!(parse_dup_key("E11000 duplicate key error"), None);
    }
}
