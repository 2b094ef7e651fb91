//! Service errors and their HTTP mapping.
//!
//! Every failure reaches the client as a status code plus a plain-text message.

use academia_store::error::DocumentStoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const STUDENT_NOT_FOUND: &str = "Estudiante no encontrado";
pub const COURSE_NOT_FOUND: &str = "Curso no encontrado";
pub const ENROLLMENT_NOT_FOUND: &str = "Curso o estudiante no encontrado";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The payload failed validation; holds the first violated rule.
    #[error("{0}")]
    Validation(String),
    /// The request body could not be parsed as JSON.
    #[error("{0}")]
    MalformedBody(String),
    #[error("{0}")]
    NotFound(&'static str),
    /// A unique index rejected the write.
    #[error("{0}")]
    Duplicate(String),
    #[error(transparent)]
    Storage(DocumentStoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DocumentStoreError> for ApiError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::DuplicateKey { field, value, .. } => {
                ApiError::Duplicate(format!("Ya existe un registro con {field} {value}"))
            }
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Storage(err) => tracing::error!(error = %err, "storage failure"),
            ApiError::Duplicate(message) => tracing::info!(%message, "duplicate rejected"),
            _ => tracing::debug!(%status, message = %self, "request rejected"),
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MalformedBody("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound(COURSE_NOT_FOUND).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Duplicate("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Storage(DocumentStoreError::Backend("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_key_becomes_conflict() {
        let err = ApiError::from(DocumentStoreError::DuplicateKey {
            collection: "estudiantes".to_string(),
            field: "correo".to_string(),
            value: "ana@x.com".to_string(),
        });

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Ya existe un registro con correo ana@x.com");
    }

    #[test]
    fn test_storage_message_is_passed_through() {
        let err = ApiError::from(DocumentStoreError::Backend("connection refused".into()));
        assert_eq!(err.to_string(), "Backend error: connection refused");
    }
}
