//! Startup import of students and courses from a JSON file.
//!
//! The file has the shape `{"estudiantes": [...], "cursos": [...]}`. Every
//! record is validated like a POST body. Loading the same file again inserts
//! nothing new: students are skipped on a duplicate `correo` and courses when
//! one with the same `titulo` (and `descripcion`, if given) already exists.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
    error::ApiError,
    repository::Repository,
    validation::{validate_course, validate_student},
};

#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub estudiantes: Vec<Value>,
    #[serde(default)]
    pub cursos: Vec<Value>,
}

/// Counts of what a seed run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub students_added: usize,
    pub students_skipped: usize,
    pub courses_added: usize,
    pub courses_skipped: usize,
    /// Records that failed validation or could not be written.
    pub failed: usize,
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Could not read seed file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid seed file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads `path` and loads its records into `repository`.
pub async fn load_file(repository: &Repository, path: &Path) -> Result<SeedReport, SeedError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read { path: path.to_path_buf(), source })?;
    let file = serde_json::from_str::<SeedFile>(&contents)
        .map_err(|source| SeedError::Parse { path: path.to_path_buf(), source })?;

    Ok(load(repository, file).await)
}

pub async fn load(repository: &Repository, file: SeedFile) -> SeedReport {
    let mut report = SeedReport::default();

    for record in &file.estudiantes {
        let input = match validate_student(record) {
            Ok(input) => input,
            Err(message) => {
                tracing::warn!(%message, "skipping invalid student");
                report.failed += 1;
                continue;
            }
        };
        let email = input.email.clone();

        match repository.create_student(input).await {
            Ok(_) => report.students_added += 1,
            Err(ApiError::Duplicate(_)) => {
                tracing::info!("El estudiante con correo {email} ya existe.");
                report.students_skipped += 1;
            }
            Err(err) => {
                tracing::error!(error = %err, correo = %email, "could not add student");
                report.failed += 1;
            }
        }
    }

    for record in &file.cursos {
        let input = match validate_course(record) {
            Ok(input) => input,
            Err(message) => {
                tracing::warn!(%message, "skipping invalid course");
                report.failed += 1;
                continue;
            }
        };

        match repository
            .find_course_by_title(&input.title, input.description.as_deref())
            .await
        {
            Ok(Some(_)) => {
                tracing::debug!(titulo = %input.title, "course already present");
                report.courses_skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(error = %err, titulo = %input.title, "could not look up course");
                report.failed += 1;
                continue;
            }
        }

        let title = input.title.clone();
        match repository.create_course(input).await {
            Ok(_) => report.courses_added += 1,
            Err(err) => {
                tracing::error!(error = %err, titulo = %title, "could not add course");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        students_added = report.students_added,
        students_skipped = report.students_skipped,
        courses_added = report.courses_added,
        courses_skipped = report.courses_skipped,
        failed = report.failed,
        "Datos cargados desde el archivo JSON."
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use academia_store::store::DocumentStore;
    use academia_store_memory::InMemoryStore;
    use std::io::Write;

    const DATA: &str = r#"{
        "estudiantes": [
            { "nombre": "Ana", "correo": "ana@x.com" },
            { "nombre": "Ana Copia", "correo": "ana@x.com" },
            { "nombre": "", "correo": "sin-nombre@x.com" }
        ],
        "cursos": [
            { "titulo": "Math", "descripcion": "Algebra" },
            { "titulo": "History" }
        ]
    }"#;

    async fn repository() -> Repository {
        let repository = Repository::new(DocumentStore::from_backend(InMemoryStore::new()));
        repository.ensure_indexes().await.unwrap();
        repository
    }

    fn seed_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_file_counts_records() {
        let repository = repository().await;
        let file = seed_file(DATA);

        let report = load_file(&repository, file.path()).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                students_added: 1,
                students_skipped: 1,
                courses_added: 2,
                courses_skipped: 0,
                failed: 1,
            }
        );
        assert_eq!(repository.list_students().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_load_adds_nothing() {
        let repository = repository().await;
        let file = seed_file(DATA);

        load_file(&repository, file.path()).await.unwrap();
        let report = load_file(&repository, file.path()).await.unwrap();

        assert_eq!(report.students_added, 0);
        assert_eq!(report.students_skipped, 2);
        assert_eq!(report.courses_added, 0);
        assert_eq!(report.courses_skipped, 2);
        assert_eq!(repository.list_courses().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_sections_default_to_empty() {
        let repository = repository().await;
        let file = seed_file(r#"{ "cursos": [{ "titulo": "Math" }] }"#);

        let report = load_file(&repository, file.path()).await.unwrap();
        assert_eq!(report.courses_added, 1);
        assert_eq!(report.students_added, 0);
    }

    #[tokio::test]
    async fn test_unreadable_and_malformed_files() {
        let repository = repository().await;

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("data.json");
        assert!(matches!(
            load_file(&repository, &missing).await,
            Err(SeedError::Read { .. })
        ));

        let file = seed_file("{ not json");
        assert!(matches!(
            load_file(&repository, file.path()).await,
            Err(SeedError::Parse { .. })
        ));
    }
}
