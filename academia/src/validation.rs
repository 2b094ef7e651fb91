//! Payload validation for student and course writes.
//!
//! Validation runs on the raw JSON body before anything touches the store and
//! stops at the first violated rule. Fields are checked in schema order, then
//! unknown keys are rejected. Messages name the offending key in quotes, for
//! example `"correo" must be a valid email`.

use std::sync::LazyLock;

use bson::oid::ObjectId;
use regex::Regex;
use serde_json::{Map, Value};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const STUDENT_KEYS: &[&str] = &["nombre", "correo", "cursos"];
const COURSE_KEYS: &[&str] = &["titulo", "descripcion"];

const OBJECT_ID_LEN: usize = 24;

/// A validated student payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    /// `None` when the payload has no `cursos` key.
    pub courses: Option<Vec<ObjectId>>,
}

/// A validated course payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseInput {
    pub title: String,
    pub description: Option<String>,
}

pub type ValidationResult<T> = Result<T, String>;

pub fn validate_student(payload: &Value) -> ValidationResult<StudentInput> {
    let fields = as_object(payload)?;

    let name = required_trimmed(fields, "nombre")?;
    let email = required_string(fields, "correo")?;
    if !EMAIL.is_match(&email) {
        return Err(r#""correo" must be a valid email"#.to_string());
    }
    let courses = match fields.get("cursos") {
        None => None,
        Some(value) => Some(object_ids(value, "cursos")?),
    };
    reject_unknown(fields, STUDENT_KEYS)?;

    Ok(StudentInput { name, email, courses })
}

pub fn validate_course(payload: &Value) -> ValidationResult<CourseInput> {
    let fields = as_object(payload)?;

    let title = required_trimmed(fields, "titulo")?;
    let description = match fields.get("descripcion") {
        None => None,
        Some(value) => Some(trimmed(value, "descripcion")?),
    };
    reject_unknown(fields, COURSE_KEYS)?;

    Ok(CourseInput { title, description })
}

fn as_object(payload: &Value) -> ValidationResult<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| r#""value" must be of type object"#.to_string())
}

fn required_string(fields: &Map<String, Value>, key: &str) -> ValidationResult<String> {
    let value = fields
        .get(key)
        .ok_or_else(|| format!(r#""{key}" is required"#))?;
    let text = value
        .as_str()
        .ok_or_else(|| format!(r#""{key}" must be a string"#))?;

    if text.is_empty() {
        return Err(format!(r#""{key}" is not allowed to be empty"#));
    }

    Ok(text.to_string())
}

fn required_trimmed(fields: &Map<String, Value>, key: &str) -> ValidationResult<String> {
    match fields.get(key) {
        Some(value) => trimmed(value, key),
        None => Err(format!(r#""{key}" is required"#)),
    }
}

/// Trims a string value; blank strings are rejected as empty.
fn trimmed(value: &Value, key: &str) -> ValidationResult<String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!(r#""{key}" must be a string"#))?
        .trim();

    if text.is_empty() {
        return Err(format!(r#""{key}" is not allowed to be empty"#));
    }

    Ok(text.to_string())
}

fn object_ids(value: &Value, key: &str) -> ValidationResult<Vec<ObjectId>> {
    let items = value
        .as_array()
        .ok_or_else(|| format!(r#""{key}" must be an array"#))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let label = format!("{key}[{index}]");
            let text = item
                .as_str()
                .ok_or_else(|| format!(r#""{label}" must be a string"#))?;

            if text.len() != OBJECT_ID_LEN {
                return Err(format!(
                    r#""{label}" length must be {OBJECT_ID_LEN} characters long"#
                ));
            }
            if !text.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!(r#""{label}" must only contain hexadecimal characters"#));
            }

            ObjectId::parse_str(text).map_err(|e| format!(r#""{label}" {e}"#))
        })
        .collect()
}

fn reject_unknown(fields: &Map<String, Value>, allowed: &[&str]) -> ValidationResult<()> {
    match fields.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(format!(r#""{key}" is not allowed"#)),
        None => Ok(()),
    }
}
