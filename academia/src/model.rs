//! Stored records and their JSON representations.
//!
//! [`Student`] and [`Course`] are what the store persists. Field names on disk
//! follow the existing `academia` database (`nombre`, `correo`, `cursos`, ...).
//! The `*Response`, `*View` and `*Summary` types are what the HTTP layer sends
//! back, with every [`ObjectId`] rendered as its 24-character hex string.

use std::collections::HashMap;

use academia_store::document::Document;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "cursos", default)]
    pub courses: Vec<ObjectId>,
}

impl Student {
    /// Records enrollment in `course`; an id already on the list is not added twice.
    pub fn add_course(&mut self, course: ObjectId) {
        if !self.courses.contains(&course) {
            self.courses.push(course);
        }
    }

    /// Drops every reference to `course`.
    pub fn remove_course(&mut self, course: ObjectId) {
        self.courses.retain(|id| *id != course);
    }
}

impl Document for Student {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn collection_name() -> &'static str {
        "estudiantes"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "estudiantes", default)]
    pub students: Vec<ObjectId>,
}

impl Course {
    /// Records `student` as enrolled; an id already on the list is not added twice.
    pub fn add_student(&mut self, student: ObjectId) {
        if !self.students.contains(&student) {
            self.students.push(student);
        }
    }

    /// Drops every reference to `student`.
    pub fn remove_student(&mut self, student: ObjectId) {
        self.students.retain(|id| *id != student);
    }
}

impl Document for Course {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn collection_name() -> &'static str {
        "cursos"
    }
}

fn hex_ids(ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(|id| id.to_hex()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub correo: String,
    pub cursos: Vec<String>,
}

impl From<&Student> for StudentResponse {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.to_hex(),
            nombre: student.name.clone(),
            correo: student.email.clone(),
            cursos: hex_ids(&student.courses),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub titulo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub estudiantes: Vec<String>,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_hex(),
            titulo: course.title.clone(),
            descripcion: course.description.clone(),
            estudiantes: hex_ids(&course.students),
        }
    }
}

/// The fields of a course shown inside a student listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub titulo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

/// The fields of a student shown inside a course listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub correo: String,
}

/// A student with its course references expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentView {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub correo: String,
    pub cursos: Vec<CourseSummary>,
}

impl StudentView {
    /// Expands `student.courses` in list order. Ids missing from `courses` are dropped.
    pub fn expand(student: &Student, courses: &HashMap<ObjectId, Course>) -> Self {
        Self {
            id: student.id.to_hex(),
            nombre: student.name.clone(),
            correo: student.email.clone(),
            cursos: student
                .courses
                .iter()
                .filter_map(|id| courses.get(id))
                .map(|course| CourseSummary {
                    id: course.id.to_hex(),
                    titulo: course.title.clone(),
                    descripcion: course.description.clone(),
                })
                .collect(),
        }
    }
}

/// A course with its student references expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseView {
    #[serde(rename = "_id")]
    pub id: String,
    pub titulo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub estudiantes: Vec<StudentSummary>,
}

impl CourseView {
    /// Expands `course.students` in list order. Ids missing from `students` are dropped.
    pub fn expand(course: &Course, students: &HashMap<ObjectId, Student>) -> Self {
        Self {
            id: course.id.to_hex(),
            titulo: course.title.clone(),
            descripcion: course.description.clone(),
            estudiantes: course
                .students
                .iter()
                .filter_map(|id| students.get(id))
                .map(|student| StudentSummary {
                    id: student.id.to_hex(),
                    nombre: student.name.clone(),
                    correo: student.email.clone(),
                })
                .collect(),
        }
    }
}

/// Body of a successful enroll or remove call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    pub message: String,
    pub course: CourseResponse,
    pub student: StudentResponse,
}
