//! Student and course persistence on top of the document store.
//!
//! The repository owns the process-wide [`DocumentStore`]. Email uniqueness is
//! left to the store's unique index on `correo`, created by
//! [`Repository::ensure_indexes`]; a rejected write comes back as
//! [`ApiError::Duplicate`].

use std::collections::{HashMap, HashSet};

use academia_store::{
    document::Document,
    error::DocumentStoreError,
    query::{Filter, Query, SortDirection},
    store::DocumentStore,
};
use bson::oid::ObjectId;

use crate::{
    error::{ApiError, ApiResult, COURSE_NOT_FOUND, STUDENT_NOT_FOUND},
    model::{Course, CourseView, Student, StudentView},
    validation::{CourseInput, StudentInput},
};

/// Parses a path id. Anything that is not a 24-character hex ObjectId names no record.
pub fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn sorted_by_id() -> Query {
    Query::builder().sort("_id", SortDirection::Asc).build()
}

/// Maps a store miss during a write to the route's 404.
fn missing_as(message: &'static str) -> impl FnOnce(DocumentStoreError) -> ApiError {
    move |err| match err {
        DocumentStoreError::DocumentNotFound(..) => ApiError::NotFound(message),
        other => other.into(),
    }
}

#[derive(Debug)]
pub struct Repository {
    store: DocumentStore,
}

impl Repository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Gives the store back, typically to shut it down.
    pub fn into_store(self) -> DocumentStore {
        self.store
    }

    /// Creates the unique index on `estudiantes.correo`.
    pub async fn ensure_indexes(&self) -> ApiResult<()> {
        self.store
            .add_index(Student::collection_name(), "correo", true)
            .await?;

        Ok(())
    }

    pub async fn create_student(&self, input: StudentInput) -> ApiResult<Student> {
        let student = Student {
            id: ObjectId::new(),
            name: input.name,
            email: input.email,
            courses: input.courses.unwrap_or_default(),
        };

        self.store
            .typed_collection::<Student>()
            .insert(vec![student.clone()])
            .await?;

        tracing::debug!(id = %student.id, "student created");
        Ok(student)
    }

    pub async fn create_course(&self, input: CourseInput) -> ApiResult<Course> {
        let course = Course {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            students: vec![],
        };

        self.store
            .typed_collection::<Course>()
            .insert(vec![course.clone()])
            .await?;

        tracing::debug!(id = %course.id, "course created");
        Ok(course)
    }

    /// Lists every student with its courses expanded.
    pub async fn list_students(&self) -> ApiResult<Vec<StudentView>> {
        let students = self
            .store
            .typed_collection::<Student>()
            .query(sorted_by_id())
            .await?;

        let course_ids = unique_ids(students.iter().flat_map(|s| s.courses.iter()));
        let courses = self
            .store
            .typed_collection::<Course>()
            .get(course_ids)
            .await?
            .into_iter()
            .map(|course| (course.id, course))
            .collect::<HashMap<_, _>>();

        Ok(students
            .iter()
            .map(|student| StudentView::expand(student, &courses))
            .collect())
    }

    /// Lists every course with its students expanded.
    pub async fn list_courses(&self) -> ApiResult<Vec<CourseView>> {
        let courses = self
            .store
            .typed_collection::<Course>()
            .query(sorted_by_id())
            .await?;

        let student_ids = unique_ids(courses.iter().flat_map(|c| c.students.iter()));
        let students = self
            .store
            .typed_collection::<Student>()
            .get(student_ids)
            .await?
            .into_iter()
            .map(|student| (student.id, student))
            .collect::<HashMap<_, _>>();

        Ok(courses
            .iter()
            .map(|course| CourseView::expand(course, &students))
            .collect())
    }

    /// Replaces the student's `nombre` and `correo`, and `cursos` when supplied.
    pub async fn update_student(&self, id: &str, input: StudentInput) -> ApiResult<Student> {
        let mut student = self
            .find_student(id)
            .await?
            .ok_or(ApiError::NotFound(STUDENT_NOT_FOUND))?;

        student.name = input.name;
        student.email = input.email;
        if let Some(courses) = input.courses {
            student.courses = courses;
        }

        self.store
            .typed_collection::<Student>()
            .update(vec![student.clone()])
            .await
            .map_err(missing_as(STUDENT_NOT_FOUND))?;

        Ok(student)
    }

    /// Replaces the course's `titulo`, and `descripcion` when supplied.
    pub async fn update_course(&self, id: &str, input: CourseInput) -> ApiResult<Course> {
        let mut course = self
            .find_course(id)
            .await?
            .ok_or(ApiError::NotFound(COURSE_NOT_FOUND))?;

        course.title = input.title;
        if let Some(description) = input.description {
            course.description = Some(description);
        }

        self.store
            .typed_collection::<Course>()
            .update(vec![course.clone()])
            .await
            .map_err(missing_as(COURSE_NOT_FOUND))?;

        Ok(course)
    }

    /// Deletes a student and returns the record as it was. Courses keep their references.
    pub async fn delete_student(&self, id: &str) -> ApiResult<Student> {
        let student = self
            .find_student(id)
            .await?
            .ok_or(ApiError::NotFound(STUDENT_NOT_FOUND))?;

        self.store
            .typed_collection::<Student>()
            .delete(vec![student.id])
            .await
            .map_err(missing_as(STUDENT_NOT_FOUND))?;

        Ok(student)
    }

    /// Deletes a course and returns the record as it was. Students keep their references.
    pub async fn delete_course(&self, id: &str) -> ApiResult<Course> {
        let course = self
            .find_course(id)
            .await?
            .ok_or(ApiError::NotFound(COURSE_NOT_FOUND))?;

        self.store
            .typed_collection::<Course>()
            .delete(vec![course.id])
            .await
            .map_err(missing_as(COURSE_NOT_FOUND))?;

        Ok(course)
    }

    pub async fn find_student(&self, id: &str) -> ApiResult<Option<Student>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        Ok(self.store.typed_collection::<Student>().find(id).await?)
    }

    pub async fn find_course(&self, id: &str) -> ApiResult<Option<Course>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        Ok(self.store.typed_collection::<Course>().find(id).await?)
    }

    /// Looks up a course by title, and by description too when one is given.
    pub async fn find_course_by_title(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> ApiResult<Option<Course>> {
        let filter = match description {
            Some(description) => Filter::eq("titulo", title).and(Filter::eq("descripcion", description)),
            None => Filter::eq("titulo", title),
        };

        Ok(self
            .store
            .typed_collection::<Course>()
            .query(Query::builder().filter(filter).sort("_id", SortDirection::Asc).build())
            .await?
            .into_iter()
            .next())
    }

    pub async fn save_student(&self, student: &Student) -> ApiResult<()> {
        self.store
            .typed_collection::<Student>()
            .update(vec![student.clone()])
            .await?;

        Ok(())
    }

    pub async fn save_course(&self, course: &Course) -> ApiResult<()> {
        self.store
            .typed_collection::<Course>()
            .update(vec![course.clone()])
            .await?;

        Ok(())
    }
}

fn unique_ids<'a>(ids: impl Iterator<Item = &'a ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(**id)).copied().collect()
}
