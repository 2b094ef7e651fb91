//! Enrolling students in courses and removing them.
//!
//! An enrollment lives on both records: the student id in `Course::students` and
//! the course id in `Student::courses`. The two records are written separately,
//! course first. If the student write fails, the course is written back as it
//! was loaded so the pair does not stay half-linked. Concurrent calls on the
//! same pair can still interleave and lose an update.

use crate::{
    error::{ApiError, ApiResult, ENROLLMENT_NOT_FOUND},
    model::{Course, Student},
    repository::Repository,
};

/// Both sides of an enrollment after a successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub course: Course,
    pub student: Student,
}

impl Repository {
    /// Links the student and the course. Enrolling twice leaves a single reference on each side.
    pub async fn enroll(&self, course_id: &str, student_id: &str) -> ApiResult<Enrollment> {
        let (original, mut student) = self.load_pair(course_id, student_id).await?;

        let mut course = original.clone();
        course.add_student(student.id);
        student.add_course(course.id);

        self.write_pair(&original, course, student).await
    }

    /// Unlinks the student and the course. Removing a pair that was never linked is a no-op.
    pub async fn remove(&self, course_id: &str, student_id: &str) -> ApiResult<Enrollment> {
        let (original, mut student) = self.load_pair(course_id, student_id).await?;

        let mut course = original.clone();
        course.remove_student(student.id);
        student.remove_course(course.id);

        self.write_pair(&original, course, student).await
    }

    async fn load_pair(&self, course_id: &str, student_id: &str) -> ApiResult<(Course, Student)> {
        let course = self.find_course(course_id).await?;
        let student = self.find_student(student_id).await?;

        match (course, student) {
            (Some(course), Some(student)) => Ok((course, student)),
            _ => Err(ApiError::NotFound(ENROLLMENT_NOT_FOUND)),
        }
    }

    async fn write_pair(&self, original: &Course, course: Course, student: Student) -> ApiResult<Enrollment> {
        self.save_course(&course).await?;

        if let Err(err) = self.save_student(&student).await {
            tracing::warn!(
                course = %course.id,
                student = %student.id,
                error = %err,
                "student write failed, restoring course"
            );

            if let Err(restore) = self.save_course(original).await {
                tracing::error!(
                    course = %course.id,
                    student = %student.id,
                    error = %restore,
                    "could not restore course, enrollment left half-written"
                );
            }

            return Err(err);
        }

        Ok(Enrollment { course, student })
    }
}
