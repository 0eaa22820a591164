//! Enrollment coordinator.
//!
//! Enrollment is recorded on both sides of the relation: the user's
//! `enrolledCourses` and the course's `enrolled` roster. The user-side
//! write is the authoritative one and uses an atomic conditional
//! update, so double-enrollment cannot slip through under concurrency.
//! A course-side failure after the user side succeeded is surfaced as
//! an internal-inconsistency error and logged for reconciliation.

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;

use crate::domain::{require_owner_or_role, Course, Role, StudentSummary};
use crate::errors::{AppError, AppResult};
use crate::infra::{CourseRepository, UserRepository};

/// Operations over the user/course enrollment relation, plus course
/// deletion, which has to fan out to both sides.
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Enroll a student in a course
    async fn enroll(&self, student_id: ObjectId, course_id: ObjectId) -> AppResult<()>;

    /// Remove a student's enrollment
    async fn unenroll(&self, student_id: ObjectId, course_id: ObjectId) -> AppResult<()>;

    /// Delete a course and clean up every reference to it. Only the
    /// owning instructor or an admin may delete.
    async fn delete_course(
        &self,
        caller_id: ObjectId,
        caller_role: Role,
        course_id: ObjectId,
    ) -> AppResult<()>;

    /// The students enrolled in a course. Only the owning instructor
    /// or an admin may view the roster.
    async fn enrolled_students(
        &self,
        caller_id: ObjectId,
        caller_role: Role,
        course_id: ObjectId,
    ) -> AppResult<Vec<StudentSummary>>;

    /// The courses a user is enrolled in
    async fn enrolled_courses(&self, user_id: ObjectId) -> AppResult<Vec<Course>>;
}

pub struct EnrollmentCoordinator {
    users: Arc<dyn UserRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl EnrollmentCoordinator {
    pub fn new(users: Arc<dyn UserRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { users, courses }
    }
}

#[async_trait]
impl EnrollmentService for EnrollmentCoordinator {
    async fn enroll(&self, student_id: ObjectId, course_id: ObjectId) -> AppResult<()> {
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(AppError::NotFound("Course"));
        }

        // Authoritative side first. A `false` here means the check-and-
        // add guard rejected the write: either the student is already
        // enrolled, or the user record is gone (stale token).
        if !self.users.add_enrollment(student_id, course_id).await? {
            return match self.users.find_by_id(student_id).await? {
                Some(_) => Err(AppError::conflict("Already enrolled in this course")),
                None => Err(AppError::NotFound("User")),
            };
        }

        // Roster side. The user record now says enrolled, so a failure
        // here leaves the two sides disagreeing.
        if let Err(e) = self.courses.add_student(course_id, student_id).await {
            tracing::error!(
                kind = "inconsistency",
                user = %student_id,
                course = %course_id,
                error = %e,
                "enrollment recorded on user but course roster update failed"
            );
            return Err(AppError::inconsistency(format!(
                "enrollment for user {} on course {} is partially recorded",
                student_id, course_id
            )));
        }
        Ok(())
    }

    async fn unenroll(&self, student_id: ObjectId, course_id: ObjectId) -> AppResult<()> {
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(AppError::NotFound("Course"));
        }

        if !self.users.remove_enrollment(student_id, course_id).await? {
            return match self.users.find_by_id(student_id).await? {
                Some(_) => Err(AppError::conflict("Not enrolled in this course")),
                None => Err(AppError::NotFound("User")),
            };
        }

        if let Err(e) = self.courses.remove_student(course_id, student_id).await {
            tracing::error!(
                kind = "inconsistency",
                user = %student_id,
                course = %course_id,
                error = %e,
                "enrollment removed from user but course roster update failed"
            );
            return Err(AppError::inconsistency(format!(
                "unenrollment for user {} on course {} is partially recorded",
                student_id, course_id
            )));
        }
        Ok(())
    }

    async fn delete_course(
        &self,
        caller_id: ObjectId,
        caller_role: Role,
        course_id: ObjectId,
    ) -> AppResult<()> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(AppError::NotFound("Course"))?;
        require_owner_or_role(&caller_id, caller_role, &course.instructor, &[Role::Admin])?;

        if !self.courses.delete(course_id).await? {
            return Err(AppError::NotFound("Course"));
        }

        // The course record is the authority; once it is gone the
        // delete has succeeded. Reference cleanup is best effort and
        // logged when it fails, never surfaced to the caller.
        if let Err(e) = self
            .users
            .remove_created_course(course.instructor, course_id)
            .await
        {
            tracing::error!(
                kind = "inconsistency",
                course = %course_id,
                instructor = %course.instructor,
                error = %e,
                "course deleted but createdCourses cleanup failed"
            );
        }
        match self.users.remove_course_from_all(course_id).await {
            Ok(cleaned) => {
                tracing::info!(course = %course_id, users = cleaned, "course deleted");
            }
            Err(e) => {
                tracing::error!(
                    kind = "inconsistency",
                    course = %course_id,
                    error = %e,
                    "course deleted but enrolledCourses cleanup failed"
                );
            }
        }
        Ok(())
    }

    async fn enrolled_students(
        &self,
        caller_id: ObjectId,
        caller_role: Role,
        course_id: ObjectId,
    ) -> AppResult<Vec<StudentSummary>> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(AppError::NotFound("Course"))?;
        require_owner_or_role(&caller_id, caller_role, &course.instructor, &[Role::Admin])?;

        let students = self.users.find_by_ids(course.enrolled).await?;
        Ok(students.iter().map(StudentSummary::from).collect())
    }

    async fn enrolled_courses(&self, user_id: ObjectId) -> AppResult<Vec<Course>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        self.courses.find_by_ids(user.enrolled_courses).await
    }
}
