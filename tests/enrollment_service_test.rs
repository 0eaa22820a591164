//! Enrollment coordinator unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use mockall::predicate::eq;

use coursehub::domain::{Course, CreateCourse, Rating, Review, Role, UpdateCourse, User};
use coursehub::errors::{AppError, AppResult};
use coursehub::infra::{
    CourseRepository, MockCourseRepository, MockUserRepository, UserRepository,
};
use coursehub::services::{
    CourseCatalog, CourseQuery, CourseService, EnrollmentCoordinator, EnrollmentService,
};
use coursehub::types::PagePlan;

fn test_course(instructor: ObjectId) -> Course {
    Course::new(
        instructor,
        CreateCourse {
            title: "Test Course".into(),
            description: "A course".into(),
            content: "Lessons".into(),
            category: "programming".into(),
            thumbnail: None,
            duration: None,
            level: None,
            tags: None,
            is_published: Some(true),
        },
    )
}

fn test_user(name: &str, email: &str, role: Role) -> User {
    User::new(name.into(), email.into(), "$argon2id$hash".into(), role)
}

fn coordinator(
    users: MockUserRepository,
    courses: MockCourseRepository,
) -> EnrollmentCoordinator {
    EnrollmentCoordinator::new(Arc::new(users), Arc::new(courses))
}

#[tokio::test]
async fn enroll_records_both_sides() {
    let student = ObjectId::new();
    let course = test_course(ObjectId::new());
    let course_id = course.id;

    let mut users = MockUserRepository::new();
    users
        .expect_add_enrollment()
        .with(eq(student), eq(course_id))
        .times(1)
        .returning(|_, _| Ok(true));

    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    courses
        .expect_add_student()
        .with(eq(course_id), eq(student))
        .times(1)
        .returning(|_, _| Ok(true));

    let result = coordinator(users, courses).enroll(student, course_id).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn enroll_missing_course_is_not_found() {
    let users = MockUserRepository::new();
    let mut courses = MockCourseRepository::new();
    courses.expect_find_by_id().returning(|_| Ok(None));

    let result = coordinator(users, courses)
        .enroll(ObjectId::new(), ObjectId::new())
        .await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn double_enroll_is_a_conflict() {
    let course = test_course(ObjectId::new());

    let mut users = MockUserRepository::new();
    // Guarded update rejected: already a member
    users.expect_add_enrollment().returning(|_, _| Ok(false));
    users
        .expect_find_by_id()
        .returning(|_| Ok(Some(test_user("Stu", "stu@example.com", Role::Student))));

    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let result = coordinator(users, courses)
        .enroll(ObjectId::new(), course.id)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn enroll_with_a_deleted_account_is_not_found() {
    let course = test_course(ObjectId::new());

    let mut users = MockUserRepository::new();
    // Guarded update rejected because the user record no longer exists
    users.expect_add_enrollment().returning(|_, _| Ok(false));
    users.expect_find_by_id().returning(|_| Ok(None));

    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let result = coordinator(users, courses)
        .enroll(ObjectId::new(), course.id)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound("User")));
}

#[tokio::test]
async fn roster_failure_after_user_write_is_an_inconsistency() {
    let course = test_course(ObjectId::new());

    let mut users = MockUserRepository::new();
    users.expect_add_enrollment().returning(|_, _| Ok(true));

    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    courses
        .expect_add_student()
        .returning(|_, _| Err(AppError::internal("write failed")));

    let result = coordinator(users, courses)
        .enroll(ObjectId::new(), course.id)
        .await;
    // Must be the distinct inconsistency variant, not a generic error
    assert!(matches!(result.unwrap_err(), AppError::Inconsistency(_)));
}

#[tokio::test]
async fn unenroll_without_enrollment_is_a_conflict() {
    let course = test_course(ObjectId::new());

    let mut users = MockUserRepository::new();
    users.expect_remove_enrollment().returning(|_, _| Ok(false));
    users
        .expect_find_by_id()
        .returning(|_| Ok(Some(test_user("Stu", "stu@example.com", Role::Student))));

    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let result = coordinator(users, courses)
        .unenroll(ObjectId::new(), course.id)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn delete_requires_owner_or_admin() {
    let instructor = ObjectId::new();
    let other_instructor = ObjectId::new();
    let course = test_course(instructor);

    let users = MockUserRepository::new();
    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let result = coordinator(users, courses)
        .delete_course(other_instructor, Role::Instructor, course.id)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn admin_delete_fans_out_to_user_records() {
    let instructor = ObjectId::new();
    let admin = ObjectId::new();
    let course = test_course(instructor);
    let course_id = course.id;

    let mut users = MockUserRepository::new();
    users
        .expect_remove_created_course()
        .with(eq(instructor), eq(course_id))
        .times(1)
        .returning(|_, _| Ok(()));
    users
        .expect_remove_course_from_all()
        .with(eq(course_id))
        .times(1)
        .returning(|_| Ok(3));

    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    courses
        .expect_delete()
        .with(eq(course_id))
        .times(1)
        .returning(|_| Ok(true));

    let result = coordinator(users, courses)
        .delete_course(admin, Role::Admin, course_id)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn delete_succeeds_even_when_cleanup_fails() {
    let instructor = ObjectId::new();
    let course = test_course(instructor);

    let mut users = MockUserRepository::new();
    users
        .expect_remove_created_course()
        .returning(|_, _| Err(AppError::internal("cleanup failed")));
    users
        .expect_remove_course_from_all()
        .returning(|_| Err(AppError::internal("cleanup failed")));

    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    courses.expect_delete().returning(|_| Ok(true));

    // The course record is gone; cleanup errors are logged, not raised
    let result = coordinator(users, courses)
        .delete_course(instructor, Role::Instructor, course.id)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn roster_view_is_owner_or_admin_only() {
    let instructor = ObjectId::new();
    let student = ObjectId::new();
    let mut course = test_course(instructor);
    course.enrolled.push(student);

    let users = MockUserRepository::new();
    let mut courses = MockCourseRepository::new();
    let found = course.clone();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let result = coordinator(users, courses)
        .enrolled_students(student, Role::Student, course.id)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

// ============================================================================
// In-memory stores for the full-lifecycle scenario
// ============================================================================

#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: &User) -> AppResult<()> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_ids(&self, ids: Vec<ObjectId>) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn add_enrollment(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(u) if !u.enrolled_courses.contains(&course_id) => {
                u.enrolled_courses.push(course_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_enrollment(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(u) if u.enrolled_courses.contains(&course_id) => {
                u.enrolled_courses.retain(|c| *c != course_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_created_course(&self, user_id: ObjectId, course_id: ObjectId) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == user_id) {
            u.created_courses.push(course_id);
        }
        Ok(())
    }

    async fn remove_created_course(
        &self,
        user_id: ObjectId,
        course_id: ObjectId,
    ) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == user_id) {
            u.created_courses.retain(|c| *c != course_id);
        }
        Ok(())
    }

    async fn remove_course_from_all(&self, course_id: ObjectId) -> AppResult<u64> {
        let mut users = self.users.lock().unwrap();
        let mut cleaned = 0;
        for u in users.iter_mut() {
            if u.enrolled_courses.contains(&course_id) {
                u.enrolled_courses.retain(|c| *c != course_id);
                cleaned += 1;
            }
        }
        Ok(cleaned)
    }
}

#[derive(Default)]
struct InMemoryCourses {
    courses: Mutex<Vec<Course>>,
}

#[async_trait]
impl CourseRepository for InMemoryCourses {
    async fn insert(&self, course: &Course) -> AppResult<()> {
        self.courses.lock().unwrap().push(course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Course>> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    // Honors only the `isPublished` key of the filter
    async fn search(&self, filter: Document, _plan: PagePlan) -> AppResult<(Vec<Course>, u64)> {
        let published_only = filter.get_bool("isPublished").unwrap_or(false);
        let items: Vec<Course> = self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !published_only || c.is_published)
            .cloned()
            .collect();
        let total = items.len() as u64;
        Ok((items, total))
    }

    async fn find_by_instructor(&self, instructor: ObjectId) -> AppResult<Vec<Course>> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.instructor == instructor)
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: Vec<ObjectId>) -> AppResult<Vec<Course>> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn list_published(&self) -> AppResult<Vec<Course>> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_published)
            .cloned()
            .collect())
    }

    async fn update_fields(&self, id: ObjectId, update: Document) -> AppResult<Option<Course>> {
        let mut courses = self.courses.lock().unwrap();
        let Some(pos) = courses.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let mut doc = bson::to_document(&courses[pos])?;
        for (key, value) in update {
            doc.insert(key, value);
        }
        let updated: Course =
            bson::from_document(doc).map_err(|e| AppError::internal(e.to_string()))?;
        courses[pos] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        let mut courses = self.courses.lock().unwrap();
        let before = courses.len();
        courses.retain(|c| c.id != id);
        Ok(courses.len() < before)
    }

    async fn add_student(&self, course_id: ObjectId, user_id: ObjectId) -> AppResult<bool> {
        let mut courses = self.courses.lock().unwrap();
        match courses.iter_mut().find(|c| c.id == course_id) {
            Some(c) if !c.enrolled.contains(&user_id) => {
                c.enrolled.push(user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_student(&self, course_id: ObjectId, user_id: ObjectId) -> AppResult<bool> {
        let mut courses = self.courses.lock().unwrap();
        match courses.iter_mut().find(|c| c.id == course_id) {
            Some(c) if c.enrolled.contains(&user_id) => {
                c.enrolled.retain(|u| *u != user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn push_review(
        &self,
        course_id: ObjectId,
        review: Review,
        rating: Rating,
    ) -> AppResult<()> {
        let mut courses = self.courses.lock().unwrap();
        if let Some(c) = courses.iter_mut().find(|c| c.id == course_id) {
            c.reviews.push(review);
            c.rating = rating;
        }
        Ok(())
    }
}

// Drives the whole course lifecycle through the real services against
// shared in-memory stores: draft stays private, publishing exposes it,
// enrollment is recorded on both sides, and deletion cleans both up.
#[tokio::test]
async fn course_lifecycle_keeps_both_sides_in_step() {
    let users = Arc::new(InMemoryUsers::default());
    let courses = Arc::new(InMemoryCourses::default());
    let catalog = CourseCatalog::new(courses.clone(), users.clone());
    let enrollment = EnrollmentCoordinator::new(users.clone(), courses.clone());

    let instructor = test_user("Ina", "ina@example.com", Role::Instructor);
    let student = test_user("Stu", "stu@example.com", Role::Student);
    users.insert(&instructor).await.unwrap();
    users.insert(&student).await.unwrap();

    let draft = catalog
        .create_course(
            instructor.id,
            CreateCourse {
                title: "Rust Basics".into(),
                description: "Learn Rust".into(),
                content: "Lessons".into(),
                category: "programming".into(),
                thumbnail: None,
                duration: None,
                level: None,
                tags: None,
                is_published: None,
            },
        )
        .await
        .unwrap();

    // Drafts never show up in the public catalog
    let page = catalog.list_public(CourseQuery::default()).await.unwrap();
    assert_eq!(page.total, 0);

    catalog
        .update_course(
            instructor.id,
            Role::Instructor,
            draft.id,
            UpdateCourse {
                is_published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let page = catalog.list_public(CourseQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);

    // Enrollment lands on both the user and the roster
    enrollment.enroll(student.id, draft.id).await.unwrap();
    let roster = enrollment
        .enrolled_students(instructor.id, Role::Instructor, draft.id)
        .await
        .unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].email, "stu@example.com");
    let mine = enrollment.enrolled_courses(student.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, draft.id);

    // Deletion removes the course and every reference to it
    enrollment
        .delete_course(instructor.id, Role::Instructor, draft.id)
        .await
        .unwrap();
    assert!(matches!(
        catalog.get_course(draft.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(enrollment
        .enrolled_courses(student.id)
        .await
        .unwrap()
        .is_empty());
    let page = catalog.list_public(CourseQuery::default()).await.unwrap();
    assert_eq!(page.total, 0);
}
