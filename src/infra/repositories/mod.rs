//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over the document store,
//! following the Repository pattern for clean separation of concerns.

mod api_log_repository;
mod course_repository;
mod user_repository;

pub use api_log_repository::{
    ApiLogEntry, ApiLogRepository, ApiLogStore, UsageStats, APILOGS_COLLECTION,
};
pub use course_repository::{CourseRepository, CourseStore, COURSES_COLLECTION};
pub use user_repository::{UserRepository, UserStore, USERS_COLLECTION};

// Export mocks for integration tests
#[cfg(feature = "test-utils")]
pub use api_log_repository::MockApiLogRepository;
#[cfg(feature = "test-utils")]
pub use course_repository::MockCourseRepository;
#[cfg(feature = "test-utils")]
pub use user_repository::MockUserRepository;
