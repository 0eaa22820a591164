//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and pure predicates, independent of
//! infrastructure concerns.

pub mod access;
pub mod course;
pub mod password;
pub mod user;

pub use access::{require_owner_or_role, require_role};
pub use course::{
    Course, CourseResponse, CreateCourse, CreateReview, Level, Rating, Review, ReviewResponse,
    UpdateCourse,
};
pub use password::Password;
pub use user::{Role, StudentSummary, User, UserResponse};
