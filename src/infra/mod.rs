//! Infrastructure layer - External systems integration
//!
//! Database connection and repositories, plus the outbound adapters
//! for the text-generation service and the image store.

pub mod db;
pub mod llm;
pub mod repositories;
pub mod storage;

pub use db::Database;
pub use llm::{Completion, CompletionClient, OpenAiClient};
pub use repositories::{
    ApiLogEntry, ApiLogRepository, ApiLogStore, CourseRepository, CourseStore, UsageStats,
    UserRepository, UserStore,
};
pub use storage::{CloudinaryStorage, ImageStorage, StoredImage};

#[cfg(feature = "test-utils")]
pub use llm::MockCompletionClient;
#[cfg(feature = "test-utils")]
pub use repositories::{MockApiLogRepository, MockCourseRepository, MockUserRepository};
#[cfg(feature = "test-utils")]
pub use storage::MockImageStorage;
