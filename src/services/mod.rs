//! Service layer - Business logic
//!
//! Services own the business rules and orchestrate repositories and
//! outbound adapters. Each service is a trait so the API layer and
//! tests can swap implementations.

mod auth_service;
mod container;
mod course_service;
mod enrollment_service;
mod recommendation_service;
mod upload_service;
mod user_service;

pub use auth_service::{AuthPayload, AuthService, Authenticator, Claims, RegisterInput};
pub use container::Services;
pub use course_service::{CourseCatalog, CourseQuery, CourseService};
pub use enrollment_service::{EnrollmentCoordinator, EnrollmentService};
pub use recommendation_service::{Recommendation, RecommendationService, Recommender};
pub use upload_service::{UploadService, Uploader};
pub use user_service::{UserManager, UserService};
