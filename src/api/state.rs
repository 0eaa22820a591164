//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{
    AuthService, CourseService, EnrollmentService, RecommendationService, Services, UploadService,
    UserService,
};

/// Application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub course_service: Arc<dyn CourseService>,
    pub enrollment_service: Arc<dyn EnrollmentService>,
    pub recommendation_service: Arc<dyn RecommendationService>,
    pub upload_service: Arc<dyn UploadService>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the full service set against a live database.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let services = Services::build(&database, config)?;
        Ok(Self {
            auth_service: services.auth,
            user_service: services.users,
            course_service: services.courses,
            enrollment_service: services.enrollment,
            recommendation_service: services.recommendations,
            upload_service: services.uploads,
            database,
        })
    }

    /// Manually injected services, used by the API tests.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        course_service: Arc<dyn CourseService>,
        enrollment_service: Arc<dyn EnrollmentService>,
        recommendation_service: Arc<dyn RecommendationService>,
        upload_service: Arc<dyn UploadService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            course_service,
            enrollment_service,
            recommendation_service,
            upload_service,
            database,
        }
    }
}
