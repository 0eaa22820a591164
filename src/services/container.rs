//! Service container: wires repositories and outbound adapters into
//! the service set the API layer consumes.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{
    ApiLogStore, CloudinaryStorage, CompletionClient, CourseStore, Database, ImageStorage,
    OpenAiClient, UserStore,
};

use super::{
    AuthService, Authenticator, CourseCatalog, CourseService, EnrollmentCoordinator,
    EnrollmentService, Recommender, RecommendationService, Uploader, UploadService, UserManager,
    UserService,
};

/// The fully wired service set
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub courses: Arc<dyn CourseService>,
    pub enrollment: Arc<dyn EnrollmentService>,
    pub recommendations: Arc<dyn RecommendationService>,
    pub uploads: Arc<dyn UploadService>,
}

impl Services {
    /// Build every service against the given database and config.
    ///
    /// The completion client and image storage are optional: when not
    /// configured, their services answer 503 instead of failing boot.
    pub fn build(db: &Database, config: &Config) -> AppResult<Self> {
        let user_store = Arc::new(UserStore::new(db));
        let course_store = Arc::new(CourseStore::new(db));
        let log_store = Arc::new(ApiLogStore::new(db));

        let llm: Option<Arc<dyn CompletionClient>> = match &config.openai_api_key {
            Some(key) => Some(Arc::new(OpenAiClient::new(
                key.clone(),
                config.llm_base_url.clone(),
                config.llm_model.clone(),
            )?)),
            None => {
                tracing::warn!("no completion API key set; recommendations disabled");
                None
            }
        };

        let storage: Option<Arc<dyn ImageStorage>> = match &config.storage {
            Some(storage_config) => Some(Arc::new(CloudinaryStorage::new(storage_config)?)),
            None => {
                tracing::warn!("no image store configured; uploads disabled");
                None
            }
        };

        Ok(Self {
            auth: Arc::new(Authenticator::new(user_store.clone(), config.clone())),
            users: Arc::new(UserManager::new(user_store.clone())),
            courses: Arc::new(CourseCatalog::new(course_store.clone(), user_store.clone())),
            enrollment: Arc::new(EnrollmentCoordinator::new(
                user_store,
                course_store.clone(),
            )),
            recommendations: Arc::new(Recommender::new(course_store, log_store, llm)),
            uploads: Arc::new(Uploader::new(storage)),
        })
    }
}
