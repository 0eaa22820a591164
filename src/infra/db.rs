//! MongoDB connection and index bootstrap.

use bson::doc;
use mongodb::{
    options::{ClientOptions, IndexOptions},
    Client, Collection, IndexModel,
};

use crate::config::{Config, COURSE_TEXT_INDEX, STORE_TIMEOUT};
use crate::domain::{Course, User};
use crate::errors::AppResult;
use crate::infra::repositories::{APILOGS_COLLECTION, COURSES_COLLECTION, USERS_COLLECTION};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with bounded connect/server-selection timeouts.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout = Some(STORE_TIMEOUT);
        options.server_selection_timeout = Some(STORE_TIMEOUT);

        let client = Client::with_options(options)?;
        let db = client.database(&config.database_name);

        Ok(Self { db })
    }

    /// Get a typed collection handle.
    pub fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Connectivity check for the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Create the indexes the application relies on. Idempotent; the
    /// Mongo analog of running migrations at startup.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let users: Collection<User> = self.collection(USERS_COLLECTION);
        users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
                None,
            )
            .await?;

        // Relevance search over the public catalog fields
        let courses: Collection<Course> = self.collection(COURSES_COLLECTION);
        courses
            .create_index(
                IndexModel::builder()
                    .keys(doc! {
                        "title": "text",
                        "description": "text",
                        "category": "text",
                        "tags": "text",
                    })
                    .options(
                        IndexOptions::builder()
                            .name(COURSE_TEXT_INDEX.to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await?;

        let apilogs: Collection<bson::Document> = self.collection(APILOGS_COLLECTION);
        apilogs
            .create_index(
                IndexModel::builder().keys(doc! { "userId": 1 }).build(),
                None,
            )
            .await?;

        tracing::info!("Database indexes ensured");
        Ok(())
    }
}
