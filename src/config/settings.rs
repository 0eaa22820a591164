//! Application settings loaded from environment variables.
//!
//! Configuration is read exactly once at startup and passed into
//! components by injection; nothing reads ambient process state after
//! this point.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_NAME, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL,
    DEFAULT_MONGO_URI, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub database_name: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Chat-completion credentials; `None` disables the recommendation proxy
    pub openai_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    /// Object-storage upload target; `None` disables image uploads
    pub storage: Option<StorageConfig>,
}

/// Cloudinary-style unsigned upload target
#[derive(Clone)]
pub struct StorageConfig {
    pub upload_url: String,
    pub upload_preset: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("mongo_uri", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("llm_model", &self.llm_model)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let storage = match (
            env::var("CLOUDINARY_UPLOAD_URL").ok(),
            env::var("CLOUDINARY_UPLOAD_PRESET").ok(),
        ) {
            (Some(upload_url), Some(upload_preset)) => Some(StorageConfig {
                upload_url,
                upload_preset,
            }),
            _ => None,
        };

        Self {
            mongo_uri: env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string()),
            database_name: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            llm_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            storage,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database_name: "coursehub_test".to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            openai_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            storage: None,
        }
    }
}
