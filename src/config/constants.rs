//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

use std::time::Duration;

// =============================================================================
// Pagination
// =============================================================================

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Default number of courses per page
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// =============================================================================
// Database
// =============================================================================

/// Default MongoDB connection URI (for development)
pub const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017";

/// Default database name
pub const DEFAULT_DATABASE_NAME: &str = "coursehub";

/// Bound on how long we wait for the store to answer
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Name of the text index over course title/description/category/tags
pub const COURSE_TEXT_INDEX: &str = "course_text";

// =============================================================================
// Courses
// =============================================================================

/// Placeholder thumbnail assigned when a course has no image
pub const DEFAULT_THUMBNAIL: &str = "https://via.placeholder.com/350x150";

/// Default course duration in minutes
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

// =============================================================================
// Recommendations (LLM proxy)
// =============================================================================

/// Endpoint label written to the usage log
pub const RECOMMENDATION_ENDPOINT: &str = "course-recommendations";

/// Default chat-completion model
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";

/// Default OpenAI-compatible API base URL
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Completion cap per request
pub const LLM_MAX_TOKENS: u32 = 500;

/// Sampling temperature for recommendations
pub const LLM_TEMPERATURE: f64 = 0.7;

/// Bound on the upstream generation call
pub const LLM_TIMEOUT: Duration = Duration::from_secs(30);

/// Course descriptions are truncated to this many characters in the
/// grounding prompt to keep it within budget
pub const GROUNDING_SNIPPET_CHARS: usize = 160;

// =============================================================================
// Uploads
// =============================================================================

/// Maximum accepted image size (5 MB)
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Bound on the object-storage hand-off
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
