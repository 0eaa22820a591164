//! CourseHub - Course marketplace REST API
//!
//! A document-store backed backend for browsing, creating and enrolling
//! in courses, with JWT authentication, role-based access control and
//! catalog-grounded AI course recommendations.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and access rules
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, external APIs)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Create database indexes and exit
//! cargo run -- indexes
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Course, Password, Role, User};
pub use errors::{AppError, AppResult};
