//! HTTP request handlers.

pub mod auth_handler;
pub mod course_handler;
pub mod gpt_handler;
pub mod upload_handler;
pub mod user_handler;

pub use auth_handler::{auth_protected_routes, auth_routes};
pub use course_handler::{course_protected_routes, course_routes};
pub use gpt_handler::gpt_routes;
pub use upload_handler::upload_routes;
pub use user_handler::user_routes;

use bson::oid::ObjectId;

use crate::errors::{AppError, AppResult};

/// Parse a path id, turning garbage into a 400 instead of a Mongo error.
fn parse_object_id(raw: &str, what: &'static str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::bad_request(format!("Invalid {} id", what)))
}
