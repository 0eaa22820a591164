//! Shared types used across handlers and services.

mod pagination;
mod response;

pub use pagination::{PagePlan, Paginated};
pub use response::{ApiResponse, Created};
