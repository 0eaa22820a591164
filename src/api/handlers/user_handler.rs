//! User handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{require_role, CourseResponse, Role, UserResponse};
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// User routes; all require authentication
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/courses", get(my_enrolled_courses))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    require_role(current.role, &[Role::Admin])?;
    let users = state.user_service.list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// Courses the caller is enrolled in
#[utoipa::path(
    get,
    path = "/api/users/courses",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enrolled courses", body = [CourseResponse])
    )
)]
pub async fn my_enrolled_courses(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<CourseResponse>>>> {
    let courses = state.enrollment_service.enrolled_courses(current.id).await?;
    Ok(Json(ApiResponse::success(
        courses.into_iter().map(CourseResponse::from).collect(),
    )))
}
