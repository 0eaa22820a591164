//! Course catalog handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    require_role, CourseResponse, CreateCourse, CreateReview, Role, StudentSummary, UpdateCourse,
};
use crate::errors::AppResult;
use crate::services::CourseQuery;
use crate::types::{ApiResponse, Created, Paginated};

use super::parse_object_id;

/// Publicly reachable course routes
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/:id", get(get_course))
}

/// Course routes that require an authenticated caller
pub fn course_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/:id", put(update_course))
        .route("/:id", delete(delete_course))
        .route("/:id/enroll", post(enroll))
        .route("/:id/unenroll", post(unenroll))
        .route("/:id/students", get(enrolled_students))
        .route("/:id/reviews", post(add_review))
        .route("/instructor/my-courses", get(my_courses))
}

/// List published courses
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    params(CourseQuery),
    responses(
        (status = 200, description = "Paginated course list")
    )
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> AppResult<Json<Paginated<CourseResponse>>> {
    let page = state.course_service.list_public(query).await?;
    Ok(Json(page.map(CourseResponse::from)))
}

/// Get a single course
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "Courses",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CourseResponse>>> {
    let id = parse_object_id(&id, "course")?;
    let course = state.course_service.get_course(id).await?;
    Ok(Json(ApiResponse::success(CourseResponse::from(course))))
}

/// Create a course (instructors and admins)
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourse,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 403, description = "Caller is not an instructor")
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCourse>,
) -> AppResult<Created<CourseResponse>> {
    require_role(current.role, &[Role::Instructor, Role::Admin])?;
    let course = state.course_service.create_course(current.id, payload).await?;
    Ok(Created(CourseResponse::from(course)))
}

/// Update a course (owner or admin)
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    request_body = UpdateCourse,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCourse>,
) -> AppResult<Json<ApiResponse<CourseResponse>>> {
    let id = parse_object_id(&id, "course")?;
    let course = state
        .course_service
        .update_course(current.id, current.role, id, payload)
        .await?;
    Ok(Json(ApiResponse::success(CourseResponse::from(course))))
}

/// Delete a course and clean up enrollments (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = parse_object_id(&id, "course")?;
    state
        .enrollment_service
        .delete_course(current.id, current.role, id)
        .await?;
    Ok(Json(ApiResponse::message("Course deleted")))
}

/// Enroll the calling student in a course
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    tag = "Enrollment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrolled"),
        (status = 403, description = "Caller is not a student"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Already enrolled")
    )
)]
pub async fn enroll(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_role(current.role, &[Role::Student])?;
    let id = parse_object_id(&id, "course")?;
    state.enrollment_service.enroll(current.id, id).await?;
    Ok(Json(ApiResponse::message("Enrolled in course")))
}

/// Remove the calling student's enrollment
#[utoipa::path(
    post,
    path = "/api/courses/{id}/unenroll",
    tag = "Enrollment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrollment removed"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Not enrolled")
    )
)]
pub async fn unenroll(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_role(current.role, &[Role::Student])?;
    let id = parse_object_id(&id, "course")?;
    state.enrollment_service.unenroll(current.id, id).await?;
    Ok(Json(ApiResponse::message("Enrollment removed")))
}

/// Students enrolled in a course (owner or admin)
#[utoipa::path(
    get,
    path = "/api/courses/{id}/students",
    tag = "Enrollment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Roster", body = [StudentSummary]),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn enrolled_students(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<StudentSummary>>>> {
    let id = parse_object_id(&id, "course")?;
    let students = state
        .enrollment_service
        .enrolled_students(current.id, current.role, id)
        .await?;
    Ok(Json(ApiResponse::success(students)))
}

/// Review a course the caller is enrolled in
#[utoipa::path(
    post,
    path = "/api/courses/{id}/reviews",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Course id")),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review added", body = CourseResponse),
        (status = 403, description = "Caller is not enrolled"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn add_review(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CreateReview>,
) -> AppResult<Created<CourseResponse>> {
    let id = parse_object_id(&id, "course")?;
    let course = state
        .course_service
        .add_review(current.id, id, payload)
        .await?;
    Ok(Created(CourseResponse::from(course)))
}

/// Courses owned by the calling instructor, drafts included
#[utoipa::path(
    get,
    path = "/api/courses/instructor/my-courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Instructor's courses", body = [CourseResponse]),
        (status = 403, description = "Caller is not an instructor")
    )
)]
pub async fn my_courses(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<CourseResponse>>>> {
    require_role(current.role, &[Role::Instructor, Role::Admin])?;
    let courses = state.course_service.instructor_courses(current.id).await?;
    Ok(Json(ApiResponse::success(
        courses.into_iter().map(CourseResponse::from).collect(),
    )))
}
