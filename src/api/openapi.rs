//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, course_handler, gpt_handler, upload_handler, user_handler,
};
use crate::domain::{
    CourseResponse, CreateCourse, CreateReview, Level, Rating, ReviewResponse, Role,
    StudentSummary, UpdateCourse, UserResponse,
};
use crate::infra::{StoredImage, UsageStats};
use crate::services::Recommendation;

/// OpenAPI documentation for the CourseHub API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CourseHub API",
        version = "0.1.0",
        description = "Course marketplace backend: catalog, enrollment and AI course recommendations",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::login,
        auth_handler::get_profile,
        // Courses
        course_handler::list_courses,
        course_handler::get_course,
        course_handler::create_course,
        course_handler::update_course,
        course_handler::delete_course,
        course_handler::enroll,
        course_handler::unenroll,
        course_handler::enrolled_students,
        course_handler::add_review,
        course_handler::my_courses,
        // Users
        user_handler::list_users,
        user_handler::my_enrolled_courses,
        // Recommendations
        gpt_handler::recommend,
        gpt_handler::my_usage,
        gpt_handler::usage_stats,
        // Uploads
        upload_handler::upload_image,
    ),
    components(
        schemas(
            // Domain types
            Role,
            Level,
            Rating,
            UserResponse,
            StudentSummary,
            CourseResponse,
            ReviewResponse,
            CreateCourse,
            UpdateCourse,
            CreateReview,
            // Handler types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            gpt_handler::RecommendRequest,
            Recommendation,
            UsageStats,
            StoredImage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Courses", description = "Course catalog and management"),
        (name = "Enrollment", description = "Enrollment operations"),
        (name = "Users", description = "User operations"),
        (name = "Recommendations", description = "Catalog-grounded AI recommendations"),
        (name = "Uploads", description = "Course image uploads")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
