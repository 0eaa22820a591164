//! Recommendation-proxy handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{require_role, Role};
use crate::errors::AppResult;
use crate::infra::UsageStats;
use crate::services::Recommendation;
use crate::types::ApiResponse;

/// Recommendation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecommendRequest {
    /// What the caller wants to learn
    #[validate(length(min = 1, max = 1000, message = "Prompt must be 1-1000 characters"))]
    #[schema(example = "I want to learn backend development with Rust")]
    pub prompt: String,
}

/// Recommendation routes; all require authentication
pub fn gpt_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", post(recommend))
        .route("/usage", get(my_usage))
        .route("/stats", get(usage_stats))
}

/// Get course recommendations grounded in the published catalog
#[utoipa::path(
    post,
    path = "/api/gpt/recommendations",
    tag = "Recommendations",
    security(("bearer_auth" = [])),
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendations", body = Recommendation),
        (status = 502, description = "Completion service failed"),
        (status = 503, description = "Completion service not configured")
    )
)]
pub async fn recommend(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RecommendRequest>,
) -> AppResult<Json<ApiResponse<Recommendation>>> {
    let recommendation = state
        .recommendation_service
        .recommend(current.id, payload.prompt)
        .await?;
    Ok(Json(ApiResponse::success(recommendation)))
}

/// Usage totals for the calling user
#[utoipa::path(
    get,
    path = "/api/gpt/usage",
    tag = "Recommendations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's usage", body = UsageStats)
    )
)]
pub async fn my_usage(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<UsageStats>>> {
    let stats = state.recommendation_service.user_usage(current.id).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// Platform-wide usage totals (admin only)
#[utoipa::path(
    get,
    path = "/api/gpt/stats",
    tag = "Recommendations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Platform usage", body = UsageStats),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn usage_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<UsageStats>>> {
    require_role(current.role, &[Role::Admin])?;
    let stats = state.recommendation_service.usage_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}
