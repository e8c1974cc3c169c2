use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::error::{AppError, ErrorResponse};
use crate::extractor::AuthClaims;
use crate::routes::users::dto::UserResponse;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new().route("/api/v1/profile", get(get_profile))
}

/// Get current user profile (requires JWT)
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile retrieved", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    AuthClaims(auth_claims): AuthClaims,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let profile = state.teachers.user_profile(auth_claims.sub).await?;
    Ok((StatusCode::OK, Json(profile.into())))
}
