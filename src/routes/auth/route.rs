use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_extra::extract::WithRejection;

use super::dto::{LoginRequest, LoginResponse};
use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new().route("/api/v1/auth/login", post(login))
}

/// Login endpoint - returns JWT token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let user = state
        .users
        .find_by_email(payload.email.trim().to_string())
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    let password_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let access_token = state.jwt.issue(&user)?;
    tracing::info!(user_id = %user.user_id, role = ?user.role, "user logged in");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt.expiry_seconds(),
            user_id: user.user_id,
            email: user.email,
            role: user.role,
        }),
    ))
}
