use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch},
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::dto::{ClassResponse, LevelClassesResponse, LevelRequest, RenameClassRequest};
use crate::error::{AppError, ErrorResponse};
use crate::extractor::PrincipalClaims;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/classes", get(list_classes).post(add_section))
        .route("/api/v1/classes/by-level", get(list_classes_by_level))
        .route("/api/v1/classes/latest", delete(remove_latest_section))
        .route(
            "/api/v1/classes/{class_id}",
            patch(rename_class).delete(delete_class),
        )
}

/// List every class ordered by level then section
#[utoipa::path(
    get,
    path = "/api/v1/classes",
    responses(
        (status = 200, description = "Classes", body = Vec<ClassResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn list_classes(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<ClassResponse>>), AppError> {
    let classes = state.sections.list_classes().await?;
    Ok((
        StatusCode::OK,
        Json(classes.into_iter().map(ClassResponse::from).collect()),
    ))
}

/// Classes grouped by level, empty levels included
#[utoipa::path(
    get,
    path = "/api/v1/classes/by-level",
    responses(
        (status = 200, description = "Classes per level", body = Vec<LevelClassesResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn list_classes_by_level(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<LevelClassesResponse>>), AppError> {
    let levels = state.sections.list_classes_by_level().await?;
    Ok((
        StatusCode::OK,
        Json(levels.into_iter().map(LevelClassesResponse::from).collect()),
    ))
}

/// Add the next section of a level
#[utoipa::path(
    post,
    path = "/api/v1/classes",
    request_body = LevelRequest,
    responses(
        (status = 201, description = "Section created", body = ClassResponse),
        (status = 400, description = "Invalid level", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 409, description = "Section already exists or level is full", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn add_section(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LevelRequest>, AppError>,
) -> Result<(StatusCode, Json<ClassResponse>), AppError> {
    let class = state.sections.add_section(payload.level).await?;
    Ok((StatusCode::CREATED, Json(class.into())))
}

/// Remove the highest section of a level
#[utoipa::path(
    delete,
    path = "/api/v1/classes/latest",
    request_body = LevelRequest,
    responses(
        (status = 200, description = "Removed class", body = ClassResponse),
        (status = 400, description = "Invalid level", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Level has no class", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn remove_latest_section(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LevelRequest>, AppError>,
) -> Result<(StatusCode, Json<ClassResponse>), AppError> {
    let class = state.sections.remove_latest_section(payload.level).await?;
    Ok((StatusCode::OK, Json(class.into())))
}

/// Give a class a custom name
#[utoipa::path(
    patch,
    path = "/api/v1/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class id")),
    request_body = RenameClassRequest,
    responses(
        (status = 200, description = "Class renamed", body = ClassResponse),
        (status = 400, description = "Empty name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn rename_class(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(class_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<RenameClassRequest>, AppError>,
) -> Result<(StatusCode, Json<ClassResponse>), AppError> {
    let class = state.sections.rename_class(class_id, &payload.name).await?;
    Ok((StatusCode::OK, Json(class.into())))
}

/// Delete a class
#[utoipa::path(
    delete,
    path = "/api/v1/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class id")),
    responses(
        (status = 204, description = "Class deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
pub async fn delete_class(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(class_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<StatusCode, AppError> {
    state.sections.delete_class(class_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
