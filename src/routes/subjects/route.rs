use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::dto::{
    CreateSubjectRequest, DeleteSubjectResponse, SubjectOverviewResponse, SubjectResponse,
    UpdateSubjectRequest,
};
use crate::error::{AppError, ErrorResponse};
use crate::extractor::PrincipalClaims;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/v1/subjects", get(list_subjects).post(create_subject))
        .route("/api/v1/subjects/overview", get(get_overview))
        .route(
            "/api/v1/subjects/{subject_id}",
            patch(update_subject).delete(delete_subject),
        )
}

/// List subjects ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    responses(
        (status = 200, description = "Subjects", body = Vec<SubjectResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn list_subjects(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<SubjectResponse>>), AppError> {
    let subjects = state.subjects.list_subjects().await?;
    Ok((
        StatusCode::OK,
        Json(subjects.into_iter().map(SubjectResponse::from).collect()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Empty name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 409, description = "Subject already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateSubjectRequest>, AppError>,
) -> Result<(StatusCode, Json<SubjectResponse>), AppError> {
    let subject = state
        .subjects
        .create_subject(&payload.name, payload.day_off)
        .await?;
    Ok((StatusCode::CREATED, Json(subject.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject id")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = SubjectResponse),
        (status = 400, description = "Nothing to update or empty name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse),
        (status = 409, description = "Name already used", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn update_subject(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(subject_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateSubjectRequest>, AppError>,
) -> Result<(StatusCode, Json<SubjectResponse>), AppError> {
    let subject = state
        .subjects
        .update_subject(subject_id, payload.name, payload.day_off)
        .await?;
    Ok((StatusCode::OK, Json(subject.into())))
}

/// Delete a subject together with its courses
#[utoipa::path(
    delete,
    path = "/api/v1/subjects/{subject_id}",
    params(("subject_id" = Uuid, Path, description = "Subject id")),
    responses(
        (status = 200, description = "Subject deleted", body = DeleteSubjectResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn delete_subject(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
    WithRejection(Path(subject_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<(StatusCode, Json<DeleteSubjectResponse>), AppError> {
    let removed_courses = state.subjects.delete_subject(subject_id).await?;
    Ok((
        StatusCode::OK,
        Json(DeleteSubjectResponse {
            id: subject_id,
            removed_courses,
        }),
    ))
}

/// Every subject with its weekly hours per level
#[utoipa::path(
    get,
    path = "/api/v1/subjects/overview",
    responses(
        (status = 200, description = "Allocation overview", body = Vec<SubjectOverviewResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn get_overview(
    PrincipalClaims(_claims): PrincipalClaims,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<SubjectOverviewResponse>>), AppError> {
    let overview = state.courses.overview().await?;
    Ok((
        StatusCode::OK,
        Json(overview.into_iter().map(SubjectOverviewResponse::from).collect()),
    ))
}
