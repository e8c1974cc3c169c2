use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::Level;
use crate::routes::subjects::dto::SubjectResponse;
use crate::services::course_allocation::{
    ApplyOutcome, ApplyToLevelsReport, CourseWithSubject, LevelCourseSheet, LevelResult,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub level: Level,
    pub subject_id: Uuid,
    #[schema(example = 4.0)]
    pub hours_per_week: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[schema(example = 3.5)]
    pub hours_per_week: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyToLevelsRequest {
    pub subject_id: Uuid,
    pub hours_per_week: f64,
    #[schema(example = json!(["SIXIEME", "CINQUIEME"]))]
    pub target_levels: Vec<Level>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub level: Level,
    pub subject_id: Uuid,
    pub hours_per_week: f64,
    pub subject: SubjectResponse,
}

impl From<CourseWithSubject> for CourseResponse {
    fn from(value: CourseWithSubject) -> Self {
        Self {
            id: value.course.course_id,
            level: value.course.level,
            subject_id: value.course.subject_id,
            hours_per_week: value.course.hours_per_week,
            subject: value.subject.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LevelResultStatus {
    Applied,
    Failed,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelResultResponse {
    pub level: Level,
    pub status: LevelResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Uuid>,
    /// `false` when an existing quota was updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<LevelResult> for LevelResultResponse {
    fn from(result: LevelResult) -> Self {
        match result {
            LevelResult::Applied {
                level,
                course,
                created,
            } => Self {
                level,
                status: LevelResultStatus::Applied,
                course_id: Some(course.course_id),
                created: Some(created),
                error: None,
            },
            LevelResult::Failed { level, message } => Self {
                level,
                status: LevelResultStatus::Failed,
                course_id: None,
                created: None,
                error: Some(message),
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyToLevelsResponse {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub hours_per_week: f64,
    pub outcome: ApplyOutcome,
    pub results: Vec<LevelResultResponse>,
}

impl From<ApplyToLevelsReport> for ApplyToLevelsResponse {
    fn from(report: ApplyToLevelsReport) -> Self {
        Self {
            subject_id: report.subject.subject_id,
            subject_name: report.subject.name,
            hours_per_week: report.hours_per_week,
            outcome: report.outcome,
            results: report
                .results
                .into_iter()
                .map(LevelResultResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelCoursesResponse {
    pub level: Level,
    #[schema(example = "6ème")]
    pub level_name: String,
    pub courses: Vec<CourseResponse>,
    pub available_subjects: Vec<SubjectResponse>,
}

impl From<LevelCourseSheet> for LevelCoursesResponse {
    fn from(sheet: LevelCourseSheet) -> Self {
        Self {
            level: sheet.level,
            level_name: sheet.level.display_name().to_string(),
            courses: sheet.courses.into_iter().map(CourseResponse::from).collect(),
            available_subjects: sheet
                .available_subjects
                .into_iter()
                .map(SubjectResponse::from)
                .collect(),
        }
    }
}
