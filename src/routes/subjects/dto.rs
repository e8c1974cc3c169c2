use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{DayOfWeek, Level};
use crate::entities::subject;
use crate::services::course_allocation::SubjectOverview;

/// Keeps "key absent" (`None`) apart from "key set to null" (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubjectRequest {
    #[schema(example = "Mathématiques")]
    pub name: String,
    pub day_off: Option<DayOfWeek>,
}

/// Partial update; `"dayOff": null` clears the day off.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<DayOfWeek>)]
    pub day_off: Option<Option<DayOfWeek>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetSubjectsRequest {
    #[schema(example = json!(["Physique", "Chimie"]))]
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: Uuid,
    pub name: String,
    pub day_off: Option<DayOfWeek>,
}

impl From<subject::Model> for SubjectResponse {
    fn from(model: subject::Model) -> Self {
        Self {
            id: model.subject_id,
            name: model.name,
            day_off: model.day_off,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSubjectResponse {
    pub id: Uuid,
    pub removed_courses: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewCourse {
    pub id: Uuid,
    pub level: Level,
    pub hours_per_week: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectOverviewResponse {
    pub id: Uuid,
    pub name: String,
    pub day_off: Option<DayOfWeek>,
    pub courses: Vec<OverviewCourse>,
}

impl From<SubjectOverview> for SubjectOverviewResponse {
    fn from(overview: SubjectOverview) -> Self {
        Self {
            id: overview.subject.subject_id,
            name: overview.subject.name,
            day_off: overview.subject.day_off,
            courses: overview
                .courses
                .into_iter()
                .map(|course| OverviewCourse {
                    id: course.course_id,
                    level: course.level,
                    hours_per_week: course.hours_per_week,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_day_off_are_distinct() {
        let absent: UpdateSubjectRequest = serde_json::from_str(r#"{"name":"EPS"}"#).unwrap();
        assert_eq!(absent.day_off, None);

        let cleared: UpdateSubjectRequest = serde_json::from_str(r#"{"dayOff":null}"#).unwrap();
        assert_eq!(cleared.day_off, Some(None));
        assert_eq!(cleared.name, None);

        let set: UpdateSubjectRequest = serde_json::from_str(r#"{"dayOff":"JEUDI"}"#).unwrap();
        assert_eq!(set.day_off, Some(Some(DayOfWeek::Jeudi)));
    }

    #[test]
    fn unknown_day_is_rejected() {
        assert!(serde_json::from_str::<UpdateSubjectRequest>(r#"{"dayOff":"DIMANCHE"}"#).is_err());
    }
}
