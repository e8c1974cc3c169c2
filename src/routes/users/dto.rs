use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{Level, RoleEnum};
use crate::services::teacher_directory::{NewTeacher, TeacherChanges, UserProfile};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Generated from the names and first subject when omitted.
    #[schema(example = "jean.dupont.mathematiques@gmail.com")]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(example = "Jean")]
    pub first_name: String,
    #[serde(default)]
    #[schema(example = "Dupont")]
    pub last_name: String,
    #[serde(default)]
    #[schema(example = json!(["Mathématiques"]))]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub managed_levels: Vec<Level>,
}

impl From<CreateUserRequest> for NewTeacher {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            subjects: request.subjects,
            managed_levels: request.managed_levels,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Omitted or null clears the managed levels.
    pub managed_levels: Option<Vec<Level>>,
}

impl From<UpdateUserRequest> for TeacherChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            subjects: request.subjects,
            managed_levels: request.managed_levels,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: RoleEnum,
    pub first_name: String,
    pub last_name: String,
    /// Subject names ordered alphabetically.
    pub subjects: Vec<String>,
    pub managed_levels: Vec<Level>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.user.user_id,
            email: profile.user.email,
            role: profile.user.role,
            first_name: profile.user.first_name,
            last_name: profile.user.last_name,
            subjects: profile.subjects.into_iter().map(|s| s.name).collect(),
            managed_levels: profile.managed_levels,
            created_at: profile.user.created_at,
            updated_at: profile.user.updated_at,
        }
    }
}
