use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::class;
use crate::entities::sea_orm_active_enums::Level;
use crate::services::section_allocator::LevelSections;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelRequest {
    #[schema(example = "SIXIEME")]
    pub level: Level,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameClassRequest {
    #[schema(example = "Les Explorateurs")]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub id: Uuid,
    pub level: Level,
    #[schema(example = "A")]
    pub section: String,
    pub name: Option<String>,
    /// Custom name, or level and section (`6ème A`).
    #[schema(example = "6ème A")]
    pub display_name: String,
}

impl From<class::Model> for ClassResponse {
    fn from(model: class::Model) -> Self {
        let display_name = model
            .name
            .clone()
            .unwrap_or_else(|| format!("{} {}", model.level.display_name(), model.section));
        Self {
            id: model.class_id,
            level: model.level,
            section: model.section,
            name: model.name,
            display_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelClassesResponse {
    pub level: Level,
    #[schema(example = "6ème")]
    pub level_name: String,
    pub classes: Vec<ClassResponse>,
}

impl From<LevelSections> for LevelClassesResponse {
    fn from(sections: LevelSections) -> Self {
        Self {
            level: sections.level,
            level_name: sections.level.display_name().to_string(),
            classes: sections.classes.into_iter().map(ClassResponse::from).collect(),
        }
    }
}
