//! `SeaORM` active enums shared by the school tables

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleEnum {
    #[sea_orm(string_value = "PRINCIPAL")]
    Principal,
    #[sea_orm(string_value = "TEACHER")]
    Teacher,
}

impl RoleEnum {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleEnum::Principal => "PRINCIPAL",
            RoleEnum::Teacher => "TEACHER",
        }
    }
}

/// Grade stage of the collège, from 6e to 3e.
///
/// Declaration order is the display and sort order used by every listing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    #[sea_orm(string_value = "SIXIEME")]
    Sixieme,
    #[sea_orm(string_value = "CINQUIEME")]
    Cinquieme,
    #[sea_orm(string_value = "QUATRIEME")]
    Quatrieme,
    #[sea_orm(string_value = "TROISIEME")]
    Troisieme,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Sixieme,
        Level::Cinquieme,
        Level::Quatrieme,
        Level::Troisieme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Sixieme => "SIXIEME",
            Level::Cinquieme => "CINQUIEME",
            Level::Quatrieme => "QUATRIEME",
            Level::Troisieme => "TROISIEME",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Level::Sixieme => "6ème",
            Level::Cinquieme => "5ème",
            Level::Quatrieme => "4ème",
            Level::Troisieme => "3ème",
        }
    }

    /// Parses a level from a path segment, ignoring case (`sixieme`, `SIXIEME`).
    pub fn parse(value: &str) -> Option<Level> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    #[sea_orm(string_value = "LUNDI")]
    Lundi,
    #[sea_orm(string_value = "MARDI")]
    Mardi,
    #[sea_orm(string_value = "MERCREDI")]
    Mercredi,
    #[sea_orm(string_value = "JEUDI")]
    Jeudi,
    #[sea_orm(string_value = "VENDREDI")]
    Vendredi,
    #[sea_orm(string_value = "SAMEDI")]
    Samedi,
}
