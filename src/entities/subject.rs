//! `SeaORM` Entity for subject table

use super::sea_orm_active_enums::DayOfWeek;
use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "subject"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub subject_id: Uuid,
    pub name: String,
    pub day_off: Option<DayOfWeek>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    SubjectId,
    Name,
    DayOff,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    SubjectId,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = Uuid;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Course,
    UserSubject,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::SubjectId => ColumnType::Uuid.def(),
            Self::Name => ColumnType::String(StringLen::None).def().unique(),
            Self::DayOff => ColumnType::String(StringLen::N(16)).def().null(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Course => Entity::has_many(super::course::Entity).into(),
            Self::UserSubject => Entity::has_many(super::user_subject::Entity).into(),
        }
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user_subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSubject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
