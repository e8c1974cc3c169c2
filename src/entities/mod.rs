//! `SeaORM` entities for the school administration schema

pub mod prelude;

pub mod class;
pub mod course;
pub mod sea_orm_active_enums;
pub mod subject;
pub mod user;
pub mod user_managed_level;
pub mod user_subject;
