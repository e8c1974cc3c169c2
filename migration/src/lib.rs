pub use sea_orm_migration::prelude::*;

mod m20250901_081200_create_table_user;
mod m20250901_083045_create_table_subject_class_course;
mod m20250915_140312_create_table_user_links;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_081200_create_table_user::Migration),
            Box::new(m20250901_083045_create_table_subject_class_course::Migration),
            Box::new(m20250915_140312_create_table_user_links::Migration),
        ]
    }
}
