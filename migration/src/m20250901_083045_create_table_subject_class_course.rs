use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subject::SubjectId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(
                        ColumnDef::new(Subject::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    // LUNDI .. SAMEDI
                    .col(ColumnDef::new(Subject::DayOff).string_len(16).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Class::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Class::ClassId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Class::Level).string_len(16).not_null())
                    .col(ColumnDef::new(Class::Section).string_len(1).not_null())
                    .col(ColumnDef::new(Class::Name).string().null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_class_level_section")
                    .table(Class::Table)
                    .col(Class::Level)
                    .col(Class::Section)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Course::CourseId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Course::Level).string_len(16).not_null())
                    .col(ColumnDef::new(Course::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(Course::HoursPerWeek)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_subject")
                            .from(Course::Table, Course::SubjectId)
                            .to(Subject::Table, Subject::SubjectId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_course_level_subject")
                    .table(Course::Table)
                    .col(Course::Level)
                    .col(Course::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Class::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Subject {
    Table,
    SubjectId,
    Name,
    DayOff,
}

#[derive(DeriveIden)]
enum Class {
    Table,
    ClassId,
    Level,
    Section,
    Name,
}

#[derive(DeriveIden)]
enum Course {
    Table,
    CourseId,
    Level,
    SubjectId,
    HoursPerWeek,
}
