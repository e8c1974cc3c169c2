use sea_orm_migration::prelude::*;

use crate::m20250901_081200_create_table_user::User;
use crate::m20250901_083045_create_table_subject_class_course::Subject;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Teacher <-> subject membership
        manager
            .create_table(
                Table::create()
                    .table(UserSubject::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserSubject::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserSubject::SubjectId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserSubject::UserId)
                            .col(UserSubject::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_subject_user")
                            .from(UserSubject::Table, UserSubject::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_subject_subject")
                            .from(UserSubject::Table, UserSubject::SubjectId)
                            .to(Subject::Table, Subject::SubjectId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (teacher, level) the teacher coordinates
        manager
            .create_table(
                Table::create()
                    .table(UserManagedLevel::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserManagedLevel::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserManagedLevel::Level)
                            .string_len(16)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserManagedLevel::UserId)
                            .col(UserManagedLevel::Level),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_managed_level_user")
                            .from(UserManagedLevel::Table, UserManagedLevel::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserManagedLevel::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserSubject::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserSubject {
    Table,
    UserId,
    SubjectId,
}

#[derive(DeriveIden)]
enum UserManagedLevel {
    Table,
    UserId,
    Level,
}
