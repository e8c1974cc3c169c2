use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::JoinType,
};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::entities::sea_orm_active_enums::{Level, RoleEnum};
use crate::entities::{subject, user, user_managed_level, user_subject};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: RoleEnum,
    pub first_name: String,
    pub last_name: String,
}

/// Persistence port for user accounts and their subject / level links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> StoreResult<Option<user::Model>>;

    async fn find_by_email(&self, email: String) -> StoreResult<Option<user::Model>>;

    /// Teachers, most recently created first.
    async fn find_teachers(&self) -> StoreResult<Vec<user::Model>>;

    /// Fails with [`StoreError::UniqueViolation`] when the e-mail is taken.
    async fn insert(&self, new_user: NewUser) -> StoreResult<user::Model>;

    async fn update_names(
        &self,
        user_id: Uuid,
        first_name: String,
        last_name: String,
    ) -> StoreResult<user::Model>;

    /// Subjects linked to the user, ordered by name.
    async fn subjects_of(&self, user_id: Uuid) -> StoreResult<Vec<subject::Model>>;

    /// Replaces the whole subject set of the user.
    async fn replace_subjects(&self, user_id: Uuid, subject_ids: Vec<Uuid>) -> StoreResult<()>;

    /// Managed levels in level order.
    async fn managed_levels_of(&self, user_id: Uuid) -> StoreResult<Vec<Level>>;

    async fn replace_managed_levels(&self, user_id: Uuid, levels: Vec<Level>)
    -> StoreResult<()>;
}

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> StoreResult<Option<user::Model>> {
        let user = user::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: String) -> StoreResult<Option<user::Model>> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_teachers(&self) -> StoreResult<Vec<user::Model>> {
        let users = user::Entity::find()
            .filter(user::Column::Role.eq(RoleEnum::Teacher))
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    async fn insert(&self, new_user: NewUser) -> StoreResult<user::Model> {
        let now = Utc::now().naive_utc();
        let user_model = user::ActiveModel {
            user_id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password: Set(new_user.password_hash),
            role: Set(new_user.role),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = user_model.insert(&self.db).await?;
        Ok(result)
    }

    async fn update_names(
        &self,
        user_id: Uuid,
        first_name: String,
        last_name: String,
    ) -> StoreResult<user::Model> {
        let user = self.find_by_id(user_id).await?.ok_or(StoreError::NotFound)?;

        let mut active_user: user::ActiveModel = user.into();
        active_user.first_name = Set(first_name);
        active_user.last_name = Set(last_name);
        active_user.updated_at = Set(Utc::now().naive_utc());

        let result = active_user.update(&self.db).await?;
        Ok(result)
    }

    async fn subjects_of(&self, user_id: Uuid) -> StoreResult<Vec<subject::Model>> {
        let subjects = subject::Entity::find()
            .join(JoinType::InnerJoin, subject::Relation::UserSubject.def())
            .filter(user_subject::Column::UserId.eq(user_id))
            .order_by_asc(subject::Column::Name)
            .all(&self.db)
            .await?;
        Ok(subjects)
    }

    async fn replace_subjects(&self, user_id: Uuid, subject_ids: Vec<Uuid>) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        if user::Entity::find_by_id(user_id).one(&txn).await?.is_none() {
            return Err(StoreError::NotFound);
        }

        user_subject::Entity::delete_many()
            .filter(user_subject::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        if !subject_ids.is_empty() {
            let links = subject_ids.into_iter().map(|subject_id| user_subject::ActiveModel {
                user_id: Set(user_id),
                subject_id: Set(subject_id),
            });
            user_subject::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn managed_levels_of(&self, user_id: Uuid) -> StoreResult<Vec<Level>> {
        let rows = user_managed_level::Entity::find()
            .filter(user_managed_level::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        let mut levels: Vec<Level> = rows.into_iter().map(|row| row.level).collect();
        levels.sort();
        Ok(levels)
    }

    async fn replace_managed_levels(
        &self,
        user_id: Uuid,
        levels: Vec<Level>,
    ) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        if user::Entity::find_by_id(user_id).one(&txn).await?.is_none() {
            return Err(StoreError::NotFound);
        }

        user_managed_level::Entity::delete_many()
            .filter(user_managed_level::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        if !levels.is_empty() {
            let rows = levels.into_iter().map(|level| user_managed_level::ActiveModel {
                user_id: Set(user_id),
                level: Set(level),
            });
            user_managed_level::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn managed_levels_come_back_in_level_order() {
        let user_id = Uuid::new_v4();
        let row = |level| user_managed_level::Model { user_id, level };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                row(Level::Troisieme),
                row(Level::Sixieme),
                row(Level::Quatrieme),
            ]])
            .into_connection();
        let repository = SeaOrmUserRepository::new(db);

        let levels = repository.managed_levels_of(user_id).await.unwrap();

        assert_eq!(levels, vec![Level::Sixieme, Level::Quatrieme, Level::Troisieme]);
    }

    #[tokio::test]
    async fn replacing_subjects_of_absent_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let repository = SeaOrmUserRepository::new(db);

        let err = repository
            .replace_subjects(Uuid::new_v4(), vec![Uuid::new_v4()])
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn renaming_absent_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let repository = SeaOrmUserRepository::new(db);

        let err = repository
            .update_names(Uuid::new_v4(), "Jean".to_string(), "Dupont".to_string())
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::NotFound);
    }
}
