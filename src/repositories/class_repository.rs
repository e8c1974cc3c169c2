use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::entities::class;
use crate::entities::sea_orm_active_enums::Level;

/// Persistence port for level sections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// All classes ordered by level, then section.
    async fn find_all(&self) -> StoreResult<Vec<class::Model>>;

    async fn find_by_id(&self, class_id: Uuid) -> StoreResult<Option<class::Model>>;

    /// Class holding the highest section letter of `level`.
    async fn find_latest_for_level(&self, level: Level) -> StoreResult<Option<class::Model>>;

    /// Fails with [`StoreError::UniqueViolation`] when `(level, section)` exists.
    async fn insert(&self, level: Level, section: String) -> StoreResult<class::Model>;

    async fn rename(&self, class_id: Uuid, name: String) -> StoreResult<class::Model>;

    async fn delete(&self, class_id: Uuid) -> StoreResult<()>;
}

pub struct SeaOrmClassRepository {
    db: DatabaseConnection,
}

impl SeaOrmClassRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClassRepository for SeaOrmClassRepository {
    async fn find_all(&self) -> StoreResult<Vec<class::Model>> {
        let mut classes = class::Entity::find()
            .order_by_asc(class::Column::Section)
            .all(&self.db)
            .await?;
        // level is stored as text, so its SQL ordering is alphabetical
        classes.sort_by(|a, b| (a.level, &a.section).cmp(&(b.level, &b.section)));
        Ok(classes)
    }

    async fn find_by_id(&self, class_id: Uuid) -> StoreResult<Option<class::Model>> {
        let class = class::Entity::find_by_id(class_id).one(&self.db).await?;
        Ok(class)
    }

    async fn find_latest_for_level(&self, level: Level) -> StoreResult<Option<class::Model>> {
        let class = class::Entity::find()
            .filter(class::Column::Level.eq(level))
            .order_by_desc(class::Column::Section)
            .one(&self.db)
            .await?;
        Ok(class)
    }

    async fn insert(&self, level: Level, section: String) -> StoreResult<class::Model> {
        let class_model = class::ActiveModel {
            class_id: Set(Uuid::new_v4()),
            level: Set(level),
            section: Set(section),
            name: Set(None),
        };

        let result = class_model.insert(&self.db).await?;
        Ok(result)
    }

    async fn rename(&self, class_id: Uuid, name: String) -> StoreResult<class::Model> {
        let class = self.find_by_id(class_id).await?.ok_or(StoreError::NotFound)?;

        let mut active_model: class::ActiveModel = class.into();
        active_model.name = Set(Some(name));

        let result = active_model.update(&self.db).await?;
        Ok(result)
    }

    async fn delete(&self, class_id: Uuid) -> StoreResult<()> {
        let result = class::Entity::delete_by_id(class_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
