use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::entities::sea_orm_active_enums::DayOfWeek;
use crate::entities::{course, subject, user_subject};

/// Partial update of a subject; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the day off.
    pub day_off: Option<Option<DayOfWeek>>,
}

impl SubjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.day_off.is_none()
    }
}

/// Persistence port for subjects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// All subjects ordered by name.
    async fn find_all(&self) -> StoreResult<Vec<subject::Model>>;

    async fn find_by_id(&self, subject_id: Uuid) -> StoreResult<Option<subject::Model>>;

    async fn insert(
        &self,
        name: String,
        day_off: Option<DayOfWeek>,
    ) -> StoreResult<subject::Model>;

    async fn update(&self, subject_id: Uuid, updates: SubjectUpdate)
    -> StoreResult<subject::Model>;

    /// Deletes the subject together with its courses and teacher memberships.
    ///
    /// Returns the number of courses removed.
    async fn delete_cascade(&self, subject_id: Uuid) -> StoreResult<u64>;

    /// Returns the subjects named in `names`, creating the missing ones.
    ///
    /// Output follows the order of `names`.
    async fn ensure_by_names(&self, names: Vec<String>) -> StoreResult<Vec<subject::Model>>;
}

pub struct SeaOrmSubjectRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubjectRepository for SeaOrmSubjectRepository {
    async fn find_all(&self) -> StoreResult<Vec<subject::Model>> {
        let subjects = subject::Entity::find()
            .order_by_asc(subject::Column::Name)
            .all(&self.db)
            .await?;
        Ok(subjects)
    }

    async fn find_by_id(&self, subject_id: Uuid) -> StoreResult<Option<subject::Model>> {
        let subject = subject::Entity::find_by_id(subject_id).one(&self.db).await?;
        Ok(subject)
    }

    async fn insert(
        &self,
        name: String,
        day_off: Option<DayOfWeek>,
    ) -> StoreResult<subject::Model> {
        let subject_model = subject::ActiveModel {
            subject_id: Set(Uuid::new_v4()),
            name: Set(name),
            day_off: Set(day_off),
        };

        let result = subject_model.insert(&self.db).await?;
        Ok(result)
    }

    async fn update(
        &self,
        subject_id: Uuid,
        updates: SubjectUpdate,
    ) -> StoreResult<subject::Model> {
        let subject = self
            .find_by_id(subject_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut active_model: subject::ActiveModel = subject.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(day_off) = updates.day_off {
            active_model.day_off = Set(day_off);
        }

        let result = active_model.update(&self.db).await?;
        Ok(result)
    }

    async fn delete_cascade(&self, subject_id: Uuid) -> StoreResult<u64> {
        let txn = self.db.begin().await?;

        let exists = subject::Entity::find_by_id(subject_id).one(&txn).await?;
        if exists.is_none() {
            return Err(StoreError::NotFound);
        }

        let removed_courses = course::Entity::delete_many()
            .filter(course::Column::SubjectId.eq(subject_id))
            .exec(&txn)
            .await?;

        user_subject::Entity::delete_many()
            .filter(user_subject::Column::SubjectId.eq(subject_id))
            .exec(&txn)
            .await?;

        subject::Entity::delete_by_id(subject_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(removed_courses.rows_affected)
    }

    async fn ensure_by_names(&self, names: Vec<String>) -> StoreResult<Vec<subject::Model>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self.db.begin().await?;

        let models = names.iter().map(|name| subject::ActiveModel {
            subject_id: Set(Uuid::new_v4()),
            name: Set(name.clone()),
            day_off: Set(None),
        });

        subject::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(subject::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let mut subjects = subject::Entity::find()
            .filter(subject::Column::Name.is_in(names.clone()))
            .all(&txn)
            .await?;

        txn.commit().await?;

        subjects.sort_by_key(|s| names.iter().position(|n| n == &s.name));
        Ok(subjects)
    }
}
