use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::entities::course;
use crate::entities::sea_orm_active_enums::Level;

#[derive(Debug, Clone, PartialEq)]
pub struct UpsertedCourse {
    pub course: course::Model,
    /// `false` when an existing quota row was updated.
    pub created: bool,
}

/// Persistence port for weekly-hour quotas.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_all(&self) -> StoreResult<Vec<course::Model>>;

    async fn find_by_level(&self, level: Level) -> StoreResult<Vec<course::Model>>;

    async fn find_by_id(&self, course_id: Uuid) -> StoreResult<Option<course::Model>>;

    /// Fails with [`StoreError::UniqueViolation`] when the subject already has a
    /// quota for `level`, and [`StoreError::ForeignKeyViolation`] when the
    /// subject does not exist.
    async fn insert(
        &self,
        level: Level,
        subject_id: Uuid,
        hours_per_week: f64,
    ) -> StoreResult<course::Model>;

    async fn update_hours(&self, course_id: Uuid, hours_per_week: f64)
    -> StoreResult<course::Model>;

    async fn delete(&self, course_id: Uuid) -> StoreResult<()>;

    /// Sets the quota keyed by `(level, subject_id)`, creating the row if needed.
    async fn upsert(
        &self,
        level: Level,
        subject_id: Uuid,
        hours_per_week: f64,
    ) -> StoreResult<UpsertedCourse>;
}

pub struct SeaOrmCourseRepository {
    db: DatabaseConnection,
}

impl SeaOrmCourseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepository for SeaOrmCourseRepository {
    async fn find_all(&self) -> StoreResult<Vec<course::Model>> {
        let courses = course::Entity::find().all(&self.db).await?;
        Ok(courses)
    }

    async fn find_by_level(&self, level: Level) -> StoreResult<Vec<course::Model>> {
        let courses = course::Entity::find()
            .filter(course::Column::Level.eq(level))
            .all(&self.db)
            .await?;
        Ok(courses)
    }

    async fn find_by_id(&self, course_id: Uuid) -> StoreResult<Option<course::Model>> {
        let course = course::Entity::find_by_id(course_id).one(&self.db).await?;
        Ok(course)
    }

    async fn insert(
        &self,
        level: Level,
        subject_id: Uuid,
        hours_per_week: f64,
    ) -> StoreResult<course::Model> {
        let course_model = course::ActiveModel {
            course_id: Set(Uuid::new_v4()),
            level: Set(level),
            subject_id: Set(subject_id),
            hours_per_week: Set(hours_per_week),
        };

        let result = course_model.insert(&self.db).await?;
        Ok(result)
    }

    async fn update_hours(
        &self,
        course_id: Uuid,
        hours_per_week: f64,
    ) -> StoreResult<course::Model> {
        let course = self
            .find_by_id(course_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut active_model: course::ActiveModel = course.into();
        active_model.hours_per_week = Set(hours_per_week);

        let result = active_model.update(&self.db).await?;
        Ok(result)
    }

    async fn delete(&self, course_id: Uuid) -> StoreResult<()> {
        let result = course::Entity::delete_by_id(course_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn upsert(
        &self,
        level: Level,
        subject_id: Uuid,
        hours_per_week: f64,
    ) -> StoreResult<UpsertedCourse> {
        let txn = self.db.begin().await?;

        let existing = course::Entity::find()
            .filter(course::Column::Level.eq(level))
            .filter(course::Column::SubjectId.eq(subject_id))
            .one(&txn)
            .await?;

        let upserted = match existing {
            Some(course) => {
                let mut active_model: course::ActiveModel = course.into();
                active_model.hours_per_week = Set(hours_per_week);
                UpsertedCourse {
                    course: active_model.update(&txn).await?,
                    created: false,
                }
            }
            None => {
                let course_model = course::ActiveModel {
                    course_id: Set(Uuid::new_v4()),
                    level: Set(level),
                    subject_id: Set(subject_id),
                    hours_per_week: Set(hours_per_week),
                };
                UpsertedCourse {
                    course: course_model.insert(&txn).await?,
                    created: true,
                }
            }
        };

        txn.commit().await?;
        Ok(upserted)
    }
}
