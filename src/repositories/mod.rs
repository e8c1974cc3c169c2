//! Storage ports and their adapters.
//!
//! Each repository trait is implemented twice: a `SeaOrm*` adapter backed by
//! Postgres and [`InMemoryStore`], which keeps the same uniqueness and
//! cascade rules in process memory.

use sea_orm::{DbErr, SqlErr};

pub mod class_repository;
pub mod course_repository;
pub mod memory;
pub mod subject_repository;
pub mod user_repository;

pub use class_repository::{ClassRepository, SeaOrmClassRepository};
pub use course_repository::{CourseRepository, SeaOrmCourseRepository, UpsertedCourse};
pub use memory::InMemoryStore;
pub use subject_repository::{SeaOrmSubjectRepository, SubjectRepository, SubjectUpdate};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRepository};

#[cfg(test)]
pub use class_repository::MockClassRepository;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
#[cfg(test)]
pub use subject_repository::MockSubjectRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

/// Errors raised by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    #[error("database error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                return Self::UniqueViolation(message);
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                return Self::ForeignKeyViolation(message);
            }
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => Self::NotFound,
            other => {
                tracing::debug!(error = %other, "database operation failed");
                Self::Backend(other.to_string())
            }
        }
    }
}
