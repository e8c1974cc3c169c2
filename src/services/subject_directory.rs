use std::sync::Arc;

use uuid::Uuid;

use crate::entities::sea_orm_active_enums::DayOfWeek;
use crate::entities::subject;
use crate::error::AppError;
use crate::repositories::{StoreError, SubjectRepository, SubjectUpdate, UserRepository};

/// Trims names, drops blanks and keeps the first occurrence of duplicates.
pub fn normalize_subject_names(names: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !normalized.iter().any(|n| n == name) {
            normalized.push(name.to_string());
        }
    }
    normalized
}

fn subject_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Subject name must not be empty"));
    }
    Ok(name.to_string())
}

fn map_subject_error(err: StoreError, name: Option<&str>) -> AppError {
    match err {
        StoreError::NotFound => AppError::not_found("Subject not found"),
        StoreError::UniqueViolation(_) => match name {
            Some(name) => AppError::conflict(format!("Subject {name:?} already exists")),
            None => AppError::conflict("Subject already exists"),
        },
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct SubjectDirectory {
    subjects: Arc<dyn SubjectRepository>,
    users: Arc<dyn UserRepository>,
}

impl SubjectDirectory {
    pub fn new(subjects: Arc<dyn SubjectRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { subjects, users }
    }

    pub async fn create_subject(
        &self,
        name: &str,
        day_off: Option<DayOfWeek>,
    ) -> Result<subject::Model, AppError> {
        let name = subject_name(name)?;
        let subject = self
            .subjects
            .insert(name.clone(), day_off)
            .await
            .map_err(|err| map_subject_error(err, Some(&name)))?;

        tracing::info!(subject = %subject.name, "subject created");
        Ok(subject)
    }

    /// `day_off: Some(None)` clears the day off, `None` keeps it.
    pub async fn update_subject(
        &self,
        subject_id: Uuid,
        name: Option<String>,
        day_off: Option<Option<DayOfWeek>>,
    ) -> Result<subject::Model, AppError> {
        let updates = SubjectUpdate {
            name: name.as_deref().map(subject_name).transpose()?,
            day_off,
        };
        if updates.is_empty() {
            return Err(AppError::bad_request("Nothing to update"));
        }

        let new_name = updates.name.clone();
        self.subjects
            .update(subject_id, updates)
            .await
            .map_err(|err| map_subject_error(err, new_name.as_deref()))
    }

    /// Deletes the subject with its courses; returns how many courses went with it.
    pub async fn delete_subject(&self, subject_id: Uuid) -> Result<u64, AppError> {
        let removed_courses = self
            .subjects
            .delete_cascade(subject_id)
            .await
            .map_err(|err| map_subject_error(err, None))?;

        tracing::info!(%subject_id, removed_courses, "subject deleted");
        Ok(removed_courses)
    }

    pub async fn list_subjects(&self) -> Result<Vec<subject::Model>, AppError> {
        Ok(self.subjects.find_all().await?)
    }

    /// Resolves subject names to records, creating the missing ones.
    ///
    /// Fails when no usable name remains after normalization.
    pub async fn ensure_subjects(&self, names: Vec<String>) -> Result<Vec<subject::Model>, AppError> {
        let names = normalize_subject_names(names);
        if names.is_empty() {
            return Err(AppError::bad_request("At least one subject is required"));
        }
        Ok(self.subjects.ensure_by_names(names).await?)
    }

    /// Replaces the subject set of a user; returns the new set ordered by name.
    pub async fn set_user_subjects(
        &self,
        user_id: Uuid,
        names: Vec<String>,
    ) -> Result<Vec<subject::Model>, AppError> {
        if normalize_subject_names(names.clone()).is_empty() {
            return Err(AppError::bad_request("At least one subject is required"));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let subjects = self.ensure_subjects(names).await?;
        let subject_ids = subjects.iter().map(|s| s.subject_id).collect();
        self.users
            .replace_subjects(user_id, subject_ids)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("User not found"),
                other => other.into(),
            })?;

        Ok(self.users.subjects_of(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::RoleEnum;
    use crate::repositories::{InMemoryStore, NewUser};
    use rstest::rstest;

    fn directory(store: &InMemoryStore) -> SubjectDirectory {
        SubjectDirectory::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    async fn teacher(store: &InMemoryStore) -> Uuid {
        UserRepository::insert(
            store,
            NewUser {
                email: "jean.dupont.maths@gmail.com".to_string(),
                password_hash: "hash".to_string(),
                role: RoleEnum::Teacher,
                first_name: "Jean".to_string(),
                last_name: "Dupont".to_string(),
            },
        )
        .await
        .unwrap()
        .user_id
    }

    #[test]
    fn names_are_trimmed_and_deduplicated() {
        let names = vec![
            " Physique ".to_string(),
            "".to_string(),
            "Physique".to_string(),
            "Chimie".to_string(),
        ];
        assert_eq!(normalize_subject_names(names), vec!["Physique", "Chimie"]);
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[tokio::test]
    async fn blank_subject_name_is_rejected(#[case] name: &str) {
        let store = InMemoryStore::new();
        let err = directory(&store).create_subject(name, None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn duplicate_subject_name_is_conflict() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let created = directory.create_subject(" Musique ", None).await.unwrap();
        assert_eq!(created.name, "Musique");

        let err = directory.create_subject("Musique", None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        directory.create_subject("musique", None).await.unwrap();
    }

    #[tokio::test]
    async fn empty_update_is_bad_request() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let subject = directory.create_subject("Musique", None).await.unwrap();

        let err = directory
            .update_subject(subject.subject_id, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn day_off_update_keeps_name() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let subject = directory
            .create_subject("EPS", Some(DayOfWeek::Lundi))
            .await
            .unwrap();

        let updated = directory
            .update_subject(subject.subject_id, None, Some(Some(DayOfWeek::Mercredi)))
            .await
            .unwrap();
        assert_eq!(updated.name, "EPS");
        assert_eq!(updated.day_off, Some(DayOfWeek::Mercredi));

        let cleared = directory
            .update_subject(subject.subject_id, None, Some(None))
            .await
            .unwrap();
        assert_eq!(cleared.day_off, None);
    }

    #[tokio::test]
    async fn rename_to_existing_name_is_conflict() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        directory.create_subject("Musique", None).await.unwrap();
        let art = directory.create_subject("Arts plastiques", None).await.unwrap();

        let err = directory
            .update_subject(art.subject_id, Some("Musique".to_string()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = directory
            .update_subject(Uuid::new_v4(), Some("Latin".to_string()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_cascades_to_courses() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let subject = directory.create_subject("Latin", None).await.unwrap();
        crate::repositories::CourseRepository::insert(
            &store,
            crate::entities::sea_orm_active_enums::Level::Cinquieme,
            subject.subject_id,
            2.0,
        )
        .await
        .unwrap();

        assert_eq!(directory.delete_subject(subject.subject_id).await.unwrap(), 1);
        let err = directory.delete_subject(subject.subject_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_subjects_are_replaced_and_created() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let user_id = teacher(&store).await;
        directory.create_subject("Physique", None).await.unwrap();

        directory
            .set_user_subjects(user_id, vec!["Histoire".to_string()])
            .await
            .unwrap();
        let subjects = directory
            .set_user_subjects(
                user_id,
                vec!["Physique".to_string(), " Chimie".to_string(), "Physique".to_string()],
            )
            .await
            .unwrap();

        let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Chimie", "Physique"]);
        assert_eq!(directory.list_subjects().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn user_subjects_require_a_name_and_a_user() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let user_id = teacher(&store).await;

        let err = directory
            .set_user_subjects(user_id, vec![" ".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = directory
            .set_user_subjects(Uuid::new_v4(), vec!["Physique".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(directory.list_subjects().await.unwrap().is_empty());
    }
}
