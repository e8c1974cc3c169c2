use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    ClassRepository, CourseRepository, NewUser, StoreError, StoreResult, SubjectRepository,
    SubjectUpdate, UpsertedCourse, UserRepository,
};
use crate::entities::sea_orm_active_enums::{DayOfWeek, Level, RoleEnum};
use crate::entities::{class, course, subject, user};

#[derive(Debug, Default)]
struct MemoryState {
    classes: Vec<class::Model>,
    subjects: Vec<subject::Model>,
    courses: Vec<course::Model>,
    users: Vec<user::Model>,
    user_subjects: Vec<(Uuid, Uuid)>,
    managed_levels: Vec<(Uuid, Level)>,
}

/// Process-local store implementing every repository port.
///
/// Enforces the same unique keys, foreign keys and cascades as the Postgres
/// schema. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl ClassRepository for InMemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<class::Model>> {
        let state = self.lock()?;
        let mut classes = state.classes.clone();
        classes.sort_by(|a, b| (a.level, &a.section).cmp(&(b.level, &b.section)));
        Ok(classes)
    }

    async fn find_by_id(&self, class_id: Uuid) -> StoreResult<Option<class::Model>> {
        let state = self.lock()?;
        Ok(state.classes.iter().find(|c| c.class_id == class_id).cloned())
    }

    async fn find_latest_for_level(&self, level: Level) -> StoreResult<Option<class::Model>> {
        let state = self.lock()?;
        Ok(state
            .classes
            .iter()
            .filter(|c| c.level == level)
            .max_by(|a, b| a.section.cmp(&b.section))
            .cloned())
    }

    async fn insert(&self, level: Level, section: String) -> StoreResult<class::Model> {
        let mut state = self.lock()?;
        if state
            .classes
            .iter()
            .any(|c| c.level == level && c.section == section)
        {
            return Err(StoreError::UniqueViolation(
                "uq_class_level_section".to_string(),
            ));
        }

        let model = class::Model {
            class_id: Uuid::new_v4(),
            level,
            section,
            name: None,
        };
        state.classes.push(model.clone());
        Ok(model)
    }

    async fn rename(&self, class_id: Uuid, name: String) -> StoreResult<class::Model> {
        let mut state = self.lock()?;
        if state
            .classes
            .iter()
            .any(|c| c.class_id != class_id && c.name.as_deref() == Some(name.as_str()))
        {
            return Err(StoreError::UniqueViolation("class_name_key".to_string()));
        }

        let class = state
            .classes
            .iter_mut()
            .find(|c| c.class_id == class_id)
            .ok_or(StoreError::NotFound)?;
        class.name = Some(name);
        Ok(class.clone())
    }

    async fn delete(&self, class_id: Uuid) -> StoreResult<()> {
        let mut state = self.lock()?;
        let before = state.classes.len();
        state.classes.retain(|c| c.class_id != class_id);
        if state.classes.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for InMemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<subject::Model>> {
        let state = self.lock()?;
        let mut subjects = state.subjects.clone();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn find_by_id(&self, subject_id: Uuid) -> StoreResult<Option<subject::Model>> {
        let state = self.lock()?;
        Ok(state
            .subjects
            .iter()
            .find(|s| s.subject_id == subject_id)
            .cloned())
    }

    async fn insert(
        &self,
        name: String,
        day_off: Option<DayOfWeek>,
    ) -> StoreResult<subject::Model> {
        let mut state = self.lock()?;
        if state.subjects.iter().any(|s| s.name == name) {
            return Err(StoreError::UniqueViolation("subject_name_key".to_string()));
        }

        let model = subject::Model {
            subject_id: Uuid::new_v4(),
            name,
            day_off,
        };
        state.subjects.push(model.clone());
        Ok(model)
    }

    async fn update(
        &self,
        subject_id: Uuid,
        updates: SubjectUpdate,
    ) -> StoreResult<subject::Model> {
        let mut state = self.lock()?;
        if let Some(name) = &updates.name {
            if state
                .subjects
                .iter()
                .any(|s| s.subject_id != subject_id && &s.name == name)
            {
                return Err(StoreError::UniqueViolation("subject_name_key".to_string()));
            }
        }

        let subject = state
            .subjects
            .iter_mut()
            .find(|s| s.subject_id == subject_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(name) = updates.name {
            subject.name = name;
        }
        if let Some(day_off) = updates.day_off {
            subject.day_off = day_off;
        }
        Ok(subject.clone())
    }

    async fn delete_cascade(&self, subject_id: Uuid) -> StoreResult<u64> {
        let mut state = self.lock()?;
        if !state.subjects.iter().any(|s| s.subject_id == subject_id) {
            return Err(StoreError::NotFound);
        }

        let before = state.courses.len();
        state.courses.retain(|c| c.subject_id != subject_id);
        let removed_courses = (before - state.courses.len()) as u64;

        state.user_subjects.retain(|(_, s)| *s != subject_id);
        state.subjects.retain(|s| s.subject_id != subject_id);
        Ok(removed_courses)
    }

    async fn ensure_by_names(&self, names: Vec<String>) -> StoreResult<Vec<subject::Model>> {
        let mut state = self.lock()?;
        let mut subjects = Vec::with_capacity(names.len());
        for name in names {
            let existing = state.subjects.iter().find(|s| s.name == name).cloned();
            let subject = match existing {
                Some(subject) => subject,
                None => {
                    let model = subject::Model {
                        subject_id: Uuid::new_v4(),
                        name,
                        day_off: None,
                    };
                    state.subjects.push(model.clone());
                    model
                }
            };
            if !subjects
                .iter()
                .any(|s: &subject::Model| s.subject_id == subject.subject_id)
            {
                subjects.push(subject);
            }
        }
        Ok(subjects)
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn find_all(&self) -> StoreResult<Vec<course::Model>> {
        let state = self.lock()?;
        Ok(state.courses.clone())
    }

    async fn find_by_level(&self, level: Level) -> StoreResult<Vec<course::Model>> {
        let state = self.lock()?;
        Ok(state
            .courses
            .iter()
            .filter(|c| c.level == level)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, course_id: Uuid) -> StoreResult<Option<course::Model>> {
        let state = self.lock()?;
        Ok(state
            .courses
            .iter()
            .find(|c| c.course_id == course_id)
            .cloned())
    }

    async fn insert(
        &self,
        level: Level,
        subject_id: Uuid,
        hours_per_week: f64,
    ) -> StoreResult<course::Model> {
        let mut state = self.lock()?;
        if !state.subjects.iter().any(|s| s.subject_id == subject_id) {
            return Err(StoreError::ForeignKeyViolation(
                "fk_course_subject".to_string(),
            ));
        }
        if state
            .courses
            .iter()
            .any(|c| c.level == level && c.subject_id == subject_id)
        {
            return Err(StoreError::UniqueViolation(
                "uq_course_level_subject".to_string(),
            ));
        }

        let model = course::Model {
            course_id: Uuid::new_v4(),
            level,
            subject_id,
            hours_per_week,
        };
        state.courses.push(model.clone());
        Ok(model)
    }

    async fn update_hours(
        &self,
        course_id: Uuid,
        hours_per_week: f64,
    ) -> StoreResult<course::Model> {
        let mut state = self.lock()?;
        let course = state
            .courses
            .iter_mut()
            .find(|c| c.course_id == course_id)
            .ok_or(StoreError::NotFound)?;
        course.hours_per_week = hours_per_week;
        Ok(course.clone())
    }

    async fn delete(&self, course_id: Uuid) -> StoreResult<()> {
        let mut state = self.lock()?;
        let before = state.courses.len();
        state.courses.retain(|c| c.course_id != course_id);
        if state.courses.len() == before {
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
        let mut state = self.lock()?;
        if !state.subjects.iter().any(|s| s.subject_id == subject_id) {
            return Err(StoreError::ForeignKeyViolation(
                "fk_course_subject".to_string(),
            ));
        }

        if let Some(course) = state
            .courses
            .iter_mut()
            .find(|c| c.level == level && c.subject_id == subject_id)
        {
            course.hours_per_week = hours_per_week;
            return Ok(UpsertedCourse {
                course: course.clone(),
                created: false,
            });
        }

        let model = course::Model {
            course_id: Uuid::new_v4(),
            level,
            subject_id,
            hours_per_week,
        };
        state.courses.push(model.clone());
        Ok(UpsertedCourse {
            course: model,
            created: true,
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, user_id: Uuid) -> StoreResult<Option<user::Model>> {
        let state = self.lock()?;
        Ok(state.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_by_email(&self, email: String) -> StoreResult<Option<user::Model>> {
        let state = self.lock()?;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_teachers(&self) -> StoreResult<Vec<user::Model>> {
        let state = self.lock()?;
        // newest insert first when timestamps tie
        let mut teachers: Vec<user::Model> = state
            .users
            .iter()
            .rev()
            .filter(|u| u.role == RoleEnum::Teacher)
            .cloned()
            .collect();
        teachers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(teachers)
    }

    async fn insert(&self, new_user: NewUser) -> StoreResult<user::Model> {
        let mut state = self.lock()?;
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::UniqueViolation("user_email_key".to_string()));
        }

        let now = Utc::now().naive_utc();
        let model = user::Model {
            user_id: Uuid::new_v4(),
            email: new_user.email,
            password: new_user.password_hash,
            role: new_user.role,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            created_at: now,
            updated_at: now,
        };
        state.users.push(model.clone());
        Ok(model)
    }

    async fn update_names(
        &self,
        user_id: Uuid,
        first_name: String,
        last_name: String,
    ) -> StoreResult<user::Model> {
        let mut state = self.lock()?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or(StoreError::NotFound)?;
        user.first_name = first_name;
        user.last_name = last_name;
        user.updated_at = Utc::now().naive_utc();
        Ok(user.clone())
    }

    async fn subjects_of(&self, user_id: Uuid) -> StoreResult<Vec<subject::Model>> {
        let state = self.lock()?;
        let mut subjects: Vec<subject::Model> = state
            .subjects
            .iter()
            .filter(|s| {
                state
                    .user_subjects
                    .iter()
                    .any(|(u, id)| *u == user_id && *id == s.subject_id)
            })
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn replace_subjects(&self, user_id: Uuid, subject_ids: Vec<Uuid>) -> StoreResult<()> {
        let mut state = self.lock()?;
        if !state.users.iter().any(|u| u.user_id == user_id) {
            return Err(StoreError::NotFound);
        }
        if let Some(missing) = subject_ids
            .iter()
            .find(|id| !state.subjects.iter().any(|s| s.subject_id == **id))
        {
            return Err(StoreError::ForeignKeyViolation(format!(
                "user_subject.subject_id {missing}"
            )));
        }

        state.user_subjects.retain(|(u, _)| *u != user_id);
        for subject_id in subject_ids {
            if !state.user_subjects.contains(&(user_id, subject_id)) {
                state.user_subjects.push((user_id, subject_id));
            }
        }
        Ok(())
    }

    async fn managed_levels_of(&self, user_id: Uuid) -> StoreResult<Vec<Level>> {
        let state = self.lock()?;
        let mut levels: Vec<Level> = state
            .managed_levels
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, level)| *level)
            .collect();
        levels.sort();
        Ok(levels)
    }

    async fn replace_managed_levels(
        &self,
        user_id: Uuid,
        levels: Vec<Level>,
    ) -> StoreResult<()> {
        let mut state = self.lock()?;
        if !state.users.iter().any(|u| u.user_id == user_id) {
            return Err(StoreError::NotFound);
        }

        state.managed_levels.retain(|(u, _)| *u != user_id);
        for level in levels {
            if !state.managed_levels.contains(&(user_id, level)) {
                state.managed_levels.push((user_id, level));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subject_cascade_removes_courses_and_memberships() {
        let store = InMemoryStore::new();
        let math = SubjectRepository::insert(&store, "Mathématiques".to_string(), None)
            .await
            .unwrap();
        let french = SubjectRepository::insert(&store, "Français".to_string(), None)
            .await
            .unwrap();
        CourseRepository::insert(&store, Level::Sixieme, math.subject_id, 4.0)
            .await
            .unwrap();
        CourseRepository::insert(&store, Level::Cinquieme, math.subject_id, 3.5)
            .await
            .unwrap();
        CourseRepository::insert(&store, Level::Sixieme, french.subject_id, 5.0)
            .await
            .unwrap();

        let removed = store.delete_cascade(math.subject_id).await.unwrap();

        assert_eq!(removed, 2);
        let remaining = CourseRepository::find_all(&store).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].subject_id, french.subject_id);
        assert_eq!(
            store.delete_cascade(math.subject_id).await,
            Err(StoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn course_for_unknown_subject_violates_foreign_key() {
        let store = InMemoryStore::new();
        let result = CourseRepository::insert(&store, Level::Sixieme, Uuid::new_v4(), 2.0).await;
        assert!(matches!(result, Err(StoreError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn duplicate_section_violates_unique_key() {
        let store = InMemoryStore::new();
        ClassRepository::insert(&store, Level::Quatrieme, "A".to_string())
            .await
            .unwrap();
        let result = ClassRepository::insert(&store, Level::Quatrieme, "A".to_string()).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn ensure_by_names_reuses_existing_subjects() {
        let store = InMemoryStore::new();
        let math = SubjectRepository::insert(&store, "Mathématiques".to_string(), None)
            .await
            .unwrap();

        let subjects = store
            .ensure_by_names(vec!["Physique".to_string(), "Mathématiques".to_string()])
            .await
            .unwrap();

        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].name, "Physique");
        assert_eq!(subjects[1].subject_id, math.subject_id);
        assert_eq!(SubjectRepository::find_all(&store).await.unwrap().len(), 2);
    }
}
