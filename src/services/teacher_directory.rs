//! Teacher accounts managed by the principal.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{Level, RoleEnum};
use crate::entities::{subject, user};
use crate::error::AppError;
use crate::repositories::{NewUser, StoreError, UserRepository};
use crate::services::subject_directory::{SubjectDirectory, normalize_subject_names};

/// Values applied to every teacher account created by the principal.
#[derive(Debug, Clone)]
pub struct TeacherDefaults {
    pub default_password: String,
    pub email_domain: String,
    pub password_cost: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user: user::Model,
    /// Ordered by name.
    pub subjects: Vec<subject::Model>,
    /// Ordered by level.
    pub managed_levels: Vec<Level>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTeacher {
    /// Generated from the names and first subject when absent.
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub subjects: Vec<String>,
    pub managed_levels: Vec<Level>,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherChanges {
    pub first_name: String,
    pub last_name: String,
    pub subjects: Vec<String>,
    /// `None` clears the managed levels.
    pub managed_levels: Option<Vec<Level>>,
}

/// Lower-cases, strips combining marks after NFD decomposition and keeps
/// only `[a-z0-9]`.
pub fn email_part(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// `first.last.subject`, before any de-duplication suffix.
pub fn email_local_part(first_name: &str, last_name: &str, subject: &str) -> String {
    [first_name, last_name, subject]
        .iter()
        .map(|part| email_part(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn required_name(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn dedup_levels(levels: Vec<Level>) -> Vec<Level> {
    let mut unique: Vec<Level> = Vec::with_capacity(levels.len());
    for level in levels {
        if !unique.contains(&level) {
            unique.push(level);
        }
    }
    unique
}

#[derive(Clone)]
pub struct TeacherDirectory {
    users: Arc<dyn UserRepository>,
    subjects: SubjectDirectory,
    defaults: TeacherDefaults,
}

impl TeacherDirectory {
    pub fn new(
        users: Arc<dyn UserRepository>,
        subjects: SubjectDirectory,
        defaults: TeacherDefaults,
    ) -> Self {
        Self {
            users,
            subjects,
            defaults,
        }
    }

    async fn generate_email(&self, local_part: &str) -> Result<String, AppError> {
        if local_part.is_empty() {
            return Err(AppError::bad_request(
                "Cannot generate an e-mail address from the given names",
            ));
        }

        let domain = &self.defaults.email_domain;
        let mut candidate = format!("{local_part}@{domain}");
        let mut counter = 2;
        while self.users.find_by_email(candidate.clone()).await?.is_some() {
            candidate = format!("{local_part}{counter}@{domain}");
            counter += 1;
        }
        Ok(candidate)
    }

    async fn load_profile(&self, user: user::Model) -> Result<UserProfile, AppError> {
        let subjects = self.users.subjects_of(user.user_id).await?;
        let managed_levels = self.users.managed_levels_of(user.user_id).await?;
        Ok(UserProfile {
            user,
            subjects,
            managed_levels,
        })
    }

    pub async fn user_profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.load_profile(user).await
    }

    pub async fn create_teacher(&self, teacher: NewTeacher) -> Result<UserProfile, AppError> {
        let first_name = required_name(&teacher.first_name, "firstName")?;
        let last_name = required_name(&teacher.last_name, "lastName")?;
        let subject_names = normalize_subject_names(teacher.subjects);
        let first_subject = subject_names
            .first()
            .cloned()
            .ok_or_else(|| AppError::bad_request("At least one subject is required"))?;

        let email = match teacher.email.map(|e| e.trim().to_string()) {
            Some(email) if !email.is_empty() => {
                if self.users.find_by_email(email.clone()).await?.is_some() {
                    return Err(AppError::conflict("A user with this e-mail already exists"));
                }
                email
            }
            _ => {
                let local_part = email_local_part(&first_name, &last_name, &first_subject);
                self.generate_email(&local_part).await?
            }
        };

        let password_hash =
            bcrypt::hash(&self.defaults.default_password, self.defaults.password_cost)
                .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

        let user = self
            .users
            .insert(NewUser {
                email,
                password_hash,
                role: RoleEnum::Teacher,
                first_name,
                last_name,
            })
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation(_) => {
                    AppError::conflict("A user with this e-mail already exists")
                }
                other => other.into(),
            })?;

        self.subjects
            .set_user_subjects(user.user_id, subject_names)
            .await?;
        self.users
            .replace_managed_levels(user.user_id, dedup_levels(teacher.managed_levels))
            .await?;

        tracing::info!(user_id = %user.user_id, email = %user.email, "teacher created");
        self.load_profile(user).await
    }

    pub async fn update_teacher(
        &self,
        user_id: Uuid,
        changes: TeacherChanges,
    ) -> Result<UserProfile, AppError> {
        let first_name = required_name(&changes.first_name, "firstName")?;
        let last_name = required_name(&changes.last_name, "lastName")?;
        if normalize_subject_names(changes.subjects.clone()).is_empty() {
            return Err(AppError::bad_request("At least one subject is required"));
        }

        let user = self
            .users
            .update_names(user_id, first_name, last_name)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("User not found"),
                other => other.into(),
            })?;

        self.subjects
            .set_user_subjects(user_id, changes.subjects)
            .await?;
        self.users
            .replace_managed_levels(
                user_id,
                dedup_levels(changes.managed_levels.unwrap_or_default()),
            )
            .await?;

        tracing::info!(%user_id, "teacher updated");
        self.load_profile(user).await
    }

    /// Teachers, most recently created first.
    pub async fn list_teachers(&self) -> Result<Vec<UserProfile>, AppError> {
        let teachers = self.users.find_teachers().await?;
        let mut profiles = Vec::with_capacity(teachers.len());
        for teacher in teachers {
            profiles.push(self.load_profile(teacher).await?);
        }
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;
    use rstest::rstest;

    fn directory(store: &InMemoryStore) -> TeacherDirectory {
        let subjects = SubjectDirectory::new(Arc::new(store.clone()), Arc::new(store.clone()));
        TeacherDirectory::new(
            Arc::new(store.clone()),
            subjects,
            TeacherDefaults {
                default_password: "passer123".to_string(),
                email_domain: "gmail.com".to_string(),
                password_cost: 4,
            },
        )
    }

    fn new_teacher(first_name: &str, last_name: &str, subjects: &[&str]) -> NewTeacher {
        NewTeacher {
            email: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            managed_levels: vec![],
        }
    }

    #[rstest]
    #[case("Éloïse", "Lefèvre", "Français", "eloise.lefevre.francais")]
    #[case("Jean-Luc", "D'Arc", "SVT", "jeanluc.darc.svt")]
    #[case("Anaïs", "Nguyen", "Histoire-Géo 2", "anais.nguyen.histoiregeo2")]
    #[case("Şeyma", "Dvořák", "Ōtaké", "seyma.dvorak.otake")]
    fn email_parts_fold_accents(
        #[case] first: &str,
        #[case] last: &str,
        #[case] subject: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(email_local_part(first, last, subject), expected);
    }

    #[rstest]
    #[case("Şeyma", "seyma")]
    #[case("Dvořák", "dvorak")]
    #[case("Ōtaké", "otake")]
    #[case("ÆLFRED", "lfred")]
    fn email_part_folds_any_decomposable_letter(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(email_part(value), expected);
    }

    #[tokio::test]
    async fn generated_email_is_deduplicated() {
        let store = InMemoryStore::new();
        let directory = directory(&store);

        let first = directory
            .create_teacher(new_teacher("Éloïse", "Lefèvre", &["Français"]))
            .await
            .unwrap();
        let second = directory
            .create_teacher(new_teacher("Eloise", "Lefevre", &["Français", "Latin"]))
            .await
            .unwrap();
        let third = directory
            .create_teacher(new_teacher("Eloise", "Lefevre", &["Français"]))
            .await
            .unwrap();

        assert_eq!(first.user.email, "eloise.lefevre.francais@gmail.com");
        assert_eq!(second.user.email, "eloise.lefevre.francais2@gmail.com");
        assert_eq!(third.user.email, "eloise.lefevre.francais3@gmail.com");
    }

    #[tokio::test]
    async fn created_teacher_has_default_password_and_role() {
        let store = InMemoryStore::new();
        let mut teacher = new_teacher("Paul", "Martin", &["Physique", "Chimie"]);
        teacher.email = Some("paul.martin@ecole.fr".to_string());
        teacher.managed_levels = vec![Level::Troisieme, Level::Sixieme, Level::Troisieme];

        let profile = directory(&store).create_teacher(teacher).await.unwrap();

        assert_eq!(profile.user.email, "paul.martin@ecole.fr");
        assert_eq!(profile.user.role, RoleEnum::Teacher);
        assert!(bcrypt::verify("passer123", &profile.user.password).unwrap());
        let names: Vec<&str> = profile.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Chimie", "Physique"]);
        assert_eq!(profile.managed_levels, vec![Level::Sixieme, Level::Troisieme]);
    }

    #[tokio::test]
    async fn existing_email_is_conflict() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let mut teacher = new_teacher("Paul", "Martin", &["Physique"]);
        teacher.email = Some("paul.martin@ecole.fr".to_string());
        directory.create_teacher(teacher.clone()).await.unwrap();

        let err = directory.create_teacher(teacher).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[rstest]
    #[case(new_teacher("", "Martin", &["Physique"]))]
    #[case(new_teacher("Paul", " ", &["Physique"]))]
    #[case(new_teacher("Paul", "Martin", &[]))]
    #[case(new_teacher("Paul", "Martin", &["  "]))]
    #[tokio::test]
    async fn incomplete_teacher_is_bad_request(#[case] teacher: NewTeacher) {
        let store = InMemoryStore::new();
        let err = directory(&store).create_teacher(teacher).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_replaces_subjects_and_levels() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        let mut teacher = new_teacher("Paul", "Martin", &["Physique"]);
        teacher.managed_levels = vec![Level::Sixieme];
        let created = directory.create_teacher(teacher).await.unwrap();

        let updated = directory
            .update_teacher(
                created.user.user_id,
                TeacherChanges {
                    first_name: " Paul ".to_string(),
                    last_name: "Durand".to_string(),
                    subjects: vec!["Technologie".to_string()],
                    managed_levels: Some(vec![Level::Quatrieme]),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.user.first_name, "Paul");
        assert_eq!(updated.user.last_name, "Durand");
        assert_eq!(updated.subjects.len(), 1);
        assert_eq!(updated.subjects[0].name, "Technologie");
        assert_eq!(updated.managed_levels, vec![Level::Quatrieme]);

        let cleared = directory
            .update_teacher(
                created.user.user_id,
                TeacherChanges {
                    first_name: "Paul".to_string(),
                    last_name: "Durand".to_string(),
                    subjects: vec!["Technologie".to_string()],
                    managed_levels: None,
                },
            )
            .await
            .unwrap();
        assert!(cleared.managed_levels.is_empty());
    }

    #[tokio::test]
    async fn update_unknown_teacher_is_not_found() {
        let store = InMemoryStore::new();
        let err = directory(&store)
            .update_teacher(
                Uuid::new_v4(),
                TeacherChanges {
                    first_name: "Paul".to_string(),
                    last_name: "Durand".to_string(),
                    subjects: vec!["Technologie".to_string()],
                    managed_levels: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn teachers_are_listed_newest_first() {
        let store = InMemoryStore::new();
        let directory = directory(&store);
        directory
            .create_teacher(new_teacher("Alice", "Bernard", &["Anglais"]))
            .await
            .unwrap();
        directory
            .create_teacher(new_teacher("Bruno", "Petit", &["Musique"]))
            .await
            .unwrap();
        UserRepository::insert(
            &store,
            NewUser {
                email: "principal@test.com".to_string(),
                password_hash: "hash".to_string(),
                role: RoleEnum::Principal,
                first_name: "Claire".to_string(),
                last_name: "Moreau".to_string(),
            },
        )
        .await
        .unwrap();

        let teachers = directory.list_teachers().await.unwrap();

        let names: Vec<&str> = teachers.iter().map(|t| t.user.first_name.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Alice"]);
        assert_eq!(teachers[0].subjects[0].name, "Musique");
    }
}
