//! Section letters of each level (`6ème A`, `6ème B`, ...).

use std::sync::Arc;

use uuid::Uuid;

use crate::entities::class;
use crate::entities::sea_orm_active_enums::Level;
use crate::error::AppError;
use crate::repositories::{ClassRepository, StoreError};

/// Bounded `'A'..='Z'` mapping between section letters and their index.
pub struct SectionSequence;

impl SectionSequence {
    pub const CAPACITY: u8 = 26;

    pub fn letter(index: u8) -> Option<char> {
        (index < Self::CAPACITY).then(|| char::from(b'A' + index))
    }

    pub fn index(section: &str) -> Option<u8> {
        let mut chars = section.chars();
        match (chars.next(), chars.next()) {
            (Some(letter @ 'A'..='Z'), None) => Some(letter as u8 - b'A'),
            _ => None,
        }
    }

    /// Section following `latest`, or `'A'` for an empty level.
    ///
    /// `Ok(None)` means the sequence is exhausted.
    pub fn next_after(latest: Option<&str>) -> Result<Option<char>, AppError> {
        match latest {
            None => Ok(Self::letter(0)),
            Some(section) => {
                let index = Self::index(section).ok_or_else(|| {
                    AppError::internal(format!("stored section {section:?} is not a letter"))
                })?;
                Ok(Self::letter(index + 1))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelSections {
    pub level: Level,
    pub classes: Vec<class::Model>,
}

#[derive(Clone)]
pub struct SectionAllocator {
    classes: Arc<dyn ClassRepository>,
}

impl SectionAllocator {
    pub fn new(classes: Arc<dyn ClassRepository>) -> Self {
        Self { classes }
    }

    pub async fn add_section(&self, level: Level) -> Result<class::Model, AppError> {
        let latest = self.classes.find_latest_for_level(level).await?;
        let section = SectionSequence::next_after(latest.as_ref().map(|c| c.section.as_str()))?
            .ok_or_else(|| {
                AppError::conflict(format!(
                    "Level {} already has {} sections",
                    level.display_name(),
                    SectionSequence::CAPACITY
                ))
            })?;

        let class = self
            .classes
            .insert(level, section.to_string())
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation(_) => AppError::conflict(format!(
                    "Section {section} already exists for level {}",
                    level.display_name()
                )),
                other => other.into(),
            })?;

        tracing::info!(level = %level, section = %class.section, "section added");
        Ok(class)
    }

    pub async fn remove_latest_section(&self, level: Level) -> Result<class::Model, AppError> {
        let latest = self
            .classes
            .find_latest_for_level(level)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No class found for level {}", level.display_name()))
            })?;

        self.classes
            .delete(latest.class_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("Class not found"),
                other => other.into(),
            })?;

        tracing::info!(level = %level, section = %latest.section, "latest section removed");
        Ok(latest)
    }

    pub async fn rename_class(&self, class_id: Uuid, name: &str) -> Result<class::Model, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Class name must not be empty"));
        }

        self.classes
            .rename(class_id, name.to_string())
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("Class not found"),
                StoreError::UniqueViolation(_) => {
                    AppError::conflict(format!("Class name {name:?} is already used"))
                }
                other => other.into(),
            })
    }

    pub async fn delete_class(&self, class_id: Uuid) -> Result<(), AppError> {
        self.classes
            .delete(class_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("Class not found"),
                other => other.into(),
            })
    }

    pub async fn list_classes(&self) -> Result<Vec<class::Model>, AppError> {
        Ok(self.classes.find_all().await?)
    }

    /// Every level in order, including levels without any section.
    pub async fn list_classes_by_level(&self) -> Result<Vec<LevelSections>, AppError> {
        let classes = self.classes.find_all().await?;
        Ok(Level::ALL
            .into_iter()
            .map(|level| LevelSections {
                level,
                classes: classes.iter().filter(|c| c.level == level).cloned().collect(),
            })
            .collect())
    }
}
