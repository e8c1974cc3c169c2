//! Weekly-hour quotas of subjects per level.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::Level;
use crate::entities::{course, subject};
use crate::error::AppError;
use crate::repositories::{CourseRepository, StoreError, SubjectRepository};

#[derive(Debug, Clone, PartialEq)]
pub struct CourseWithSubject {
    pub course: course::Model,
    pub subject: subject::Model,
}

/// Outcome of one target level in an apply-to-levels batch.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelResult {
    Applied {
        level: Level,
        course: course::Model,
        created: bool,
    },
    Failed {
        level: Level,
        message: String,
    },
}

impl LevelResult {
    pub fn level(&self) -> Level {
        match self {
            Self::Applied { level, .. } | Self::Failed { level, .. } => *level,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplyOutcome {
    Complete,
    Partial,
    Failed,
}

impl ApplyOutcome {
    fn from_results(results: &[LevelResult]) -> Self {
        let applied = results.iter().filter(|r| r.is_applied()).count();
        if applied == results.len() {
            Self::Complete
        } else if applied == 0 {
            Self::Failed
        } else {
            Self::Partial
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplyToLevelsReport {
    pub subject: subject::Model,
    pub hours_per_week: f64,
    pub outcome: ApplyOutcome,
    pub results: Vec<LevelResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectOverview {
    pub subject: subject::Model,
    /// Ordered by level.
    pub courses: Vec<course::Model>,
}

/// Management sheet of one level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCourseSheet {
    pub level: Level,
    /// Ordered by subject name.
    pub courses: Vec<CourseWithSubject>,
    /// Subjects without a quota at this level, ordered by name.
    pub available_subjects: Vec<subject::Model>,
}

pub fn validate_hours(hours_per_week: f64) -> Result<f64, AppError> {
    if !hours_per_week.is_finite() || hours_per_week < 0.0 {
        return Err(AppError::bad_request(
            "hoursPerWeek must be a finite number greater than or equal to 0",
        ));
    }
    Ok(hours_per_week)
}

#[derive(Clone)]
pub struct CourseAllocationManager {
    courses: Arc<dyn CourseRepository>,
    subjects: Arc<dyn SubjectRepository>,
}

impl CourseAllocationManager {
    pub fn new(courses: Arc<dyn CourseRepository>, subjects: Arc<dyn SubjectRepository>) -> Self {
        Self { courses, subjects }
    }

    async fn subject(&self, subject_id: Uuid) -> Result<subject::Model, AppError> {
        self.subjects
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::not_found("Subject not found"))
    }

    pub async fn create_course(
        &self,
        level: Level,
        subject_id: Uuid,
        hours_per_week: f64,
    ) -> Result<CourseWithSubject, AppError> {
        let hours_per_week = validate_hours(hours_per_week)?;
        let subject = self.subject(subject_id).await?;

        let course = self
            .courses
            .insert(level, subject_id, hours_per_week)
            .await
            .map_err(|err| match err {
                StoreError::ForeignKeyViolation(_) => AppError::not_found("Subject not found"),
                StoreError::UniqueViolation(_) => AppError::conflict(format!(
                    "{} already has a quota for level {}",
                    subject.name,
                    level.display_name()
                )),
                other => other.into(),
            })?;

        tracing::info!(
            level = %level,
            subject = %subject.name,
            hours_per_week,
            "course created"
        );
        Ok(CourseWithSubject { course, subject })
    }

    pub async fn update_hours(
        &self,
        course_id: Uuid,
        hours_per_week: f64,
    ) -> Result<CourseWithSubject, AppError> {
        let hours_per_week = validate_hours(hours_per_week)?;

        let course = self
            .courses
            .update_hours(course_id, hours_per_week)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("Course not found"),
                other => other.into(),
            })?;
        let subject = self.subject(course.subject_id).await?;

        Ok(CourseWithSubject { course, subject })
    }

    pub async fn delete_course(&self, course_id: Uuid) -> Result<(), AppError> {
        self.courses
            .delete(course_id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("Course not found"),
                other => other.into(),
            })
    }

    /// Sets the same quota of one subject on several levels.
    ///
    /// Levels are upserted one by one; a failing level does not stop the
    /// others and is reported in the result list.
    pub async fn apply_to_levels(
        &self,
        subject_id: Uuid,
        hours_per_week: f64,
        target_levels: Vec<Level>,
    ) -> Result<ApplyToLevelsReport, AppError> {
        let hours_per_week = validate_hours(hours_per_week)?;
        if target_levels.is_empty() {
            return Err(AppError::bad_request("At least one target level is required"));
        }

        let mut levels: Vec<Level> = Vec::with_capacity(target_levels.len());
        for level in target_levels {
            if !levels.contains(&level) {
                levels.push(level);
            }
        }

        let subject = self.subject(subject_id).await?;

        let mut results = Vec::with_capacity(levels.len());
        for level in levels {
            let result = match self.courses.upsert(level, subject_id, hours_per_week).await {
                Ok(upserted) => LevelResult::Applied {
                    level,
                    course: upserted.course,
                    created: upserted.created,
                },
                Err(err) => {
                    tracing::warn!(level = %level, error = %err, "failed to apply quota to level");
                    let message = match err {
                        StoreError::ForeignKeyViolation(_) => "Subject not found".to_string(),
                        other => AppError::from(other).public_message(),
                    };
                    LevelResult::Failed { level, message }
                }
            };
            results.push(result);
        }

        let outcome = ApplyOutcome::from_results(&results);
        tracing::info!(
            subject = %subject.name,
            hours_per_week,
            outcome = ?outcome,
            "quota applied to levels"
        );

        Ok(ApplyToLevelsReport {
            subject,
            hours_per_week,
            outcome,
            results,
        })
    }

    /// Every subject with its quotas, subjects by name and courses by level.
    pub async fn overview(&self) -> Result<Vec<SubjectOverview>, AppError> {
        let subjects = self.subjects.find_all().await?;
        let courses = self.courses.find_all().await?;

        Ok(subjects
            .into_iter()
            .map(|subject| {
                let mut subject_courses: Vec<course::Model> = courses
                    .iter()
                    .filter(|c| c.subject_id == subject.subject_id)
                    .cloned()
                    .collect();
                subject_courses.sort_by_key(|c| c.level);
                SubjectOverview {
                    subject,
                    courses: subject_courses,
                }
            })
            .collect())
    }

    pub async fn level_courses(&self, level: Level) -> Result<LevelCourseSheet, AppError> {
        let subjects = self.subjects.find_all().await?;
        let level_courses = self.courses.find_by_level(level).await?;

        let mut courses = Vec::with_capacity(level_courses.len());
        for course in level_courses {
            match subjects.iter().find(|s| s.subject_id == course.subject_id) {
                Some(subject) => courses.push(CourseWithSubject {
                    course,
                    subject: subject.clone(),
                }),
                None => tracing::warn!(course_id = %course.course_id, "course without subject"),
            }
        }
        courses.sort_by(|a, b| a.subject.name.cmp(&b.subject.name));

        let available_subjects = subjects
            .into_iter()
            .filter(|s| !courses.iter().any(|c| c.subject.subject_id == s.subject_id))
            .collect();

        Ok(LevelCourseSheet {
            level,
            courses,
            available_subjects,
        })
    }
}
