use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repositories::{
    ClassRepository, CourseRepository, InMemoryStore, SeaOrmClassRepository,
    SeaOrmCourseRepository, SeaOrmSubjectRepository, SeaOrmUserRepository, SubjectRepository,
    UserRepository,
};
use crate::services::{
    CourseAllocationManager, SectionAllocator, SubjectDirectory, TeacherDefaults,
    TeacherDirectory,
};
use crate::utils::jwt::JwtManager;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub sections: SectionAllocator,
    pub courses: CourseAllocationManager,
    pub subjects: SubjectDirectory,
    pub teachers: TeacherDirectory,
    pub users: Arc<dyn UserRepository>,
    pub jwt: Arc<JwtManager>,
    pub app_env: String,
}

impl AppState {
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        subjects: Arc<dyn SubjectRepository>,
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
        jwt: JwtManager,
        teacher_defaults: TeacherDefaults,
        app_env: impl Into<String>,
    ) -> Self {
        let subject_directory = SubjectDirectory::new(subjects.clone(), users.clone());
        Self {
            sections: SectionAllocator::new(classes),
            courses: CourseAllocationManager::new(courses, subjects),
            teachers: TeacherDirectory::new(
                users.clone(),
                subject_directory.clone(),
                teacher_defaults,
            ),
            subjects: subject_directory,
            users,
            jwt: Arc::new(jwt),
            app_env: app_env.into(),
        }
    }

    pub fn with_database(
        db: DatabaseConnection,
        jwt: JwtManager,
        teacher_defaults: TeacherDefaults,
        app_env: impl Into<String>,
    ) -> Self {
        Self::new(
            Arc::new(SeaOrmClassRepository::new(db.clone())),
            Arc::new(SeaOrmSubjectRepository::new(db.clone())),
            Arc::new(SeaOrmCourseRepository::new(db.clone())),
            Arc::new(SeaOrmUserRepository::new(db)),
            jwt,
            teacher_defaults,
            app_env,
        )
    }

    pub fn in_memory(
        store: InMemoryStore,
        jwt: JwtManager,
        teacher_defaults: TeacherDefaults,
        app_env: impl Into<String>,
    ) -> Self {
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            jwt,
            teacher_defaults,
            app_env,
        )
    }
}
