use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::entities::sea_orm_active_enums::{DayOfWeek, Level, RoleEnum};
use crate::error::ErrorResponse;
use crate::routes;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "School administration API",
        description = "Classes, subjects, weekly-hour allocations and teacher accounts."
    ),
    paths(
        routes::health::route::health,
        routes::auth::route::login,
        routes::profile::route::get_profile,
        routes::classes::route::list_classes,
        routes::classes::route::list_classes_by_level,
        routes::classes::route::add_section,
        routes::classes::route::remove_latest_section,
        routes::classes::route::rename_class,
        routes::classes::route::delete_class,
        routes::subjects::route::list_subjects,
        routes::subjects::route::create_subject,
        routes::subjects::route::update_subject,
        routes::subjects::route::delete_subject,
        routes::subjects::route::get_overview,
        routes::courses::route::create_course,
        routes::courses::route::update_course,
        routes::courses::route::delete_course,
        routes::courses::route::apply_to_levels,
        routes::courses::route::get_level_courses,
        routes::users::route::list_teachers,
        routes::users::route::create_teacher,
        routes::users::route::update_teacher,
        routes::users::route::set_user_subjects,
    ),
    components(schemas(ErrorResponse, Level, DayOfWeek, RoleEnum)),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "Login"),
        (name = "Profile", description = "Current user"),
        (name = "Classes", description = "Level sections"),
        (name = "Subjects", description = "Subjects and the allocation overview"),
        (name = "Courses", description = "Weekly-hour quotas per level"),
        (name = "Users", description = "Teacher accounts")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/classes/latest",
            "/api/v1/courses/apply-to-levels",
            "/api/v1/levels/{level}/courses",
            "/api/v1/users/{user_id}/subjects",
            "/api/v1/subjects/overview",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
