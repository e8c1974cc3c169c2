use crate::api_docs::ApiDoc;
use crate::middleware::http_logger::http_logger;
use crate::routes;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use http::header;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    ServiceBuilderExt,
    cors::{AllowOrigin, Any, CorsLayer},
    propagate_header::PropagateHeaderLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// HTTP-level settings that do not belong to request handling.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub swagger_enabled: bool,
    /// `*` or a comma-separated origin list.
    pub cors_allowed_origins: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            swagger_enabled: false,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let allowed_headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        header::ACCEPT,
        header::ACCEPT_LANGUAGE,
    ];

    let allowed_methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];

    if allowed_origins.trim() == "*" {
        // credentials are not allowed together with a wildcard origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .allow_credentials(false)
    } else {
        let origins: Vec<http::HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .allow_credentials(true)
    }
}

pub fn create_app(state: AppState, settings: &HttpSettings) -> Router {
    let mut router = Router::new()
        .merge(routes::health::create_route())
        .merge(routes::auth::create_route())
        .merge(routes::profile::create_route())
        .merge(routes::classes::create_route())
        .merge(routes::subjects::create_route())
        .merge(routes::courses::create_route())
        .merge(routes::users::create_route());

    if settings.swagger_enabled {
        let swagger_ui =
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());
        router = router.merge(swagger_ui);
    }

    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    // axum middleware is layered separately from the tower ServiceBuilder stack
    let router = router.layer(middleware::from_fn_with_state(state.clone(), http_logger));

    let middleware = ServiceBuilder::new()
        .layer(cors_layer(&settings.cors_allowed_origins))
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .sensitive_request_headers(sensitive_headers.clone())
        .sensitive_response_headers(sensitive_headers)
        .compression();

    router.layer(middleware).with_state(state)
}
