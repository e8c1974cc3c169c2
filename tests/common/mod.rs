use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use school_admin::app::{HttpSettings, create_app};
use school_admin::bootstrap::initialize_principal_user;
use school_admin::repositories::InMemoryStore;
use school_admin::services::TeacherDefaults;
use school_admin::state::AppState;
use school_admin::utils::jwt::JwtManager;

pub const PRINCIPAL_EMAIL: &str = "principal@test.com";
pub const PRINCIPAL_PASSWORD: &str = "password123";
pub const TEACHER_PASSWORD: &str = "passer123";

/// Router over a fresh in-memory store with the principal already seeded.
pub async fn test_app() -> Router {
    let store = InMemoryStore::new();
    initialize_principal_user(&store, PRINCIPAL_EMAIL, PRINCIPAL_PASSWORD, 4)
        .await
        .unwrap();

    let state = AppState::in_memory(
        store,
        JwtManager::new("integration-secret", 3600),
        TeacherDefaults {
            default_password: TEACHER_PASSWORD.to_string(),
            email_domain: "gmail.com".to_string(),
            password_cost: 4,
        },
        "test",
    );
    create_app(state, &HttpSettings::default())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["accessToken"].as_str().unwrap().to_string()
}

pub async fn principal_token(app: &Router) -> String {
    login(app, PRINCIPAL_EMAIL, PRINCIPAL_PASSWORD).await
}
