mod common;

use http::{Method, StatusCode};
use serde_json::json;

use common::{TEACHER_PASSWORD, login, principal_token, send, test_app};

async fn teacher_token(app: &axum::Router) -> String {
    let token = principal_token(app).await;
    let (status, teacher) = send(
        app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "firstName": "Éloïse",
            "lastName": "Lefèvre",
            "subjects": ["Français", "Latin"],
            "managedLevels": ["SIXIEME"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(teacher["email"], "eloise.lefevre.francais@gmail.com");
    assert_eq!(teacher["role"], "TEACHER");

    login(app, teacher["email"].as_str().unwrap(), TEACHER_PASSWORD).await
}

#[tokio::test]
async fn missing_or_invalid_token_is_unauthorized() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/subjects/overview", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::GET, "/api/v1/classes", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "principal@test.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn teacher_cannot_mutate_allocations() {
    let app = test_app().await;
    let token = teacher_token(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/subjects",
        Some(&token),
        Some(json!({ "name": "Musique" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn authorization_runs_before_body_validation() {
    let app = test_app().await;
    let invalid_body = json!({ "level": "SECONDE", "hoursPerWeek": "many" });

    let (status, _) = send(&app, Method::POST, "/api/v1/courses", None, Some(invalid_body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = teacher_token(&app).await;
    let (status, _) = send(&app, Method::POST, "/api/v1/courses", Some(&token), Some(invalid_body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let principal = principal_token(&app).await;
    let (status, _) = send(&app, Method::POST, "/api/v1/courses", Some(&principal), Some(invalid_body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn teacher_sees_own_profile() {
    let app = test_app().await;
    let token = teacher_token(&app).await;

    let (status, profile) = send(&app, Method::GET, "/api/v1/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["firstName"], "Éloïse");
    assert_eq!(profile["subjects"], json!(["Français", "Latin"]));
    assert_eq!(profile["managedLevels"], json!(["SIXIEME"]));
    assert!(profile.get("password").is_none());
}

#[tokio::test]
async fn principal_manages_teachers() {
    let app = test_app().await;
    let token = principal_token(&app).await;
    let _ = teacher_token(&app).await;

    let (status, second) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "firstName": "Eloise",
            "lastName": "Lefevre",
            "subjects": ["Français"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["email"], "eloise.lefevre.francais2@gmail.com");

    let user_id = second["id"].as_str().unwrap().to_string();
    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/users/{user_id}"),
        Some(&token),
        Some(json!({
            "firstName": "Eloise",
            "lastName": "Lefevre",
            "subjects": ["Philosophie"],
            "managedLevels": ["TROISIEME", "QUATRIEME"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["subjects"], json!(["Philosophie"]));
    assert_eq!(updated["managedLevels"], json!(["QUATRIEME", "TROISIEME"]));

    let (status, subjects) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{user_id}/subjects"),
        Some(&token),
        Some(json!({ "subjects": ["Physique", " Chimie ", "Physique"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = subjects
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Chimie", "Physique"]);

    let (status, teachers) = send(&app, Method::GET, "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let teachers = teachers.as_array().unwrap();
    assert_eq!(teachers.len(), 2);
    assert!(teachers.iter().all(|t| t["role"] == "TEACHER"));

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/users/{}", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({ "firstName": "A", "lastName": "B", "subjects": ["C"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
