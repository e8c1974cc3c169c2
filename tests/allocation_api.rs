mod common;

use http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{principal_token, send, test_app};

fn hours_at(overview: &Value, subject: &str, level: &str) -> Option<f64> {
    overview
        .as_array()?
        .iter()
        .find(|s| s["name"] == subject)?["courses"]
        .as_array()?
        .iter()
        .find(|c| c["level"] == level)?["hoursPerWeek"]
        .as_f64()
}

#[tokio::test]
async fn apply_then_update_shows_in_overview() {
    let app = test_app().await;
    let token = principal_token(&app).await;

    let (status, subject) = send(
        &app,
        Method::POST,
        "/api/v1/subjects",
        Some(&token),
        Some(json!({ "name": "Mathématiques" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let subject_id = subject["id"].as_str().unwrap().to_string();

    let (status, report) = send(
        &app,
        Method::POST,
        "/api/v1/courses/apply-to-levels",
        Some(&token),
        Some(json!({
            "subjectId": subject_id,
            "hoursPerWeek": 4,
            "targetLevels": ["SIXIEME", "CINQUIEME"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["outcome"], "complete");
    let sixieme_course = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["level"] == "SIXIEME")
        .unwrap()["courseId"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, course) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/courses/{sixieme_course}"),
        Some(&token),
        Some(json!({ "hoursPerWeek": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(course["subject"]["name"], "Mathématiques");

    let (status, overview) = send(
        &app,
        Method::GET,
        "/api/v1/subjects/overview",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hours_at(&overview, "Mathématiques", "SIXIEME"), Some(5.0));
    assert_eq!(hours_at(&overview, "Mathématiques", "CINQUIEME"), Some(4.0));
    assert_eq!(hours_at(&overview, "Mathématiques", "TROISIEME"), None);
}

#[tokio::test]
async fn duplicate_course_is_conflict_and_apply_upserts() {
    let app = test_app().await;
    let token = principal_token(&app).await;
    let (_, subject) = send(
        &app,
        Method::POST,
        "/api/v1/subjects",
        Some(&token),
        Some(json!({ "name": "Anglais", "dayOff": "MERCREDI" })),
    )
    .await;
    let subject_id = subject["id"].as_str().unwrap().to_string();
    let create = json!({ "level": "QUATRIEME", "subjectId": subject_id, "hoursPerWeek": 3 });

    let (status, _) = send(&app, Method::POST, "/api/v1/courses", Some(&token), Some(create.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, Method::POST, "/api/v1/courses", Some(&token), Some(create)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, report) = send(
        &app,
        Method::POST,
        "/api/v1/courses/apply-to-levels",
        Some(&token),
        Some(json!({
            "subjectId": subject_id,
            "hoursPerWeek": 3.5,
            "targetLevels": ["QUATRIEME"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["results"][0]["created"], false);

    let (_, sheet) = send(&app, Method::GET, "/api/v1/levels/quatrieme/courses", Some(&token), None).await;
    assert_eq!(sheet["courses"].as_array().unwrap().len(), 1);
    assert_eq!(sheet["courses"][0]["hoursPerWeek"], 3.5);
    assert!(sheet["availableSubjects"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_requests_are_bad_request() {
    let app = test_app().await;
    let token = principal_token(&app).await;
    let (_, subject) = send(
        &app,
        Method::POST,
        "/api/v1/subjects",
        Some(&token),
        Some(json!({ "name": "Histoire" })),
    )
    .await;
    let subject_id = subject["id"].as_str().unwrap().to_string();

    let cases = [
        (Method::POST, "/api/v1/courses".to_string(), Some(json!({ "level": "SIXIEME", "subjectId": subject_id, "hoursPerWeek": -1 }))),
        (Method::POST, "/api/v1/courses".to_string(), Some(json!({ "level": "SECONDE", "subjectId": subject_id, "hoursPerWeek": 1 }))),
        (Method::POST, "/api/v1/courses/apply-to-levels".to_string(), Some(json!({ "subjectId": subject_id, "hoursPerWeek": 1, "targetLevels": [] }))),
        (Method::PATCH, format!("/api/v1/subjects/{subject_id}"), Some(json!({}))),
        (Method::POST, "/api/v1/subjects".to_string(), Some(json!({ "name": "   " }))),
        (Method::PUT, "/api/v1/courses/not-a-uuid".to_string(), Some(json!({ "hoursPerWeek": 1 }))),
        (Method::GET, "/api/v1/levels/seconde/courses".to_string(), None),
    ];

    for (method, uri, body) in cases {
        let (status, response) = send(&app, method.clone(), &uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert!(response["error"].is_string(), "{method} {uri}");
    }
}

#[tokio::test]
async fn day_off_update_keeps_name_and_null_clears_it() {
    let app = test_app().await;
    let token = principal_token(&app).await;
    let (_, subject) = send(
        &app,
        Method::POST,
        "/api/v1/subjects",
        Some(&token),
        Some(json!({ "name": "EPS" })),
    )
    .await;
    let uri = format!("/api/v1/subjects/{}", subject["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "dayOff": "VENDREDI" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "EPS");
    assert_eq!(updated["dayOff"], "VENDREDI");

    let (status, cleared) = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "dayOff": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["dayOff"], Value::Null);
}

#[tokio::test]
async fn deleting_subject_removes_its_courses() {
    let app = test_app().await;
    let token = principal_token(&app).await;
    let (_, subject) = send(
        &app,
        Method::POST,
        "/api/v1/subjects",
        Some(&token),
        Some(json!({ "name": "Latin" })),
    )
    .await;
    let subject_id = subject["id"].as_str().unwrap().to_string();
    send(
        &app,
        Method::POST,
        "/api/v1/courses/apply-to-levels",
        Some(&token),
        Some(json!({
            "subjectId": subject_id,
            "hoursPerWeek": 2,
            "targetLevels": ["CINQUIEME", "QUATRIEME", "TROISIEME"]
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/subjects/{subject_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removedCourses"], 3);

    let (_, sheet) = send(&app, Method::GET, "/api/v1/levels/TROISIEME/courses", Some(&token), None).await;
    assert!(sheet["courses"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/subjects/{subject_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sections_are_added_and_removed_in_order() {
    let app = test_app().await;
    let token = principal_token(&app).await;

    for expected in ["A", "B", "C"] {
        let (status, class) = send(
            &app,
            Method::POST,
            "/api/v1/classes",
            Some(&token),
            Some(json!({ "level": "SIXIEME" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(class["section"], expected);
    }
    assert_eq!(
        send(&app, Method::POST, "/api/v1/classes", Some(&token), Some(json!({ "level": "TROISIEME" }))).await.1["displayName"],
        "3ème A"
    );

    let (status, removed) = send(
        &app,
        Method::DELETE,
        "/api/v1/classes/latest",
        Some(&token),
        Some(json!({ "level": "SIXIEME" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["section"], "C");

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/v1/classes/latest",
        Some(&token),
        Some(json!({ "level": "CINQUIEME" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, classes) = send(&app, Method::GET, "/api/v1/classes", Some(&token), None).await;
    let keys: Vec<String> = classes
        .as_array()
        .unwrap()
        .iter()
        .map(|c| format!("{}{}", c["level"].as_str().unwrap(), c["section"].as_str().unwrap()))
        .collect();
    assert_eq!(keys, vec!["SIXIEMEA", "SIXIEMEB", "TROISIEMEA"]);

    let class_id = classes[0]["id"].as_str().unwrap().to_string();
    let (status, renamed) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/classes/{class_id}"),
        Some(&token),
        Some(json!({ "name": " Les Pionniers " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["displayName"], "Les Pionniers");

    let (_, grouped) = send(&app, Method::GET, "/api/v1/classes/by-level", Some(&token), None).await;
    let counts: Vec<usize> = grouped
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["classes"].as_array().unwrap().len())
        .collect();
    assert_eq!(counts, vec![2, 0, 0, 1]);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/classes/{class_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
