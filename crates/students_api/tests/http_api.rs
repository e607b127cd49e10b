use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use students_api::{create_router, AppState};
use students_core::StudentStore;
use tower::ServiceExt;

fn app() -> Router {
    let store = StudentStore::open_in_memory().unwrap();
    create_router(AppState::new(Arc::new(store)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map_or_else(Body::empty, |raw| Body::from(raw.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, name: &str, email: &str, age: i64) -> i64 {
    let body = json!({"name": name, "email": email, "age": age}).to_string();
    let (status, value) = send(app, Method::POST, "/api/students", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {value}");
    value["id"].as_i64().unwrap()
}

fn assert_error_shape(value: &Value) {
    assert_eq!(value["status"], "Error");
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app();
    let (status, value) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"status": "healthy"}));
}

#[tokio::test]
async fn create_then_get_returns_record() {
    let app = app();
    let id = create(&app, "Ada", "ada@example.com", 36).await;
    assert!(id > 0);

    let (status, value) = send(&app, Method::GET, &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        value,
        json!({"id": id, "name": "Ada", "email": "ada@example.com", "age": 36})
    );
}

#[tokio::test]
async fn create_accepts_body_without_content_type() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/students")
        .body(Body::from(r#"{"name":"Raw","email":"raw@example.com","age":5}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn create_with_duplicate_email_fails() {
    let app = app();
    create(&app, "Ada", "same@example.com", 36).await;

    let body = json!({"name": "Eve", "email": "same@example.com", "age": 20}).to_string();
    let (status, value) = send(&app, Method::POST, "/api/students", Some(&body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_error_shape(&value);

    let (_, list) = send(&app, Method::GET, "/api/students", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_with_empty_body_is_bad_request() {
    let app = app();
    let (status, value) = send(&app, Method::POST, "/api/students", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, json!({"status": "Error", "error": "empty body"}));
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() {
    let app = app();
    let (status, value) = send(&app, Method::POST, "/api/students", Some("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_shape(&value);
}

#[tokio::test]
async fn create_with_missing_fields_lists_each_field() {
    let app = app();
    let (status, value) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(r#"{"name":"","age":null}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        value["error"],
        "field name is required, field email is required, field age is required"
    );
}

#[tokio::test]
async fn get_missing_student_is_not_found() {
    let app = app();
    let (status, value) = send(&app, Method::GET, "/api/students/404", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        value,
        json!({"status": "Error", "error": "no student found with id 404"})
    );
}

#[tokio::test]
async fn non_numeric_id_is_bad_request_on_every_id_route() {
    let app = app();
    let body = json!({"name": "A", "email": "a@example.com", "age": 1}).to_string();

    for (method, payload) in [
        (Method::GET, None),
        (Method::PUT, Some(body.as_str())),
        (Method::DELETE, None),
    ] {
        let (status, value) = send(&app, method.clone(), "/api/students/abc", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(value["error"], "invalid id format");
    }
}

#[tokio::test]
async fn list_is_empty_array_when_no_students() {
    let app = app();
    let (status, value) = send(&app, Method::GET, "/api/students", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!([]));
}

#[tokio::test]
async fn update_is_reflected_in_later_reads() {
    let app = app();
    let id = create(&app, "Draft", "draft@example.com", 18).await;

    let body = json!({"name": "Final", "email": "final@example.com", "age": 19}).to_string();
    let (status, value) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{id}"),
        Some(&body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"message": "student updated successfully"}));

    let (_, fetched) = send(&app, Method::GET, &format!("/api/students/{id}"), None).await;
    assert_eq!(fetched["name"], "Final");
    assert_eq!(fetched["email"], "final@example.com");
    assert_eq!(fetched["age"], 19);
}

#[tokio::test]
async fn update_missing_student_fails() {
    let app = app();
    let body = json!({"name": "Ghost", "email": "ghost@example.com", "age": 1}).to_string();
    let (status, value) = send(&app, Method::PUT, "/api/students/77", Some(&body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_shape(&value);
}

#[tokio::test]
async fn update_validates_body_before_touching_store() {
    let app = app();
    let id = create(&app, "Ada", "ada@example.com", 36).await;

    let (status, value) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{id}"),
        Some(r#"{"name":"Ada"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        value["error"],
        "field email is required, field age is required"
    );

    let (_, fetched) = send(&app, Method::GET, &format!("/api/students/{id}"), None).await;
    assert_eq!(fetched["email"], "ada@example.com");
}

#[tokio::test]
async fn delete_removes_student_from_list() {
    let app = app();
    let keep = create(&app, "Keep", "keep@example.com", 1).await;
    let gone = create(&app, "Gone", "gone@example.com", 2).await;

    let (status, value) = send(
        &app,
        Method::DELETE,
        &format!("/api/students/{gone}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"message": "student deleted successfully"}));

    let (_, list) = send(&app, Method::GET, "/api/students", None).await;
    let ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|student| student["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![keep]);

    let (status, value) = send(
        &app,
        Method::DELETE,
        &format!("/api/students/{gone}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_shape(&value);
}

#[tokio::test]
async fn undecodable_id_segment_is_json_bad_request() {
    let app = app();
    let body = json!({"name": "A", "email": "a@example.com", "age": 1}).to_string();

    for (method, payload) in [
        (Method::GET, None),
        (Method::PUT, Some(body.as_str())),
        (Method::DELETE, None),
    ] {
        let (status, value) = send(&app, method.clone(), "/api/students/%FF", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(
            value,
            json!({"status": "Error", "error": "invalid id format"}),
            "{method}"
        );
    }
}

#[tokio::test]
async fn oversized_body_is_json_payload_too_large() {
    let app = app();
    let oversized = "a".repeat(3 * 1024 * 1024);

    let (status, value) = send(&app, Method::POST, "/api/students", Some(&oversized)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_error_shape(&value);

    let id = create(&app, "Ada", "ada@example.com", 36).await;
    let (status, value) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{id}"),
        Some(&oversized),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_error_shape(&value);
}

#[tokio::test]
async fn explicit_zero_age_is_accepted() {
    let app = app();
    let id = create(&app, "Newborn", "newborn@example.com", 0).await;

    let (status, value) = send(&app, Method::GET, &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["age"], 0);
}
