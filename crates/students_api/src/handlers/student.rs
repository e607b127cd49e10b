//! Student CRUD handlers.
//!
//! # Invariants
//! - Bodies are decoded from raw bytes, whatever the `Content-Type`.
//! - Extractor rejections go through `ApiError`, so every failure keeps the
//!   JSON error shape.
//! - Store calls run on the blocking pool; the SQLite connection never blocks
//!   an async worker.

use crate::error::{ApiError, ApiResult};
use crate::router::AppState;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use students_core::{RepoResult, Student, StudentDraft, StudentId, StudentStore};

/// Incoming create/update body. Every field is optional at the wire level so
/// that all missing fields can be reported together.
#[derive(Debug, Default, Deserialize)]
pub struct StudentPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl StudentPayload {
    pub fn into_draft(self) -> ApiResult<StudentDraft> {
        Ok(StudentDraft::from_parts(self.name, self.email, self.age)?)
    }
}

/// `201` body for a created student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: StudentId,
}

/// `200` body for update/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// `POST /api/students`
pub async fn create_student(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    debug!("event=student_create module=api status=start");
    let draft = decode_draft(&body?)?;

    let id = with_store(&state, move |store| store.create_student(&draft)).await?;

    info!("event=student_create module=api status=ok id={id}");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// `GET /api/students/:id`
pub async fn get_student(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Student>> {
    let id = path_id(path)?;
    debug!("event=student_get module=api status=start id={id}");

    let student = with_store(&state, move |store| store.get_student(id)).await?;
    Ok(Json(student))
}

/// `GET /api/students`
pub async fn list_students(State(state): State<AppState>) -> ApiResult<Json<Vec<Student>>> {
    let students = with_store(&state, |store| store.list_students()).await?;

    info!(
        "event=student_list module=api status=ok count={}",
        students.len()
    );
    Ok(Json(students))
}

/// `PUT /api/students/:id`
pub async fn update_student(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = path_id(path)?;
    let draft = decode_draft(&body?)?;

    with_store(&state, move |store| store.update_student(id, &draft)).await?;

    info!("event=student_update module=api status=ok id={id}");
    Ok(Json(MessageResponse::new("student updated successfully")))
}

/// `DELETE /api/students/:id`
pub async fn delete_student(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = path_id(path)?;

    with_store(&state, move |store| store.delete_student(id)).await?;

    info!("event=student_delete module=api status=ok id={id}");
    Ok(Json(MessageResponse::new("student deleted successfully")))
}

fn path_id(path: Result<Path<String>, PathRejection>) -> ApiResult<StudentId> {
    let Path(raw_id) = path?;
    parse_id(&raw_id)
}

/// Parses a path segment as a positive student id.
pub fn parse_id(raw: &str) -> ApiResult<StudentId> {
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(StudentId(value)),
        _ => Err(ApiError::BadRequest("invalid id format".to_string())),
    }
}

/// Decodes and validates a create/update body.
pub fn decode_draft(body: &[u8]) -> ApiResult<StudentDraft> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("empty body".to_string()));
    }

    let payload: StudentPayload = serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("invalid JSON body: {err}")))?;
    payload.into_draft()
}

async fn with_store<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&StudentStore) -> RepoResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?;
    Ok(result?)
}
