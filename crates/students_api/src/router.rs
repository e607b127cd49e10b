//! Route table and shared handler state.

use crate::handlers::{
    create_student, delete_student, get_student, health_check, list_students, update_student,
};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use students_core::StudentStore;

/// State injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StudentStore>,
}

impl AppState {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self { store }
    }
}

/// Builds the service router.
///
/// - `GET /health`
/// - `POST /api/students`, `GET /api/students`
/// - `GET|PUT|DELETE /api/students/:id`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/students", get(list_students).post(create_student))
        .route(
            "/api/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .with_state(state)
}
