//! Core domain logic for the students service.
//! This crate owns the student record, its validation and its SQLite store.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::student::{
    FieldError, Student, StudentDraft, StudentId, StudentValidationError, ValidationRule,
};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository, StudentRepository};
pub use service::student_service::StudentService;
pub use store::StudentStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
