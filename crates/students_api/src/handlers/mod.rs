//! HTTP request handlers.
//!
//! Handlers stay thin: decode, validate, call the store, encode.

pub mod health;
pub mod student;

pub use health::health_check;
pub use student::{create_student, delete_student, get_student, list_students, update_student};
