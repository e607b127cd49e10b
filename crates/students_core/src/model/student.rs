//! Student domain model.
//!
//! # Responsibility
//! - Define the persisted `Student` record and the `StudentDraft` write shape.
//! - Validate required fields before anything reaches storage.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes after creation.
//! - `name` and `email` are non-empty (after trimming whitespace).
//! - Validation reports every failed field, in declaration order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned student identifier.
///
/// Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl StudentId {
    /// Returns the raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StudentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Writable student fields used by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl StudentDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Builds a draft from optionally-present fields.
    ///
    /// Absent fields and blank strings are collected into one
    /// `StudentValidationError` so callers can report all of them at once.
    pub fn from_parts(
        name: Option<String>,
        email: Option<String>,
        age: Option<i64>,
    ) -> Result<Self, StudentValidationError> {
        let mut failures = Vec::new();

        let name = name.filter(|value| !is_blank(value));
        if name.is_none() {
            failures.push(FieldError::required("name"));
        }
        let email = email.filter(|value| !is_blank(value));
        if email.is_none() {
            failures.push(FieldError::required("email"));
        }
        if age.is_none() {
            failures.push(FieldError::required("age"));
        }

        match (name, email, age) {
            (Some(name), Some(email), Some(age)) => Ok(Self { name, email, age }),
            _ => Err(StudentValidationError { failures }),
        }
    }

    /// Validates field-level invariants.
    ///
    /// # Errors
    /// - `StudentValidationError` listing each blank field.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        let mut failures = Vec::new();
        if is_blank(&self.name) {
            failures.push(FieldError::required("name"));
        }
        if is_blank(&self.email) {
            failures.push(FieldError::required("email"));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(StudentValidationError { failures })
        }
    }
}

/// Validation rule that a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Field must be present and non-blank.
    Required,
}

impl ValidationRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
        }
    }
}

/// One failed field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: ValidationRule,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            rule: ValidationRule::Required,
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.rule {
            ValidationRule::Required => write!(f, "field {} is required", self.field),
        }
    }
}

/// Validation failure carrying every field that did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentValidationError {
    failures: Vec<FieldError>,
}

impl StudentValidationError {
    /// Failed fields in declaration order (`name`, `email`, `age`).
    pub fn failures(&self) -> &[FieldError] {
        &self.failures
    }

    /// Names of the failed fields.
    pub fn fields(&self) -> Vec<&'static str> {
        self.failures.iter().map(|failure| failure.field).collect()
    }
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl Error for StudentValidationError {}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
