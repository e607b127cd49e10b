//! HTTP error mapping.
//!
//! Every failure leaves the service as `{"status":"Error","error":"..."}`
//! with a status code chosen by error kind.

use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use students_core::{RepoError, StudentId, StudentValidationError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Status label used in every error body.
pub const STATUS_ERROR: &str = "Error";

/// JSON body returned for every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Empty body, malformed JSON or bad path id.
    BadRequest(String),
    /// Required fields missing or blank.
    Validation(StudentValidationError),
    NotFound(StudentId),
    /// Write would break email uniqueness.
    Conflict(String),
    /// Body exceeded the buffering limit.
    PayloadTooLarge(String),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Internal(_) => "internal",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "{message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no student found with id {id}"),
            Self::Conflict(message) => write!(f, "{message}"),
            Self::PayloadTooLarge(message) => write!(f, "{message}"),
            Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for ApiError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

/// An id segment axum cannot extract (e.g. invalid UTF-8) is reported like
/// any other bad id.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::BadRequest("invalid id format".to_string())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(value: BytesRejection) -> Self {
        if value.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(value.body_text())
        } else {
            Self::BadRequest(value.body_text())
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            err @ RepoError::DuplicateEmail(_) => Self::Conflict(err.to_string()),
            err @ (RepoError::Db(_) | RepoError::InvalidData(_)) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                "event=http_error module=api status={} error_code={} error={}",
                status.as_u16(),
                self.error_code(),
                self
            );
        } else {
            warn!(
                "event=http_error module=api status={} error_code={} error={}",
                status.as_u16(),
                self.error_code(),
                self
            );
        }

        let body = ErrorBody {
            status: STATUS_ERROR.to_string(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use students_core::StudentDraft;

    #[test]
    fn test_repo_errors_map_to_status_codes() {
        let not_found: ApiError = RepoError::NotFound(StudentId(3)).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "no student found with id 3");

        let conflict: ApiError = RepoError::DuplicateEmail("a@b.c".to_string()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let invalid: ApiError = RepoError::InvalidData("bad row".to_string()).into();
        assert_eq!(invalid.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_error_is_client_error() {
        let err = StudentDraft::from_parts(None, Some("a@b.c".to_string()), None).unwrap_err();
        let api: ApiError = err.into();
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(api.to_string(), "field name is required, field age is required");
    }
}
