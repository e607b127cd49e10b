//! HTTP surface of the students service.
//!
//! Maps five REST routes plus a liveness probe onto a shared
//! [`students_core::StudentStore`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use config::{AppConfig, ConfigError, HttpServerConfig, LogConfig};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use router::{create_router, AppState};
pub use server::{serve_with_grace, shutdown_signal, HttpServer, SHUTDOWN_GRACE};
