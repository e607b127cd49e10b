//! Process-wide student store handle.
//!
//! # Responsibility
//! - Own the single SQLite connection shared by all request handlers.
//! - Expose the five student operations without leaking the connection.
//!
//! # Invariants
//! - The connection is only touched while the mutex is held.
//! - Every call goes through `StudentService`, so repository contracts apply.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::student::{Student, StudentDraft, StudentId};
use crate::repo::student_repo::{RepoResult, SqliteStudentRepository};
use crate::service::student_service::StudentService;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Shared, thread-safe student store.
///
/// Operations are blocking; async callers should run them on a blocking pool.
pub struct StudentStore {
    conn: Mutex<Connection>,
}

impl StudentStore {
    /// Opens (or creates) a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory store with migrations applied.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already-bootstrapped connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn create_student(&self, draft: &StudentDraft) -> RepoResult<StudentId> {
        self.with_service(|service| service.create_student(draft))
    }

    pub fn get_student(&self, id: StudentId) -> RepoResult<Student> {
        self.with_service(|service| service.get_student(id))
    }

    pub fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.with_service(|service| service.list_students())
    }

    pub fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<()> {
        self.with_service(|service| service.update_student(id, draft))
    }

    pub fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        self.with_service(|service| service.delete_student(id))
    }

    fn with_service<T>(
        &self,
        op: impl FnOnce(&StudentService<SqliteStudentRepository<'_>>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let conn = self.lock();
        let service = StudentService::new(SqliteStudentRepository::new(&conn));
        op(&service)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves no partial state behind: each write is
        // a single autocommit statement.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
