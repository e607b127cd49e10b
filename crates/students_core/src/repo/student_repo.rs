//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `students` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call `StudentDraft::validate()` before SQL mutations.
//! - Update/delete affecting zero rows is `NotFound`, never silent success.
//! - A `UNIQUE` violation on `email` surfaces as `DuplicateEmail`.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::student::{Student, StudentDraft, StudentId, StudentValidationError};
use rusqlite::{ffi, params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    age
FROM students";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    NotFound(StudentId),
    DuplicateEmail(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no student found with id {id}"),
            Self::DuplicateEmail(email) => {
                write!(f, "a student with email `{email}` already exists")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateEmail(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    fn create_student(&self, draft: &StudentDraft) -> RepoResult<StudentId>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<()>;
    fn delete_student(&self, id: StudentId) -> RepoResult<()>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(&self, draft: &StudentDraft) -> RepoResult<StudentId> {
        draft.validate()?;

        self.conn
            .execute(
                "INSERT INTO students (name, email, age) VALUES (?1, ?2, ?3);",
                params![draft.name.as_str(), draft.email.as_str(), draft.age],
            )
            .map_err(|err| map_write_error(err, draft))?;

        Ok(StudentId(self.conn.last_insert_rowid()))
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1 LIMIT 1;"))?;

        let mut rows = stmt.query([id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<()> {
        draft.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE students
                 SET
                    name = ?1,
                    email = ?2,
                    age = ?3
                 WHERE id = ?4;",
                params![
                    draft.name.as_str(),
                    draft.email.as_str(),
                    draft.age,
                    id.get()
                ],
            )
            .map_err(|err| map_write_error(err, draft))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id.get()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn map_write_error(err: rusqlite::Error, draft: &StudentDraft) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateEmail(draft.email.clone())
        }
        _ => err.into(),
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: i64 = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in students.id"
        )));
    }

    let student = Student {
        id: StudentId(id),
        name: row.get("name")?,
        email: row.get("email")?,
        age: row.get("age")?,
    };
    if is_blank(&student.name) || is_blank(&student.email) {
        return Err(RepoError::InvalidData(format!(
            "blank name or email for students.id `{id}`"
        )));
    }
    Ok(student)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
