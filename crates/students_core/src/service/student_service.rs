//! Student use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::student::{Student, StudentDraft, StudentId};
use crate::repo::student_repo::{RepoError, RepoResult, StudentRepository};

/// Use-case service wrapper for student CRUD operations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a student and returns the store-assigned ID.
    pub fn create_student(&self, draft: &StudentDraft) -> RepoResult<StudentId> {
        self.repo.create_student(draft)
    }

    /// Gets one student by ID.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no row has this ID.
    pub fn get_student(&self, id: StudentId) -> RepoResult<Student> {
        self.repo.get_student(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Lists all students by ascending ID. Empty store yields an empty list.
    pub fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.repo.list_students()
    }

    /// Replaces name/email/age of an existing student.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<()> {
        self.repo.update_student(id, draft)
    }

    /// Hard-deletes a student by ID.
    pub fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        self.repo.delete_student(id)
    }
}
