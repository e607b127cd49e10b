//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record and its writable field set.
//! - Own field validation shared by the store and request decoding.
//!
//! # Invariants
//! - Every persisted student is identified by a store-assigned `StudentId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod student;
