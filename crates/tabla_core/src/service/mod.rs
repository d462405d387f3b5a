//! Use-case services over the store, backend and session repository.
//!
//! # Responsibility
//! - Sequence guard -> encode -> backend call -> merge for each user action.
//! - Surface one human-readable message per failed action.
//!
//! # Invariants
//! - Local state changes only after the backend confirms success.
//! - Guarded mutations never reach the backend when the guard denies them.

pub mod access;
pub mod auth_service;
pub mod note_service;
