//! Repository contracts over the local SQLite store.
//!
//! # Responsibility
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Repositories only receive migrated connections from `crate::db`.

pub mod session_repo;
