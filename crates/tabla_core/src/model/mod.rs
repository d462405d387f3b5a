//! Domain model for tabla notes and authenticated sessions.
//!
//! # Responsibility
//! - Define the canonical in-memory note and its backend-facing wire shape.
//! - Define session/credential records shared by auth and note use-cases.
//!
//! # Invariants
//! - Exactly one content layout is active per note, chosen by `structure`.
//! - Identifiers are opaque and assigned by the backend, never by the client.
//!
//! # See also
//! - `crate::codec` for the wire <-> canonical conversion.

pub mod note;
pub mod session;
