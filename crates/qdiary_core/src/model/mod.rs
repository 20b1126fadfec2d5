//! Domain models for the daily question engine.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep storage-facing enum encodings next to the types they encode.
//!
//! # Invariants
//! - Question identity is a stable `QuestionId`; responses are keyed by
//!   storage rowid plus the owning user.
//! - Calendar dates carry no time-of-day component; the caller is
//!   responsible for normalizing "today" to one reference timezone.

pub mod question;
pub mod response;
pub mod summary;
