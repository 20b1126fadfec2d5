//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # Invariants
//! - Input validation happens here, before any store call.
//! - The canonical reference date is always passed in by the caller;
//!   services never consult the local clock.

pub mod assignment;
pub mod response;
