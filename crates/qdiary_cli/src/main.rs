//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `qdiary_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("qdiary_core ping={}", qdiary_core::ping());
    println!("qdiary_core version={}", qdiary_core::core_version());
}
