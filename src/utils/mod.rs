//! # Utilities Module
//!
//! Cross-cutting helpers that don't belong in domain-specific modules.
//!
//! ## Sub-modules
//! - `progress`: explicit run-timer context and stage names for reporting
//! - `workspace`: drop-scoped temporary directory for external-tool artifacts

pub mod progress;
pub mod workspace;
