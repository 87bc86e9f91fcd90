//! # RAxML-NG Boundary
//!
//! Everything that touches the external RAxML-NG binary lives here:
//! building argument vectors, running the child process, deriving the
//! output-file paths the tool is documented to produce, and parsing the
//! metrics out of its log files. Nothing in this module knows about
//! alignments or feature vectors.

pub mod artifacts;
pub mod command;
pub mod log;
pub mod runner;

pub use command::{InvocationMode, InvocationSpec};
pub use runner::{ProcessResult, RunControl};
