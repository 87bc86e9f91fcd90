//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.
//!
//! The three external-tool failure classes are deliberately distinct:
//! - [`PythiaError::Environment`]: the tool could not be launched at all
//!   (missing binary, not executable) — a setup problem, not an analysis one.
//! - [`PythiaError::ExternalTool`]: the tool ran and reported failure via a
//!   nonzero exit status; carries the captured output for diagnostics.
//! - [`PythiaError::Parse`]: the tool succeeded but its log is missing a
//!   required metric or carries an unparsable value.
//!
//! None of these are retried: every invocation is seeded, so rerunning an
//! identical failing command reproduces the same failure.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Pythia operations
#[derive(Error, Debug)]
pub enum PythiaError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external tool binary could not be launched
    #[error("failed to launch {exe}: {message}")]
    Environment { exe: PathBuf, message: String },

    /// The external tool ran but exited with a nonzero status
    #[error("RAxML-NG exited with status {status}; captured output:\n{output}")]
    ExternalTool { status: i32, output: String },

    /// A produced log file is missing a required metric or holds a bad value
    #[error("failed to parse {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// A run was stopped by a caller-supplied timeout or cancellation flag
    #[error("run cancelled: {message}")]
    Cancelled { message: String },

    /// Invalid alignment data (ragged rows, empty alignment, duplicates)
    #[error("invalid alignment: {message}")]
    InvalidData { message: String },

    /// Configuration errors (invalid CLI arguments)
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Type alias for Results using PythiaError
pub type Result<T> = std::result::Result<T, PythiaError>;

impl PythiaError {
    /// Create an environment error for a binary that failed to launch
    pub fn environment(exe: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Environment {
            exe: exe.into(),
            message: message.into(),
        }
    }

    /// Create a parse error for a produced log file
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a cancellation error
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
