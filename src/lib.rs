//! # Pythia Library Root
//!
//! ## Role
//! The crate root that declares all public modules and re-exports common types.
//!
//! ## Spec
//! - Declare all public modules (`pub mod data`, `pub mod raxml`, etc.).
//! - Re-export commonly used types for ergonomic access.
//! - This allows the feature extraction to be driven as a library by other
//!   tooling (e.g. a batch difficulty scanner) or by the binary executable.
//!
//! ## Module Structure
//! ```text
//! pythia
//! ├── data        # Alignment representation, intrinsic stats, feature schema
//! ├── raxml       # External-tool boundary (command, runner, artifacts, logs)
//! ├── pipelines   # High-level orchestration (feature extraction)
//! └── utils       # Helpers (scoped workspace, progress context)
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod pipelines;
pub mod raxml;
pub mod utils;

pub use config::Config;
pub use data::{Alignment, DifficultyPredictor, FeatureVector, Msa};
pub use error::{PythiaError, Result};
pub use pipelines::{FeaturePipeline, PersistSeverity, PipelineOptions};
pub use raxml::{InvocationMode, InvocationSpec, RunControl};
pub use utils::progress::RunTimer;
pub use utils::workspace::ScopedWorkspace;
