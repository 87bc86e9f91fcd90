//! # Pipeline Module
//!
//! High-level orchestration of the feature-extraction workflow.
//! Coordinates the external-tool boundary, the scoped workspace, and the
//! feature-vector assembly.

pub mod features;

pub use features::{FeaturePipeline, PersistSeverity, PipelineOptions};
