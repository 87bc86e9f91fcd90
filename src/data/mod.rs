//! # Data Module
//!
//! Alignment-side data: the in-memory MSA representation, the intrinsic
//! statistics computed from it, and the feature-vector schema handed to the
//! downstream predictor.

pub mod features;
pub mod msa;
pub mod stats;

pub use features::{DifficultyPredictor, FeatureVector};
pub use msa::{DataType, Msa};

use std::path::Path;

/// What the feature pipeline needs to know about an alignment.
///
/// The pipeline never computes alignment-intrinsic statistics itself; it
/// consumes them through this boundary, which also lets tests drive the
/// pipeline with a fixed stub alignment.
pub trait Alignment {
    /// Substitution model string understood by RAxML-NG (e.g. `GTR+G`)
    fn model_string(&self) -> String;
    /// Path to the on-disk alignment file handed to RAxML-NG
    fn file_path(&self) -> &Path;
    fn taxon_count(&self) -> usize;
    fn site_count(&self) -> usize;
    /// Mean per-column Shannon entropy
    fn entropy(&self) -> f64;
    /// Bollback multinomial test statistic
    fn bollback_score(&self) -> f64;
    /// Site-pattern entropy term
    fn pattern_entropy(&self) -> f64;
}
