//! # Feature Pipeline
//!
//! Orchestrates the difficulty feature extraction for one alignment:
//! 1. Acquire a scoped workspace; take model string and file path from the
//!    alignment
//! 2. Parse-mode run: pattern count, gap and invariant-site proportions
//! 3. Tree-search run: infer N seeded parsimony trees, optionally persist
//!    them to a durable path
//! 4. Distance run over the inferred trees: unique topologies, RF distances
//! 5. Assemble the feature vector from external metrics, alignment-intrinsic
//!    statistics, and the derived ratios
//!
//! The five steps are strictly sequential (step 4 consumes step 3's
//! artifact) and run entirely inside the workspace scope, so intermediate
//! artifacts vanish on every exit path. A run either completes with a full
//! feature vector or fails with the first error; partial vectors are never
//! surfaced.

use std::fs;
use std::path::PathBuf;

use tracing::{info_span, warn};

use crate::data::{Alignment, FeatureVector};
use crate::error::{PythiaError, Result};
use crate::raxml::{artifacts, log, runner, InvocationSpec, RunControl};
use crate::utils::progress::{RunTimer, Stage};
use crate::utils::workspace::ScopedWorkspace;

/// What to do when persisting the inferred trees fails. The copy is a side
/// effect; whether its failure aborts the run is the caller's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistSeverity {
    /// Log a warning and finish the run without the copy
    #[default]
    Warn,
    /// Propagate the copy failure as the run's error
    Fail,
}

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Number of parsimony trees to infer
    pub n_trees: usize,
    /// Random seed for the parsimony search (fixed for reproducibility)
    pub seed: u64,
    /// Pass `--redo` so stale artifacts from aborted runs are overwritten
    pub redo: bool,
    /// Worker threads for the external tool; `None` uses its autoconfig
    pub threads: Option<usize>,
    /// Durable destination for the inferred trees, if the caller wants them
    pub store_trees: Option<PathBuf>,
    /// Severity of a failed tree-persistence copy
    pub persist_severity: PersistSeverity,
    /// Timeout/cancellation limits applied to every external invocation
    pub control: RunControl,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 0,
            redo: true,
            threads: None,
            store_trees: None,
            persist_severity: PersistSeverity::Warn,
            control: RunControl::default(),
        }
    }
}

/// External metrics from the parse-mode run.
#[derive(Debug, Clone, Copy)]
struct PatternStats {
    patterns: f64,
    gaps: f64,
    invariant: f64,
}

/// External metrics from the distance run.
#[derive(Debug, Clone, Copy)]
struct DistanceStats {
    num_topos: f64,
    rel_rfdist: f64,
}

/// Difficulty feature extraction for one alignment via RAxML-NG.
pub struct FeaturePipeline {
    executable: PathBuf,
    options: PipelineOptions,
}

impl FeaturePipeline {
    pub fn new(executable: impl Into<PathBuf>, options: PipelineOptions) -> Self {
        Self {
            executable: executable.into(),
            options,
        }
    }

    /// Run the full extraction. Either returns a complete, finite feature
    /// vector or the first error encountered; the workspace is removed in
    /// both cases.
    pub fn run<A: Alignment>(&self, alignment: &A, timer: &RunTimer) -> Result<FeatureVector> {
        let _span = info_span!("feature_pipeline").entered();

        timer.stage(Stage::Init);
        let workspace = ScopedWorkspace::acquire()?;
        let msa_file = alignment.file_path().to_path_buf();
        let model = alignment.model_string();

        timer.stage(Stage::PatternStats);
        let patterns = self.pattern_stats(&workspace, &msa_file, &model)?;

        timer.stage(Stage::TreeInference);
        let trees_file = self.infer_trees(&workspace, &msa_file, &model)?;
        if let Some(destination) = &self.options.store_trees {
            self.persist_trees(&trees_file, destination)?;
        }

        timer.stage(Stage::DistanceComputation);
        let distances = self.rf_distances(&workspace, &trees_file)?;

        timer.stage(Stage::Assemble);
        let vector = assemble(alignment, patterns, distances, self.options.n_trees);
        if !vector.is_finite() {
            return Err(PythiaError::invalid_data(
                "assembled feature vector contains non-finite values",
            ));
        }

        timer.stage(Stage::Complete);
        Ok(vector)
    }

    fn pattern_stats(
        &self,
        workspace: &ScopedWorkspace,
        msa_file: &std::path::Path,
        model: &str,
    ) -> Result<PatternStats> {
        let prefix = workspace.prefix("parse");
        let spec = InvocationSpec::parse(&self.executable, msa_file, model, &prefix);
        runner::run(&spec, &self.options.control)?;

        let values = log::parse_log(&artifacts::log_path(&prefix), &log::PARSE_METRICS)?;
        Ok(PatternStats {
            patterns: values["patterns"],
            gaps: values["gaps"],
            invariant: values["invariant"],
        })
    }

    fn infer_trees(
        &self,
        workspace: &ScopedWorkspace,
        msa_file: &std::path::Path,
        model: &str,
    ) -> Result<PathBuf> {
        let prefix = workspace.prefix("pars");
        let mut spec = InvocationSpec::tree_search(
            &self.executable,
            msa_file,
            model,
            &prefix,
            self.options.n_trees,
        )
        .option("seed", self.options.seed.to_string());
        if self.options.redo {
            spec = spec.switch("redo");
        }
        if let Some(threads) = self.options.threads {
            spec = spec.option("threads", threads.to_string());
        }
        runner::run(&spec, &self.options.control)?;

        Ok(artifacts::start_tree_path(&prefix))
    }

    fn persist_trees(&self, trees_file: &std::path::Path, destination: &std::path::Path) -> Result<()> {
        match fs::copy(trees_file, destination) {
            Ok(_) => Ok(()),
            Err(e) => match self.options.persist_severity {
                PersistSeverity::Warn => {
                    warn!(
                        destination = %destination.display(),
                        error = %e,
                        "could not persist parsimony trees; continuing"
                    );
                    Ok(())
                }
                PersistSeverity::Fail => Err(e.into()),
            },
        }
    }

    fn rf_distances(
        &self,
        workspace: &ScopedWorkspace,
        trees_file: &std::path::Path,
    ) -> Result<DistanceStats> {
        let prefix = workspace.prefix("rfdist");
        let mut spec = InvocationSpec::rf_distance(&self.executable, trees_file, &prefix);
        if self.options.redo {
            spec = spec.switch("redo");
        }
        runner::run(&spec, &self.options.control)?;

        let values = log::parse_log(&artifacts::log_path(&prefix), &log::RFDIST_METRICS)?;
        Ok(DistanceStats {
            num_topos: values["num_topos"],
            rel_rfdist: values["rel_rfdist"],
        })
    }
}

/// Merge external metrics with alignment-intrinsic statistics and compute
/// the derived ratios.
fn assemble<A: Alignment>(
    alignment: &A,
    patterns: PatternStats,
    distances: DistanceStats,
    n_trees: usize,
) -> FeatureVector {
    let num_taxa = alignment.taxon_count() as f64;
    let num_sites = alignment.site_count() as f64;
    FeatureVector {
        num_taxa,
        num_sites,
        num_patterns: patterns.patterns,
        patterns_per_taxon: patterns.patterns / num_taxa,
        sites_per_taxon: num_sites / num_taxa,
        patterns_per_site: patterns.patterns / num_sites,
        proportion_gaps: patterns.gaps,
        proportion_invariant: patterns.invariant,
        entropy: alignment.entropy(),
        bollback: alignment.bollback_score(),
        pattern_entropy: alignment.pattern_entropy(),
        avg_rfdist_parsimony: distances.rel_rfdist,
        proportion_unique_topos_parsimony: distances.num_topos / n_trees as f64,
    }
}
