//! # Configuration Logic
//!
//! CLI argument parsing and validation via `clap` derive.
//!
//! ## Validation
//! - Input alignment and RAxML-NG binary must exist
//! - At least one tree must be requested
//!
//! ## Example CLI
//! ```bash
//! pythia --msa alignment.fasta --raxmlng /usr/local/bin/raxml-ng --threads 4
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{PythiaError, Result};
use crate::pipelines::{PersistSeverity, PipelineOptions};
use crate::raxml::RunControl;

/// Difficulty feature extraction for multiple sequence alignments
#[derive(Debug, Parser)]
#[command(name = "pythia", version, about)]
pub struct Config {
    /// Multiple sequence alignment (FASTA or PHYLIP) to characterize
    #[arg(short = 'm', long = "msa", value_name = "PATH")]
    pub msa: PathBuf,

    /// Path to the RAxML-NG binary
    #[arg(short = 'r', long = "raxmlng", value_name = "PATH")]
    pub raxmlng: PathBuf,

    /// Worker threads for parsimony inference; RAxML-NG autoconfig if unset
    #[arg(short = 't', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Number of parsimony trees to infer
    #[arg(long, value_name = "N", default_value_t = 100)]
    pub trees: usize,

    /// Random seed for the parsimony search
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    pub seed: u64,

    /// Write the feature vector as JSON to this file
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Decimals to round displayed values to
    #[arg(long, value_name = "N", default_value_t = 2)]
    pub precision: usize,

    /// Store the inferred parsimony trees as '{msa}.parsimony.trees'
    #[arg(long = "store-trees")]
    pub store_trees: bool,

    /// Treat a failed tree-persistence copy as a fatal error
    #[arg(long = "strict-store", requires = "store_trees")]
    pub strict_store: bool,

    /// Remove duplicate sequences and extract features for the reduced
    /// alignment, saved as '{msa}.pythia.reduced.fasta'
    #[arg(long = "remove-duplicates")]
    pub remove_duplicates: bool,

    /// Kill any external invocation after this many seconds
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Additionally print every extracted feature
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress progress messages
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Config {
    /// Parse CLI arguments and validate them. Help/version requests exit
    /// through clap as usual.
    pub fn parse_and_validate() -> Result<Self> {
        Self::parse().validate()
    }

    fn validate(self) -> Result<Self> {
        if !self.msa.is_file() {
            return Err(PythiaError::config(format!(
                "alignment file {} does not exist",
                self.msa.display()
            )));
        }
        if !self.raxmlng.is_file() {
            return Err(PythiaError::config(format!(
                "RAxML-NG binary {} does not exist",
                self.raxmlng.display()
            )));
        }
        if self.trees == 0 {
            return Err(PythiaError::config("at least one tree must be requested"));
        }
        Ok(self)
    }

    /// Destination for persisted parsimony trees, when requested.
    pub fn trees_destination(&self) -> Option<PathBuf> {
        self.store_trees.then(|| {
            let mut name = self.msa.as_os_str().to_os_string();
            name.push(".parsimony.trees");
            PathBuf::from(name)
        })
    }

    /// Destination for the duplicate-free alignment copy.
    pub fn reduced_msa_path(&self) -> PathBuf {
        let mut name = self.msa.as_os_str().to_os_string();
        name.push(".pythia.reduced.fasta");
        PathBuf::from(name)
    }

    /// Pipeline tunables derived from the CLI arguments.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            n_trees: self.trees,
            seed: self.seed,
            redo: true,
            threads: self.threads,
            store_trees: self.trees_destination(),
            persist_severity: if self.strict_store {
                PersistSeverity::Fail
            } else {
                PersistSeverity::Warn
            },
            control: RunControl {
                timeout: self.timeout_secs.map(Duration::from_secs),
                cancel: None,
            },
        }
    }
}
