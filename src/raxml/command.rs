//! # Command Builder
//!
//! Pure construction of RAxML-NG argument vectors. An [`InvocationSpec`] is
//! immutable once built and corresponds to exactly one external-process
//! call; [`InvocationSpec::to_args`] performs no I/O and cannot fail.
//!
//! Pass-through options are kept in an insertion-ordered map so the caller
//! decides their order on the command line; a `None` value renders as a
//! bare `--flag` switch, `Some(v)` renders as `--flag v`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// What kind of RAxML-NG run an [`InvocationSpec`] describes.
///
/// Each mode carries the inputs that only make sense for that mode:
/// distance computation runs over a tree file and takes neither `--msa`
/// nor `--model`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    /// `--parse`: alignment sanity check, reports patterns/gaps/invariant sites
    Parse { msa: PathBuf, model: String },
    /// `--start --tree pars{n}`: infer `trees` maximum-parsimony trees
    TreeSearch {
        msa: PathBuf,
        model: String,
        trees: usize,
    },
    /// `--rfdist`: pairwise topological distances over a tree set
    RfDistance { trees_file: PathBuf },
}

/// One fully-specified RAxML-NG call.
#[derive(Debug, Clone)]
pub struct InvocationSpec {
    executable: PathBuf,
    mode: InvocationMode,
    prefix: PathBuf,
    options: IndexMap<String, Option<String>>,
}

impl InvocationSpec {
    /// Spec for a parse-mode run over `msa` under substitution model `model`.
    pub fn parse(
        executable: impl Into<PathBuf>,
        msa: impl Into<PathBuf>,
        model: impl Into<String>,
        prefix: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            mode: InvocationMode::Parse {
                msa: msa.into(),
                model: model.into(),
            },
            prefix: prefix.into(),
            options: IndexMap::new(),
        }
    }

    /// Spec for inferring `trees` parsimony starting trees.
    pub fn tree_search(
        executable: impl Into<PathBuf>,
        msa: impl Into<PathBuf>,
        model: impl Into<String>,
        prefix: impl Into<PathBuf>,
        trees: usize,
    ) -> Self {
        Self {
            executable: executable.into(),
            mode: InvocationMode::TreeSearch {
                msa: msa.into(),
                model: model.into(),
                trees,
            },
            prefix: prefix.into(),
            options: IndexMap::new(),
        }
    }

    /// Spec for computing pairwise RF distances over `trees_file`.
    pub fn rf_distance(
        executable: impl Into<PathBuf>,
        trees_file: impl Into<PathBuf>,
        prefix: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            mode: InvocationMode::RfDistance {
                trees_file: trees_file.into(),
            },
            prefix: prefix.into(),
            options: IndexMap::new(),
        }
    }

    /// Append a pass-through `--key value` option. Insertion order is
    /// preserved on the command line.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), Some(value.into()));
        self
    }

    /// Append a bare `--key` switch.
    pub fn switch(mut self, key: impl Into<String>) -> Self {
        self.options.insert(key.into(), None);
        self
    }

    /// Path to the external binary this spec will invoke.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Output prefix shared by all artifacts of this invocation.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// The invocation mode.
    pub fn mode(&self) -> &InvocationMode {
        &self.mode
    }

    /// Render the full argument vector: executable, required flags,
    /// mode flags, then pass-through options in insertion order.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![self.executable.clone().into()];

        match &self.mode {
            InvocationMode::Parse { msa, model } => {
                args.push("--msa".into());
                args.push(msa.clone().into());
                args.push("--model".into());
                args.push(model.into());
                args.push("--prefix".into());
                args.push(self.prefix.clone().into());
                args.push("--parse".into());
            }
            InvocationMode::TreeSearch { msa, model, trees } => {
                args.push("--msa".into());
                args.push(msa.clone().into());
                args.push("--model".into());
                args.push(model.into());
                args.push("--prefix".into());
                args.push(self.prefix.clone().into());
                args.push("--start".into());
                args.push("--tree".into());
                args.push(format!("pars{{{trees}}}").into());
            }
            InvocationMode::RfDistance { trees_file } => {
                args.push("--rfdist".into());
                args.push(trees_file.clone().into());
                args.push("--prefix".into());
                args.push(self.prefix.clone().into());
            }
        }

        for (key, value) in &self.options {
            args.push(format!("--{key}").into());
            if let Some(value) = value {
                args.push(value.into());
            }
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_parse_mode_args() {
        let spec = InvocationSpec::parse("raxml-ng", "ali.fasta", "GTR+G", "/tmp/parse");
        assert_eq!(
            strings(spec.to_args()),
            vec![
                "raxml-ng",
                "--msa",
                "ali.fasta",
                "--model",
                "GTR+G",
                "--prefix",
                "/tmp/parse",
                "--parse",
            ]
        );
    }

    #[test]
    fn test_tree_search_renders_pars_count() {
        let spec = InvocationSpec::tree_search("raxml-ng", "ali.phy", "LG+G", "/tmp/pars", 100)
            .switch("redo")
            .option("seed", "0");
        let args = strings(spec.to_args());
        assert!(args.contains(&"pars{100}".to_string()));
        // pass-through options come last, in insertion order
        assert_eq!(&args[args.len() - 3..], ["--redo", "--seed", "0"]);
    }

    #[test]
    fn test_rfdist_omits_msa_and_model() {
        let spec = InvocationSpec::rf_distance("raxml-ng", "/tmp/pars.raxml.startTree", "/tmp/rf");
        let args = strings(spec.to_args());
        assert!(!args.contains(&"--msa".to_string()));
        assert!(!args.contains(&"--model".to_string()));
        assert_eq!(args[1], "--rfdist");
        assert_eq!(args[2], "/tmp/pars.raxml.startTree");
    }

    #[test]
    fn test_option_insertion_order_preserved() {
        let spec = InvocationSpec::parse("raxml-ng", "a", "GTR+G", "p")
            .option("threads", "4")
            .switch("force")
            .option("seed", "7");
        let args = strings(spec.to_args());
        let tail: Vec<_> = args[args.len() - 5..].to_vec();
        assert_eq!(tail, ["--threads", "4", "--force", "--seed", "7"]);
    }
}
