//! # Artifact Resolver
//!
//! RAxML-NG names every output file by appending a fixed suffix to the
//! invocation prefix. These helpers encode that naming contract and nothing
//! else: no I/O, no existence checks. Whether the file actually exists is
//! the concern of whoever opens it (the log parser or the tree copy).

use std::path::{Path, PathBuf};

/// Suffix appended to the prefix for the human-readable run log.
const LOG_SUFFIX: &str = ".raxml.log";

/// Suffix appended to the prefix for inferred starting trees.
const START_TREE_SUFFIX: &str = ".raxml.startTree";

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// `{prefix}.raxml.log` — produced by every invocation mode.
pub fn log_path(prefix: &Path) -> PathBuf {
    with_suffix(prefix, LOG_SUFFIX)
}

/// `{prefix}.raxml.startTree` — produced by tree-search mode, one Newick
/// tree per line. Opaque to this crate.
pub fn start_tree_path(prefix: &Path) -> PathBuf {
    with_suffix(prefix, START_TREE_SUFFIX)
}
