//! # Scoped Workspace
//!
//! One pipeline run owns one uniquely-named temporary directory holding
//! every intermediate RAxML-NG artifact. Removal is tied to `Drop`, so the
//! directory disappears on every exit path: normal return, early `?`, or
//! panic unwinding. Runs never share a workspace, which is what makes
//! independent pipeline runs safe to execute concurrently.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// An owned temporary directory scoped to a single pipeline run.
#[derive(Debug)]
pub struct ScopedWorkspace {
    dir: TempDir,
}

impl ScopedWorkspace {
    /// Acquire a fresh uniquely-named workspace directory.
    pub fn acquire() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("pythia-").tempdir()?;
        Ok(Self { dir })
    }

    /// The workspace root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// An invocation prefix inside the workspace, e.g. `prefix("pars")`
    /// yields `{workspace}/pars`; RAxML-NG appends its own suffixes.
    pub fn prefix(&self, stem: &str) -> PathBuf {
        self.dir.path().join(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_is_removed_on_drop() {
        let path = {
            let ws = ScopedWorkspace::acquire().unwrap();
            std::fs::write(ws.prefix("pars.raxml.log"), "contents").unwrap();
            assert!(ws.path().is_dir());
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_workspaces_are_unique() {
        let a = ScopedWorkspace::acquire().unwrap();
        let b = ScopedWorkspace::acquire().unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_prefix_lives_inside_workspace() {
        let ws = ScopedWorkspace::acquire().unwrap();
        assert!(ws.prefix("rfdist").starts_with(ws.path()));
    }
}
