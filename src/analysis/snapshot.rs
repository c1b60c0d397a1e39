//! Everything the decision engine needs to know about one checkout

use super::AttrResolution;
use crate::git::{self, GitResult};
use crate::models::{EolIndex, FileCounts};
use crate::scanner;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Classification and line-ending state of a repository checkout
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoSnapshot {
    pub counts: FileCounts,
    /// Contents of `.gitattributes`, read straight from disk
    pub gitattributes: Option<String>,
    /// `git ls-files --eol` records
    pub eol: EolIndex,
    /// `git check-attr` results; only resolved when `.gitattributes` exists
    pub attrs: Option<AttrResolution>,
    /// Modules whose `VERSION` header went through a CR to LF conversion
    pub double_lf_headers: Vec<String>,
}

impl RepoSnapshot {
    /// Snapshot from the filesystem alone (no git metadata)
    pub fn scan_only(repo_path: &Path) -> GitResult<Self> {
        let report = scanner::scan(repo_path);
        Ok(Self {
            counts: report.counts,
            gitattributes: read_gitattributes(repo_path)?,
            eol: EolIndex::new(),
            attrs: None,
            double_lf_headers: report.double_lf_headers,
        })
    }

    pub fn has_gitattributes(&self) -> bool {
        self.gitattributes.is_some()
    }
}

/// Scan a git checkout: counts, `.gitattributes`, ls-files and check-attr.
pub fn inspect_checkout(repo_path: &Path) -> GitResult<RepoSnapshot> {
    let mut snapshot = RepoSnapshot::scan_only(repo_path)?;

    snapshot.eol = git::ls_files_eol(repo_path)?;
    debug!("Parsed {} ls-files records", snapshot.eol.len());

    if snapshot.has_gitattributes() {
        snapshot.attrs = Some(AttrResolution::resolve(repo_path)?);
    }

    Ok(snapshot)
}

fn read_gitattributes(repo_path: &Path) -> GitResult<Option<String>> {
    let path = repo_path.join(".gitattributes");
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = std::fs::read(&path)?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
