//! Line-ending analysis for exported VBA modules
//!
//! The VBE only imports `.frm`/`.cls` files with CRLF line endings. These
//! helpers decide, from `git check-attr` results and `git ls-files --eol`
//! records, whether a repository will hand those files out with LF.

pub mod snapshot;

pub use snapshot::{inspect_checkout, RepoSnapshot};

use crate::models::{EolIndex, ExtTag, FileCounts, TextAttr};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use crate::git::{self, GitResult};

/// Errors raised by the analysis preconditions
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No .gitattributes file in the repository")]
    MissingGitattributes,
}

/// Resolved `eol`/`text` attributes for `*.frm` and `*.cls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttrResolution {
    pub frm_eol: String,
    pub frm_text: String,
    pub cls_eol: String,
    pub cls_text: String,
}

impl AttrResolution {
    /// Run the four `git check-attr` queries in a checkout
    pub fn resolve(repo_path: &Path) -> GitResult<Self> {
        Ok(Self {
            frm_eol: git::check_attr(repo_path, "eol", "*.frm")?,
            frm_text: git::check_attr(repo_path, "text", "*.frm")?,
            cls_eol: git::check_attr(repo_path, "eol", "*.cls")?,
            cls_text: git::check_attr(repo_path, "text", "*.cls")?,
        })
    }
}

/// `eol` resolves to something other than CRLF
pub fn is_not_crlf(eol: &str) -> bool {
    matches!(eol, "lf" | "unspecified")
}

/// `text` normalization is switched on
pub fn is_text_forced(text: &str) -> bool {
    matches!(text, "auto" | "set")
}

/// Will `.frm`/`.cls` files be checked out with the wrong line endings?
pub fn is_misconfigured(counts: &FileCounts, attrs: &AttrResolution) -> bool {
    let frm = is_text_forced(&attrs.frm_text)
        && is_not_crlf(&attrs.frm_eol)
        && counts.get(ExtTag::Frm) > 0;
    let cls = is_text_forced(&attrs.cls_text)
        && is_not_crlf(&attrs.cls_eol)
        && counts.get(ExtTag::Cls) > 0;
    frm || cls
}

/// Misconfiguration check for a snapshot; requires a `.gitattributes` file.
pub fn gitattributes_misconfigured(snapshot: &RepoSnapshot) -> Result<bool, AnalysisError> {
    let attrs = snapshot
        .attrs
        .as_ref()
        .filter(|_| snapshot.gitattributes.is_some())
        .ok_or(AnalysisError::MissingGitattributes)?;
    Ok(is_misconfigured(&snapshot.counts, attrs))
}

static SHEET_CLS: OnceLock<Regex> = OnceLock::new();

fn sheet_cls_regex() -> &'static Regex {
    SHEET_CLS.get_or_init(|| Regex::new(r"^Sheet\d+\.cls$").unwrap())
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Document modules the VBE exports with LF anyway
pub fn is_benign(path: &str) -> bool {
    let name = file_name(path);
    name == "ThisWorkbook.cls" || sheet_cls_regex().is_match(name)
}

pub fn is_frm_or_cls(path: &str) -> bool {
    let lower = file_name(path).to_ascii_lowercase();
    lower.ends_with(".frm") || lower.ends_with(".cls")
}

/// `.frm`/`.cls` files committed with LF (no `.gitattributes` in play)
pub fn lf_index_files(eol: &EolIndex) -> Vec<String> {
    eol.iter()
        .filter(|(path, rec)| is_frm_or_cls(path) && !is_benign(path) && rec.index_is_lf())
        .map(|(path, _)| path.clone())
        .collect()
}

/// Without a `.gitattributes`, LF-committed modules mean the author relies on
/// their own client settings and everybody else gets LF.
pub fn gitattributes_needed(eol: &EolIndex) -> bool {
    !lf_index_files(eol).is_empty()
}

/// `.frm`/`.cls` files marked `-text` while committed with LF: nothing will
/// ever convert them, on clone or in GitHub's zip download.
pub fn check_f_files(eol: &EolIndex) -> Vec<String> {
    eol.iter()
        .filter(|(path, rec)| {
            is_frm_or_cls(path)
                && !is_benign(path)
                && rec.text_attr() == TextAttr::Unset
                && rec.index_is_lf()
        })
        .map(|(path, _)| path.clone())
        .collect()
}

/// `.frm`/`.cls` files currently checked out with LF
pub fn lf_working_directory_files(eol: &EolIndex) -> Vec<String> {
    eol.iter()
        .filter(|(path, rec)| is_frm_or_cls(path) && rec.working_directory_is_lf())
        .map(|(path, _)| path.clone())
        .collect()
}

/// Does `.gitattributes` force linguist to treat `ext` as VBA?
///
/// `ext` is the bare extension (`vb`, `txt`); `None` looks for a pattern
/// covering extension-less files.
pub fn has_linguist_override(gitattributes: &str, ext: Option<&str>) -> bool {
    gitattributes.lines().any(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return false;
        }
        let mut parts = line.split_whitespace();
        let Some(pattern) = parts.next() else {
            return false;
        };
        if !parts.any(|attr| attr.eq_ignore_ascii_case("linguist-language=VBA")) {
            return false;
        }
        match ext {
            Some(ext) => pattern.ends_with(&format!("*.{}", ext)),
            None => !file_name(pattern).contains('.'),
        }
    })
}

#[cfg(test)]
mod tests;
