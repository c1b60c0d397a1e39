//! `git check-attr` wrapper

use super::{run_git, GitResult};
use std::path::Path;

/// Resolve one attribute for a pathspec, e.g. `check_attr(dir, "eol", "*.frm")`.
///
/// Returns the raw value git reports: `set`, `unset`, `unspecified`, or the
/// attribute value itself (`lf`, `crlf`, `auto`, ...).
pub fn check_attr(repo_path: &Path, attribute: &str, pathspec: &str) -> GitResult<String> {
    let stdout = run_git(repo_path, &["check-attr", attribute, "--", pathspec])?;
    Ok(parse_check_attr(&stdout).unwrap_or_else(|| "unspecified".to_string()))
}

/// Extract the value from `<path>: <attribute>: <value>`.
pub fn parse_check_attr(output: &str) -> Option<String> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let (_, value) = line.rsplit_once(": ")?;
    Some(value.trim().to_string())
}
