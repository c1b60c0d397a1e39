//! Git CLI integration
//!
//! vbascout shells out to the `git` binary for everything it needs from a
//! checkout: shallow clones, `git ls-files --eol` and `git check-attr`.
//!
//! # Example
//!
//! ```no_run
//! use vbascout::git::{self, checkout};
//! use std::path::Path;
//!
//! let path = checkout::clone_repo(
//!     "https://github.com/octo/macros",
//!     Path::new("repos"),
//!     "octo",
//!     "macros",
//! ).unwrap();
//! let records = git::ls_files_eol(&path).unwrap();
//! ```

pub mod attr;
pub mod checkout;
pub mod eol;

pub use attr::{check_attr, parse_check_attr};
pub use eol::parse_ls_files_eol;

use crate::models::EolIndex;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Errors from running git commands
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Checkout folder already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to run `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {command}` exited with {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GitResult<T> = Result<T, GitError>;

/// Run git with `args` inside `cwd` and return stdout.
pub(crate) fn run_git(cwd: &Path, args: &[&str]) -> GitResult<String> {
    let command = args.join(" ");
    debug!("Running git {} in {}", command, cwd.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::Failed {
            command,
            code: output.status.code(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run `git ls-files --eol` in a checkout and parse the result
pub fn ls_files_eol(repo_path: &Path) -> GitResult<EolIndex> {
    let stdout = run_git(repo_path, &["ls-files", "--eol"])?;
    Ok(parse_ls_files_eol(stdout.lines()))
}
