//! Shallow clones into the scratch folder
//!
//! Each repository gets its own folder named `<owner> --- <repo>` under the
//! scratch directory. A folder that already exists is never reused.

use super::{run_git, GitError, GitResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Separates owner and repository in checkout folder names
pub const SEPARATOR: &str = " --- ";

/// Folder name for a repository inside the scratch directory
pub fn unique_folder(owner: &str, repo: &str) -> String {
    format!("{}{}{}", owner, SEPARATOR, repo)
}

/// Checkout path for a repository inside the scratch directory
pub fn repo_path(scratch_dir: &Path, owner: &str, repo: &str) -> PathBuf {
    scratch_dir.join(unique_folder(owner, repo))
}

/// `git clone --depth 1 --quiet <url> <scratch>/<owner> --- <repo>`
pub fn clone_repo(url: &str, scratch_dir: &Path, owner: &str, repo: &str) -> GitResult<PathBuf> {
    let destination = repo_path(scratch_dir, owner, repo);
    if destination.exists() {
        return Err(GitError::AlreadyExists(destination));
    }

    std::fs::create_dir_all(scratch_dir)?;

    info!("Cloning {} into {}", url, destination.display());
    let folder = unique_folder(owner, repo);
    run_git(scratch_dir, &["clone", "--depth", "1", "--quiet", url, &folder])?;

    Ok(destination)
}
