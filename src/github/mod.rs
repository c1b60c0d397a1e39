//! GitHub REST API access
//!
//! The decision engine talks to GitHub only through the [`IssueTracker`]
//! trait; [`GitHubClient`] is the ureq-backed implementation.
//!
//! # Environment Variables
//!
//! - `GITHUB_TOKEN`: bearer token (required)
//! - `GITHUB_REPOSITORY`: `owner/repo` slug of the tracking repository (required)
//! - `GITHUB_API_URL`: API base URL (default: `https://api.github.com`)

mod client;
mod types;

pub use client::GitHubClient;
pub use types::{
    Comment, Issue, IssueState, Label, RepoInfo, RepoLookup, StateReason, User,
};

use thiserror::Error;

/// Errors that can occur when talking to GitHub
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Missing configuration: {0} not set")]
    MissingEnv(&'static str),

    #[error("GitHub request failed: {0}")]
    RequestFailed(String),

    #[error("GitHub API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse GitHub response: {0}")]
    ParseError(String),
}

impl GitHubError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type GitHubResult<T> = Result<T, GitHubError>;

/// Operations the bot performs against the hosting service.
///
/// Issue and comment operations target the tracking repository; repository
/// lookups and searches target arbitrary public repositories.
pub trait IssueTracker {
    /// Look a repository up; a 404 is reported as [`RepoLookup::NotFound`]
    fn repo_info(&self, owner: &str, repo: &str) -> GitHubResult<RepoLookup>;

    /// All issues in the tracking repository with the given state (pull requests excluded)
    fn list_issues(&self, state: IssueState) -> GitHubResult<Vec<Issue>>;

    fn get_issue(&self, number: u64) -> GitHubResult<Issue>;

    fn get_comment(&self, comment_id: u64) -> GitHubResult<Comment>;

    fn list_comments(&self, issue_number: u64) -> GitHubResult<Vec<Comment>>;

    fn create_comment(&self, issue_number: u64, body: &str) -> GitHubResult<()>;

    fn close_issue(&self, issue_number: u64, reason: StateReason) -> GitHubResult<()>;

    fn add_labels(&self, issue_number: u64, labels: &[&str]) -> GitHubResult<()>;

    /// Remove a label; removing a label the issue does not carry is not an error
    fn remove_label(&self, issue_number: u64, label: &str) -> GitHubResult<()>;

    fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> GitHubResult<Issue>;

    fn search_repositories(
        &self,
        query: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Vec<RepoInfo>>;
}

/// Has a comment carrying `marker` already been posted?
pub fn already_commented(comments: &[Comment], marker: &str) -> bool {
    comments.iter().any(|c| c.body.contains(marker))
}
