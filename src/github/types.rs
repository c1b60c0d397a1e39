//! GitHub REST payloads (only the fields the bot reads)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CheckLabel;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

/// `state_reason` sent when closing an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateReason {
    Completed,
    NotPlanned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Number of comments on the issue
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<User>,
    /// Present when the "issue" is a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// The check this issue tracks, from its `Check <X>` label
    pub fn check(&self) -> Option<CheckLabel> {
        self.labels
            .iter()
            .find_map(|l| CheckLabel::from_label(&l.name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    pub owner: User,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}

impl RepoInfo {
    pub fn is_vba(&self) -> bool {
        self.language.as_deref() == Some("VBA")
    }
}

/// Result of looking a repository up
#[derive(Debug, Clone)]
pub enum RepoLookup {
    Found(RepoInfo),
    /// 404: deleted, renamed away or made private
    NotFound,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<RepoInfo>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateIssueRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub labels: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CloseIssueRequest {
    pub state: IssueState,
    pub state_reason: StateReason,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LabelsRequest<'a> {
    pub labels: Vec<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_deserializes_github_payload() {
        let json = r#"{
            "number": 12,
            "title": "[octo/macros] VBA code saved with the .vb extension",
            "state": "closed",
            "labels": [{"name": "Check A"}, {"name": "stale"}],
            "comments": 2,
            "closed_at": "2026-01-05T10:00:00Z",
            "user": {"login": "vbascout-bot"}
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.number, 12);
        assert_eq!(issue.state, IssueState::Closed);
        assert_eq!(issue.check(), Some(CheckLabel::A));
        assert!(issue.has_label("stale"));
        assert!(issue.closed_at.is_some());
        assert!(!issue.is_pull_request());
    }

    #[test]
    fn test_close_request_serialization() {
        let body = serde_json::to_value(CloseIssueRequest {
            state: IssueState::Closed,
            state_reason: StateReason::NotPlanned,
        })
        .unwrap();
        assert_eq!(body["state"], "closed");
        assert_eq!(body["state_reason"], "not_planned");
    }

    #[test]
    fn test_repo_info_language() {
        let json = r#"{
            "name": "macros",
            "full_name": "octo/macros",
            "owner": {"login": "octo"},
            "html_url": "https://github.com/octo/macros",
            "language": null
        }"#;
        let repo: RepoInfo = serde_json::from_str(json).unwrap();
        assert!(!repo.is_vba());
        assert!(!repo.fork);
    }
}
