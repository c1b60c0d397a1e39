//! GitHub REST client
//!
//! Sync HTTP via ureq; status codes are mapped by hand so a 404 on a
//! repository lookup can be told apart from a transport failure.

use super::types::{
    CloseIssueRequest, CommentRequest, CreateIssueRequest, LabelsRequest, SearchResponse,
};
use super::{
    Comment, GitHubError, GitHubResult, Issue, IssueState, IssueTracker, RepoInfo, RepoLookup,
    StateReason,
};
use serde::de::DeserializeOwned;
use std::env;
use tracing::{debug, info};
use ureq::http::Response;
use ureq::Body;

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("vbascout/", env!("CARGO_PKG_VERSION"));
/// GitHub's maximum page size
pub const PER_PAGE: usize = 100;

/// GitHub client bound to one tracking repository
pub struct GitHubClient {
    api_url: String,
    repo_slug: String,
    token: String,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

impl GitHubClient {
    pub fn new(
        api_url: impl Into<String>,
        repo_slug: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            repo_slug: repo_slug.into(),
            token: token.into(),
            agent: make_agent(),
        }
    }

    /// Build from `GITHUB_TOKEN`, `GITHUB_REPOSITORY` and `GITHUB_API_URL`
    pub fn from_env() -> GitHubResult<Self> {
        let token = non_empty_env("GITHUB_TOKEN").ok_or(GitHubError::MissingEnv("GITHUB_TOKEN"))?;
        let repo_slug = non_empty_env("GITHUB_REPOSITORY")
            .ok_or(GitHubError::MissingEnv("GITHUB_REPOSITORY"))?;
        let api_url = non_empty_env("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Self::new(api_url, repo_slug, token))
    }

    pub fn repo_slug(&self) -> &str {
        &self.repo_slug
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}{}", self.api_url, self.repo_slug, path)
    }

    fn authorize<B>(&self, req: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        req.header("Accept", "application/vnd.github+json")
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> GitHubResult<T> {
        let mut req = self.authorize(self.agent.get(url));
        for (key, value) in query {
            req = req.query(key, value);
        }
        let response = req.call().map_err(transport)?;
        read_json(ensure_success(response)?)
    }

    /// Follow `page` until a short page comes back
    fn get_paginated<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> GitHubResult<Vec<T>> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let mut params = query.to_vec();
            params.push(("per_page", PER_PAGE.to_string()));
            params.push(("page", page.to_string()));

            let items: Vec<T> = self.get_json(url, &params)?;
            let len = items.len();
            all.extend(items);
            if len < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(all)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn transport(e: ureq::Error) -> GitHubError {
    GitHubError::RequestFailed(e.to_string())
}

fn ensure_success(response: Response<Body>) -> GitHubResult<Response<Body>> {
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let message = response.into_body().read_to_string().unwrap_or_default();
        return Err(GitHubError::ApiError { status, message });
    }
    Ok(response)
}

fn read_json<T: DeserializeOwned>(response: Response<Body>) -> GitHubResult<T> {
    response
        .into_body()
        .read_json()
        .map_err(|e| GitHubError::ParseError(e.to_string()))
}

impl IssueTracker for GitHubClient {
    fn repo_info(&self, owner: &str, repo: &str) -> GitHubResult<RepoLookup> {
        let url = format!(
            "{}/repos/{}/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        let response = self.authorize(self.agent.get(&url)).call().map_err(transport)?;
        if response.status().as_u16() == 404 {
            debug!("{}/{} returned 404", owner, repo);
            return Ok(RepoLookup::NotFound);
        }
        read_json(ensure_success(response)?).map(RepoLookup::Found)
    }

    fn list_issues(&self, state: IssueState) -> GitHubResult<Vec<Issue>> {
        let issues: Vec<Issue> = self.get_paginated(
            &self.repo_url("/issues"),
            &[("state", state.as_str().to_string())],
        )?;
        Ok(issues.into_iter().filter(|i| !i.is_pull_request()).collect())
    }

    fn get_issue(&self, number: u64) -> GitHubResult<Issue> {
        self.get_json(&self.repo_url(&format!("/issues/{}", number)), &[])
    }

    fn get_comment(&self, comment_id: u64) -> GitHubResult<Comment> {
        self.get_json(&self.repo_url(&format!("/issues/comments/{}", comment_id)), &[])
    }

    fn list_comments(&self, issue_number: u64) -> GitHubResult<Vec<Comment>> {
        self.get_paginated(&self.repo_url(&format!("/issues/{}/comments", issue_number)), &[])
    }

    fn create_comment(&self, issue_number: u64, body: &str) -> GitHubResult<()> {
        let url = self.repo_url(&format!("/issues/{}/comments", issue_number));
        let response = self
            .authorize(self.agent.post(&url))
            .send_json(&CommentRequest { body })
            .map_err(transport)?;
        ensure_success(response)?;
        info!("Comment posted on issue {}", issue_number);
        Ok(())
    }

    fn close_issue(&self, issue_number: u64, reason: StateReason) -> GitHubResult<()> {
        let url = self.repo_url(&format!("/issues/{}", issue_number));
        let response = self
            .authorize(self.agent.patch(&url))
            .send_json(&CloseIssueRequest {
                state: IssueState::Closed,
                state_reason: reason,
            })
            .map_err(transport)?;
        ensure_success(response)?;
        info!("Issue {} closed ({:?})", issue_number, reason);
        Ok(())
    }

    fn add_labels(&self, issue_number: u64, labels: &[&str]) -> GitHubResult<()> {
        let url = self.repo_url(&format!("/issues/{}/labels", issue_number));
        let response = self
            .authorize(self.agent.post(&url))
            .send_json(&LabelsRequest {
                labels: labels.to_vec(),
            })
            .map_err(transport)?;
        ensure_success(response)?;
        debug!("Added labels {:?} to issue {}", labels, issue_number);
        Ok(())
    }

    fn remove_label(&self, issue_number: u64, label: &str) -> GitHubResult<()> {
        let url = self.repo_url(&format!(
            "/issues/{}/labels/{}",
            issue_number,
            urlencoding::encode(label)
        ));
        let response = self
            .authorize(self.agent.delete(&url))
            .call()
            .map_err(transport)?;
        if response.status().as_u16() == 404 {
            debug!("Issue {} has no label '{}'", issue_number, label);
            return Ok(());
        }
        ensure_success(response)?;
        Ok(())
    }

    fn create_issue(&self, title: &str, body: &str, labels: &[&str]) -> GitHubResult<Issue> {
        let response = self
            .authorize(self.agent.post(&self.repo_url("/issues")))
            .send_json(&CreateIssueRequest {
                title,
                body,
                labels: labels.to_vec(),
            })
            .map_err(transport)?;
        let issue: Issue = read_json(ensure_success(response)?)?;
        info!("Created issue {}: {}", issue.number, issue.title);
        Ok(issue)
    }

    fn search_repositories(
        &self,
        query: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> GitHubResult<Vec<RepoInfo>> {
        let url = format!("{}/search/repositories", self.api_url);
        let response: SearchResponse = self.get_json(
            &url,
            &[
                ("q", query.to_string()),
                ("sort", sort.to_string()),
                ("order", "desc".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ],
        )?;
        Ok(response.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_url() {
        let client = GitHubClient::new("https://api.github.com/", "bots/vba-tracker", "t0ken");
        assert_eq!(
            client.repo_url("/issues/3"),
            "https://api.github.com/repos/bots/vba-tracker/issues/3"
        );
        assert_eq!(client.repo_slug(), "bots/vba-tracker");
    }

    #[test]
    fn test_user_agent_names_the_bot() {
        assert!(USER_AGENT.starts_with("vbascout/"));
    }
}
