//! Exclude command - honour "stop" replies on tracking issues

use anyhow::{Context, Result};
use tracing::info;
use vbascout::config::BotConfig;
use vbascout::exclusion::{is_stop_request, ExclusionSet};
use vbascout::github::{Comment, GitHubClient, Issue, IssueTracker};
use vbascout::models::TrackedRepo;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum StopOutcome {
    Added(String),
    AlreadyExcluded(String),
    NotAStop,
    /// Somebody other than the flagged user asked
    NotTheOwner,
    /// Title does not name a repository
    NoUser,
}

/// Apply a comment to the exclusion list
pub(crate) fn process_stop_request(
    issue: &Issue,
    comment: &Comment,
    exclusions: &mut ExclusionSet,
) -> std::io::Result<StopOutcome> {
    if !is_stop_request(&comment.body) {
        return Ok(StopOutcome::NotAStop);
    }
    let Some(tracked) = TrackedRepo::from_title(&issue.title) else {
        return Ok(StopOutcome::NoUser);
    };
    let author = comment.user.as_ref().map(|u| u.login.as_str()).unwrap_or("");
    if !author.eq_ignore_ascii_case(&tracked.owner) {
        return Ok(StopOutcome::NotTheOwner);
    }

    if exclusions.add(&tracked.owner)? {
        Ok(StopOutcome::Added(tracked.owner))
    } else {
        Ok(StopOutcome::AlreadyExcluded(tracked.owner))
    }
}

pub fn run(config: &BotConfig, issue_id: u64, comment_id: u64) -> Result<()> {
    let client = GitHubClient::from_env()?;

    let issue = client
        .get_issue(issue_id)
        .with_context(|| format!("Could not fetch issue {}", issue_id))?;
    let comment = client
        .get_comment(comment_id)
        .with_context(|| format!("Could not fetch comment {}", comment_id))?;

    let path = &config.paths.exclusion_file;
    let mut exclusions = ExclusionSet::load(path)
        .with_context(|| format!("Failed to read exclusion list {}", path.display()))?;

    match process_stop_request(&issue, &comment, &mut exclusions)
        .with_context(|| format!("Failed to update {}", path.display()))?
    {
        StopOutcome::Added(user) => println!("User '{}' added to the exclusion list.", user),
        StopOutcome::AlreadyExcluded(user) => println!("User '{}' is already excluded.", user),
        StopOutcome::NotAStop => println!("Comment is not 'stop'. No action taken."),
        StopOutcome::NotTheOwner => {
            info!("Comment {} is not from the flagged user", comment_id);
            println!("Comment is not from the flagged user. No action taken.");
        }
        StopOutcome::NoUser => println!("Could not extract user from issue title."),
    }

    Ok(())
}
