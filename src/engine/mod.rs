//! Check decision engine
//!
//! Revisits open tracking issues and decides, per check label, whether to
//! comment, close or relabel. The engine itself is pure: [`decide`] maps a
//! repository snapshot and the issue's comment history to a [`FollowUp`],
//! and [`apply`] carries it out against an [`IssueTracker`].
//!
//! State is rebuilt from GitHub on every run (labels, title, comments).

pub mod create;
pub mod messages;

pub use create::{
    draft_issue, scan_repository, select_check, IssueDraft, IssueGate, RunState, ScanOutcome, Skip,
};

use crate::analysis::{self, RepoSnapshot};
use crate::exclusion::ExclusionSet;
use crate::git;
use crate::github::{already_commented, Comment, Issue, IssueTracker, RepoInfo, RepoLookup, StateReason};
use crate::models::{CheckLabel, ExtTag, TrackedRepo};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

pub const LABEL_COMPLETED: &str = "completed";
pub const LABEL_PARTIALLY_COMPLETED: &str = "partially completed";
pub const LABEL_STALE: &str = "stale";
pub const LABEL_REPO_DELETED: &str = "repo deleted";

/// Produces a [`RepoSnapshot`] for a repository
pub trait SnapshotSource {
    fn snapshot(&self, repo: &RepoInfo) -> Result<RepoSnapshot>;
}

/// Shallow-clones into the scratch folder, inspects, then removes the checkout
pub struct CheckoutSource {
    scratch_dir: PathBuf,
}

impl CheckoutSource {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }
}

impl SnapshotSource for CheckoutSource {
    fn snapshot(&self, repo: &RepoInfo) -> Result<RepoSnapshot> {
        let path = git::checkout::clone_repo(
            &repo.html_url,
            &self.scratch_dir,
            &repo.owner.login,
            &repo.name,
        )
        .with_context(|| format!("Failed to clone {}", repo.full_name))?;

        let snapshot = analysis::inspect_checkout(&path)
            .with_context(|| format!("Failed to inspect {}", repo.full_name));

        if let Err(e) = std::fs::remove_dir_all(&path) {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
        snapshot
    }
}

/// Actions to take on a tracking issue, in the order they are applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowUp {
    pub comment: Option<String>,
    pub close: Option<StateReason>,
    pub add_labels: Vec<&'static str>,
    pub remove_labels: Vec<&'static str>,
}

impl FollowUp {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self == &Self::default()
    }

    /// Close as completed with the usual label changes
    fn resolved(comment: String) -> Self {
        Self {
            comment: Some(comment),
            close: Some(StateReason::Completed),
            add_labels: vec![LABEL_COMPLETED],
            remove_labels: vec![LABEL_STALE, LABEL_PARTIALLY_COMPLETED],
        }
    }

    fn comment(comment: String) -> Self {
        Self {
            comment: Some(comment),
            ..Self::default()
        }
    }

    fn partially_completed(comment: String) -> Self {
        Self {
            comment: Some(comment),
            add_labels: vec![LABEL_PARTIALLY_COMPLETED],
            ..Self::default()
        }
    }

    /// The repository is gone: close without evaluating any check
    pub fn deleted() -> Self {
        Self {
            comment: Some(messages::DELETED.to_string()),
            close: Some(StateReason::NotPlanned),
            add_labels: vec![LABEL_REPO_DELETED],
            remove_labels: Vec::new(),
        }
    }
}

/// Counted tag and linguist override extension for an extension check
fn stray_tag(check: CheckLabel) -> Option<(ExtTag, Option<&'static str>)> {
    match check {
        CheckLabel::A => Some((ExtTag::Vb, Some("vb"))),
        CheckLabel::B => Some((ExtTag::Vbs, Some("vbs"))),
        CheckLabel::C => Some((ExtTag::NoExt, None)),
        CheckLabel::D => Some((ExtTag::Txt, Some("txt"))),
        _ => None,
    }
}

/// Decide what to do with an open issue tracking `check`
pub fn decide(
    check: CheckLabel,
    repo: &RepoInfo,
    snapshot: &RepoSnapshot,
    comments: &[Comment],
) -> FollowUp {
    match check {
        CheckLabel::A | CheckLabel::B | CheckLabel::C | CheckLabel::D => {
            decide_extension(check, repo, snapshot, comments)
        }
        CheckLabel::E => decide_gitattributes(check, snapshot, comments),
        CheckLabel::F => decide_check_f(snapshot),
        CheckLabel::G => {
            if !snapshot.has_gitattributes() {
                debug!("{}: still no .gitattributes", repo.full_name);
                return FollowUp::none();
            }
            decide_gitattributes(check, snapshot, comments)
        }
    }
}

fn decide_extension(
    check: CheckLabel,
    repo: &RepoInfo,
    snapshot: &RepoSnapshot,
    comments: &[Comment],
) -> FollowUp {
    let Some((tag, override_ext)) = stray_tag(check) else {
        return FollowUp::none();
    };
    let now_vba = repo.is_vba();
    let stray = snapshot.counts.get(tag);
    let overridden = snapshot
        .gitattributes
        .as_deref()
        .is_some_and(|attrs| analysis::has_linguist_override(attrs, override_ext));

    if stray == 0 || overridden {
        return FollowUp::resolved(messages::extension_resolved(now_vba));
    }

    if !now_vba && snapshot.counts.get(ExtTag::Vba) > 0 {
        if already_commented(comments, &messages::marker(check, 'B')) {
            return FollowUp::none();
        }
        return FollowUp::comment(messages::mixed_extensions(check));
    }

    if already_commented(comments, &messages::marker(check, 'A')) {
        return FollowUp::none();
    }
    let body = messages::still_stray(check, now_vba);
    if now_vba {
        FollowUp::partially_completed(body)
    } else {
        FollowUp::comment(body)
    }
}

/// Check E, and Check G once a `.gitattributes` exists
fn decide_gitattributes(
    check: CheckLabel,
    snapshot: &RepoSnapshot,
    comments: &[Comment],
) -> FollowUp {
    match analysis::gitattributes_misconfigured(snapshot) {
        Ok(true) => FollowUp::none(),
        Ok(false) => {
            let lf_files = analysis::lf_working_directory_files(&snapshot.eol);
            if lf_files.is_empty() {
                return FollowUp::resolved(messages::gitattributes_resolved(check));
            }
            if already_commented(comments, &messages::marker(check, 'A')) {
                return FollowUp::none();
            }
            FollowUp::partially_completed(messages::renormalize(check, &lf_files))
        }
        Err(e) => {
            info!("{}: {}", check, e);
            FollowUp::none()
        }
    }
}

fn decide_check_f(snapshot: &RepoSnapshot) -> FollowUp {
    if analysis::check_f_files(&snapshot.eol).is_empty() {
        FollowUp::resolved(messages::crlf_committed())
    } else {
        FollowUp::none()
    }
}

/// Carry out a follow-up: comment, labels, then close.
///
/// The issue is closed only after every label change succeeded.
pub fn apply<T: IssueTracker + ?Sized>(tracker: &T, issue_number: u64, follow_up: &FollowUp) -> Result<()> {
    if let Some(body) = &follow_up.comment {
        tracker
            .create_comment(issue_number, body)
            .with_context(|| format!("Failed to comment on issue {}", issue_number))?;
    }
    if !follow_up.add_labels.is_empty() {
        tracker
            .add_labels(issue_number, &follow_up.add_labels)
            .with_context(|| format!("Failed to label issue {}", issue_number))?;
    }
    for label in &follow_up.remove_labels {
        tracker
            .remove_label(issue_number, label)
            .with_context(|| format!("Failed to remove label '{}' from issue {}", label, issue_number))?;
    }
    if let Some(reason) = follow_up.close {
        tracker
            .close_issue(issue_number, reason)
            .with_context(|| format!("Failed to close issue {}", issue_number))?;
    }
    Ok(())
}

/// What happened to one issue during a follow-up run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// Not a tracking issue (no check label or unparsable title)
    Ignored,
    /// The owner opted out; the repository is not looked at
    Excluded,
    /// Nothing changed since the last run
    Unchanged,
    Updated(FollowUp),
    Deleted,
}

/// Revisit one tracking issue
pub fn follow_up_issue<T, S>(
    tracker: &T,
    source: &S,
    exclusions: &ExclusionSet,
    issue: &Issue,
) -> Result<IssueOutcome>
where
    T: IssueTracker + ?Sized,
    S: SnapshotSource + ?Sized,
{
    let Some(check) = issue.check() else {
        debug!("Issue {} has no check label", issue.number);
        return Ok(IssueOutcome::Ignored);
    };
    let Some(tracked) = TrackedRepo::from_title(&issue.title) else {
        warn!("Issue {} title is not '[owner/repo] ...': {}", issue.number, issue.title);
        return Ok(IssueOutcome::Ignored);
    };
    if exclusions.contains(&tracked.owner) {
        info!("Issue {}: {} opted out, skipping", issue.number, tracked.owner);
        return Ok(IssueOutcome::Excluded);
    }

    let repo = match tracker
        .repo_info(&tracked.owner, &tracked.repo)
        .with_context(|| format!("Failed to look up {}", tracked))?
    {
        RepoLookup::Found(repo) => repo,
        RepoLookup::NotFound => {
            info!("{} has been deleted, closing issue {}", tracked, issue.number);
            apply(tracker, issue.number, &FollowUp::deleted())?;
            return Ok(IssueOutcome::Deleted);
        }
    };

    let snapshot = source.snapshot(&repo)?;
    let comments = tracker
        .list_comments(issue.number)
        .with_context(|| format!("Failed to list comments of issue {}", issue.number))?;

    let follow_up = decide(check, &repo, &snapshot, &comments);
    if follow_up.is_none() {
        debug!("Issue {} ({}): no change", issue.number, check);
        return Ok(IssueOutcome::Unchanged);
    }

    info!(
        "Issue {} ({}): comment={} close={:?} labels=+{:?} -{:?}",
        issue.number,
        check,
        follow_up.comment.is_some(),
        follow_up.close,
        follow_up.add_labels,
        follow_up.remove_labels
    );
    apply(tracker, issue.number, &follow_up)?;
    Ok(IssueOutcome::Updated(follow_up))
}

/// Totals for a follow-up run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowUpStats {
    pub examined: usize,
    pub updated: usize,
    pub closed: usize,
    pub deleted: usize,
    pub excluded: usize,
    pub failed: usize,
}

/// Revisit every tracking issue; a failing issue is logged and skipped
pub fn follow_up_issues<T, S>(
    tracker: &T,
    source: &S,
    exclusions: &ExclusionSet,
    issues: &[Issue],
    limit: Option<usize>,
) -> FollowUpStats
where
    T: IssueTracker + ?Sized,
    S: SnapshotSource + ?Sized,
{
    let mut stats = FollowUpStats::default();

    let tracking = issues
        .iter()
        .filter(|i| !i.is_pull_request() && i.check().is_some())
        .take(limit.unwrap_or(usize::MAX));

    for issue in tracking {
        stats.examined += 1;
        match follow_up_issue(tracker, source, exclusions, issue) {
            Ok(IssueOutcome::Updated(follow_up)) => {
                stats.updated += 1;
                if follow_up.close.is_some() {
                    stats.closed += 1;
                }
            }
            Ok(IssueOutcome::Deleted) => stats.deleted += 1,
            Ok(IssueOutcome::Excluded) => stats.excluded += 1,
            Ok(IssueOutcome::Ignored) | Ok(IssueOutcome::Unchanged) => {}
            Err(e) => {
                stats.failed += 1;
                error!("Issue {} ({}): {:#}", issue.number, issue.title, e);
            }
        }
    }

    stats
}
