//! Issue creation for newly scanned repositories
//!
//! A repository gets at most one new issue per run, for the first check
//! that applies in this order: A, B, D, C (only while GitHub does not
//! report the repository as VBA), then E, G, F.

use super::SnapshotSource;
use crate::analysis::{self, RepoSnapshot};
use crate::exclusion::ExclusionSet;
use crate::github::{GitHubResult, Issue, IssueState, IssueTracker, RepoInfo};
use crate::models::{CheckLabel, ExtTag, TrackedRepo};
use crate::templates::{self, Templates};
use anyhow::{Context, Result};
use chrono::{DateTime, Months, Utc};
use tracing::{debug, info, warn};

/// Why a repository was not flagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// The owner opted out
    Excluded,
    /// The owner already has an open tracking issue
    OpenIssue,
    /// The same issue was closed recently
    RecentlyClosed,
    /// No check applies
    Clean,
}

/// Issue about to be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub check: CheckLabel,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Created(Issue),
    /// Dry run: the issue that would have been opened
    Drafted(IssueDraft),
    Skipped(Skip),
}

/// Tracking-repository state for one run, loaded once and kept current
#[derive(Debug, Clone, Default)]
pub struct RunState {
    open_titles: Vec<String>,
    closed: Vec<(String, Option<DateTime<Utc>>)>,
}

impl RunState {
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Self {
        let mut state = Self::default();
        for issue in issues.into_iter().filter(|i| !i.is_pull_request()) {
            match issue.state {
                IssueState::Open => state.open_titles.push(issue.title.clone()),
                _ => state.closed.push((issue.title.clone(), issue.closed_at)),
            }
        }
        state
    }

    /// Fetch every issue of the tracking repository
    pub fn load<T: IssueTracker + ?Sized>(tracker: &T) -> GitHubResult<Self> {
        let issues = tracker.list_issues(IssueState::All)?;
        let state = Self::from_issues(&issues);
        debug!(
            "Run state: {} open, {} closed issues",
            state.open_titles.len(),
            state.closed.len()
        );
        Ok(state)
    }

    /// Is there an open tracking issue for any repository of `owner`?
    pub fn has_open_issue_for_owner(&self, owner: &str) -> bool {
        self.open_titles
            .iter()
            .filter_map(|t| TrackedRepo::from_title(t))
            .any(|t| t.owner.eq_ignore_ascii_case(owner))
    }

    /// Was an issue with exactly this title closed after `cutoff`?
    pub fn closed_since(&self, title: &str, cutoff: DateTime<Utc>) -> bool {
        self.closed
            .iter()
            .any(|(t, closed_at)| t == title && closed_at.is_some_and(|at| at >= cutoff))
    }

    /// Remember an issue opened during this run
    pub fn record(&mut self, title: impl Into<String>) {
        self.open_titles.push(title.into());
    }
}

/// Policy checks run before scanning and before opening an issue
pub struct IssueGate<'a> {
    pub exclusions: &'a ExclusionSet,
    pub suppression_months: u32,
}

impl IssueGate<'_> {
    /// Checks that do not need a checkout
    pub fn before_scan(&self, state: &RunState, owner: &str) -> Option<Skip> {
        if self.exclusions.contains(owner) {
            debug!("{} is excluded", owner);
            return Some(Skip::Excluded);
        }
        if state.has_open_issue_for_owner(owner) {
            info!("{} already has an open issue, skipping", owner);
            return Some(Skip::OpenIssue);
        }
        None
    }

    pub fn before_create(&self, state: &RunState, title: &str, now: DateTime<Utc>) -> Option<Skip> {
        let cutoff = now
            .checked_sub_months(Months::new(self.suppression_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        if state.closed_since(title, cutoff) {
            info!("'{}' was closed in the last {} months, skipping", title, self.suppression_months);
            return Some(Skip::RecentlyClosed);
        }
        None
    }
}

fn overridden(snapshot: &RepoSnapshot, ext: Option<&str>) -> bool {
    snapshot
        .gitattributes
        .as_deref()
        .is_some_and(|attrs| analysis::has_linguist_override(attrs, ext))
}

/// First applicable check for a repository, if any
pub fn select_check(repo: &RepoInfo, snapshot: &RepoSnapshot) -> Option<CheckLabel> {
    let counts = &snapshot.counts;

    if !repo.is_vba() {
        if counts.get(ExtTag::Vb) > 0 && counts.get(ExtTag::Vbproj) == 0 && !overridden(snapshot, Some("vb")) {
            return Some(CheckLabel::A);
        }
        if counts.get(ExtTag::Vbs) > 0 && !overridden(snapshot, Some("vbs")) {
            return Some(CheckLabel::B);
        }
        if counts.get(ExtTag::Txt) > 0 && !overridden(snapshot, Some("txt")) {
            return Some(CheckLabel::D);
        }
        if counts.get(ExtTag::NoExt) > 0 && !overridden(snapshot, None) {
            return Some(CheckLabel::C);
        }
    }

    match analysis::gitattributes_misconfigured(snapshot) {
        Ok(true) => return Some(CheckLabel::E),
        Ok(false) => {}
        Err(_) => {
            if analysis::gitattributes_needed(&snapshot.eol) {
                return Some(CheckLabel::G);
            }
        }
    }

    if !analysis::check_f_files(&snapshot.eol).is_empty() {
        return Some(CheckLabel::F);
    }

    None
}

/// Files listed in the issue body of a line-ending check
fn affected_files(check: CheckLabel, snapshot: &RepoSnapshot) -> Vec<String> {
    match check {
        CheckLabel::E => analysis::lf_working_directory_files(&snapshot.eol),
        CheckLabel::F => analysis::check_f_files(&snapshot.eol),
        CheckLabel::G => analysis::lf_index_files(&snapshot.eol),
        _ => Vec::new(),
    }
}

/// Render the issue for `check` from its template
pub fn draft_issue(
    check: CheckLabel,
    repo: &RepoInfo,
    snapshot: &RepoSnapshot,
    templates: &Templates,
) -> IssueDraft {
    let tracked = TrackedRepo::new(repo.owner.login.as_str(), repo.name.as_str());

    let (count, ext) = match check {
        CheckLabel::A => (snapshot.counts.get(ExtTag::Vb), "vb"),
        CheckLabel::B => (snapshot.counts.get(ExtTag::Vbs), "vbs"),
        CheckLabel::C => (snapshot.counts.get(ExtTag::NoExt), ""),
        CheckLabel::D => (snapshot.counts.get(ExtTag::Txt), "txt"),
        _ => (affected_files(check, snapshot).len(), ""),
    };
    let files = affected_files(check, snapshot);

    let vars = [
        ("user", repo.owner.login.clone()),
        ("reponame", repo.name.clone()),
        ("url", repo.html_url.clone()),
        ("count", count.to_string()),
        ("ext", ext.to_string()),
        ("files", templates::file_list(&files)),
    ];

    IssueDraft {
        check,
        title: tracked.issue_title(check),
        body: templates::render(&templates.load(check), &vars),
        labels: vec![check.label()],
    }
}

/// Scan one search result and open an issue if a check applies
#[allow(clippy::too_many_arguments)]
pub fn scan_repository<T, S>(
    tracker: &T,
    source: &S,
    state: &mut RunState,
    gate: &IssueGate<'_>,
    templates: &Templates,
    repo: &RepoInfo,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<ScanOutcome>
where
    T: IssueTracker + ?Sized,
    S: SnapshotSource + ?Sized,
{
    if let Some(skip) = gate.before_scan(state, &repo.owner.login) {
        return Ok(ScanOutcome::Skipped(skip));
    }

    let snapshot = source.snapshot(repo)?;
    for path in &snapshot.double_lf_headers {
        warn!("{}: {} has a header mangled by LF conversion", repo.full_name, path);
    }
    let Some(check) = select_check(repo, &snapshot) else {
        debug!("{}: nothing to report", repo.full_name);
        return Ok(ScanOutcome::Skipped(Skip::Clean));
    };

    let draft = draft_issue(check, repo, &snapshot, templates);
    if let Some(skip) = gate.before_create(state, &draft.title, now) {
        return Ok(ScanOutcome::Skipped(skip));
    }

    state.record(draft.title.clone());
    if dry_run {
        info!("[dry run] Would open '{}'", draft.title);
        return Ok(ScanOutcome::Drafted(draft));
    }

    let labels: Vec<&str> = draft.labels.iter().map(String::as_str).collect();
    let issue = tracker
        .create_issue(&draft.title, &draft.body, &labels)
        .with_context(|| format!("Failed to open issue for {}", repo.full_name))?;
    Ok(ScanOutcome::Created(issue))
}
