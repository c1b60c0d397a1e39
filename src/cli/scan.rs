//! Scan command - search GitHub and open tracking issues

use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use std::thread;
use tracing::{error, info};
use vbascout::config::BotConfig;
use vbascout::engine::{self, CheckoutSource, IssueGate, RunState, ScanOutcome};
use vbascout::exclusion::ExclusionSet;
use vbascout::github::{GitHubClient, IssueTracker};
use vbascout::templates::Templates;

#[derive(Debug, Default)]
struct ScanSummary {
    scanned: usize,
    opened: usize,
    skipped: usize,
    failed: usize,
}

pub fn run(config: &BotConfig, query: Option<String>, pages: Option<u32>, dry_run: bool) -> Result<()> {
    let client = GitHubClient::from_env()?;

    let exclusions = ExclusionSet::load(&config.paths.exclusion_file).with_context(|| {
        format!(
            "Failed to read exclusion list {}",
            config.paths.exclusion_file.display()
        )
    })?;
    let mut state = RunState::load(&client)
        .with_context(|| format!("Failed to fetch issues of {}", client.repo_slug()))?;

    let gate = IssueGate {
        exclusions: &exclusions,
        suppression_months: config.issues.suppression_months,
    };
    let templates = Templates::new(config.paths.templates_dir.clone());
    let source = CheckoutSource::new(&config.paths.scratch_dir);

    let query = query.unwrap_or_else(|| config.search.query.clone());
    let pages = pages.unwrap_or(config.search.pages);
    let mut summary = ScanSummary::default();

    for page in 1..=pages {
        if page > 1 {
            thread::sleep(config.search.page_delay());
        }

        let repos = match client.search_repositories(
            &query,
            &config.search.sort,
            page,
            config.search.per_page,
        ) {
            Ok(repos) => repos,
            Err(e) => {
                error!("Search page {} failed: {}", page, e);
                break;
            }
        };
        info!("Search page {}: {} repositories", page, repos.len());
        if repos.is_empty() {
            break;
        }

        for repo in &repos {
            summary.scanned += 1;
            match engine::scan_repository(
                &client,
                &source,
                &mut state,
                &gate,
                &templates,
                repo,
                Utc::now(),
                dry_run,
            ) {
                Ok(ScanOutcome::Created(issue)) => {
                    summary.opened += 1;
                    println!(
                        "{} #{} {}",
                        style("[NEW]").green(),
                        issue.number,
                        issue.title
                    );
                }
                Ok(ScanOutcome::Drafted(draft)) => {
                    summary.opened += 1;
                    println!(
                        "{} {} ({})",
                        style("[DRY]").yellow(),
                        draft.title,
                        draft.check
                    );
                }
                Ok(ScanOutcome::Skipped(skip)) => {
                    summary.skipped += 1;
                    info!("{}: skipped ({:?})", repo.full_name, skip);
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("{}: {:#}", repo.full_name, e);
                }
            }
        }
    }

    println!(
        "\nScanned {} repositor{}: {} {}, {} skipped{}",
        style(summary.scanned).cyan(),
        if summary.scanned == 1 { "y" } else { "ies" },
        style(summary.opened).cyan(),
        if dry_run { "would be opened" } else { "opened" },
        summary.skipped,
        if summary.failed > 0 {
            format!(", {} failed", style(summary.failed).red())
        } else {
            String::new()
        }
    );

    Ok(())
}
