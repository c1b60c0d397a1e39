//! Follow-up command - re-check open tracking issues

use anyhow::{Context, Result};
use console::style;
use tracing::info;
use vbascout::config::BotConfig;
use vbascout::engine::{self, CheckoutSource};
use vbascout::exclusion::ExclusionSet;
use vbascout::github::{GitHubClient, IssueState, IssueTracker};

pub fn run(config: &BotConfig, limit: Option<usize>) -> Result<()> {
    let client = GitHubClient::from_env()?;

    let exclusions = ExclusionSet::load(&config.paths.exclusion_file).with_context(|| {
        format!(
            "Failed to read exclusion list {}",
            config.paths.exclusion_file.display()
        )
    })?;

    let issues = client
        .list_issues(IssueState::Open)
        .with_context(|| format!("Failed to fetch open issues of {}", client.repo_slug()))?;
    info!("{} open issues in {}", issues.len(), client.repo_slug());

    let source = CheckoutSource::new(&config.paths.scratch_dir);
    let stats = engine::follow_up_issues(&client, &source, &exclusions, &issues, limit);

    println!(
        "\n{} Examined {} tracking issue{}",
        style("[OK]").green(),
        style(stats.examined).cyan(),
        if stats.examined == 1 { "" } else { "s" }
    );
    println!("  Updated: {}", style(stats.updated).cyan());
    println!("  Closed:  {}", style(stats.closed).cyan());
    println!("  Deleted: {}", style(stats.deleted).cyan());
    if stats.excluded > 0 {
        println!("  Opted out: {}", style(stats.excluded).yellow());
    }
    if stats.failed > 0 {
        println!("  Failed:  {}", style(stats.failed).red());
    }

    Ok(())
}
