//! Inspect command - run the checks on a local checkout

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::Path;
use vbascout::analysis::{self, inspect_checkout, RepoSnapshot};
use vbascout::engine::select_check;
use vbascout::github::{RepoInfo, User};

#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    path: String,
    language: Option<&'a str>,
    snapshot: &'a RepoSnapshot,
    misconfigured: Option<bool>,
    gitattributes_needed: bool,
    check_f_files: Vec<String>,
    lf_working_directory_files: Vec<String>,
    check: Option<String>,
}

fn local_repo(path: &Path, language: Option<String>) -> RepoInfo {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    RepoInfo {
        name: name.clone(),
        full_name: format!("local/{}", name),
        owner: User {
            login: "local".to_string(),
        },
        html_url: path.display().to_string(),
        language,
        description: None,
        fork: false,
        archived: false,
    }
}

pub fn run(path: &Path, language: Option<String>, json: bool) -> Result<()> {
    let path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    let snapshot = if path.join(".git").exists() {
        inspect_checkout(&path).with_context(|| format!("Failed to inspect {}", path.display()))?
    } else {
        RepoSnapshot::scan_only(&path)
            .with_context(|| format!("Failed to scan {}", path.display()))?
    };

    let repo = local_repo(&path, language);
    let report = InspectReport {
        path: path.display().to_string(),
        language: repo.language.as_deref(),
        snapshot: &snapshot,
        misconfigured: analysis::gitattributes_misconfigured(&snapshot).ok(),
        gitattributes_needed: !snapshot.has_gitattributes()
            && analysis::gitattributes_needed(&snapshot.eol),
        check_f_files: analysis::check_f_files(&snapshot.eol),
        lf_working_directory_files: analysis::lf_working_directory_files(&snapshot.eol),
        check: select_check(&repo, &snapshot).map(|c| c.label()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &InspectReport<'_>) {
    let snapshot = report.snapshot;

    println!("\n{}", style("vbascout inspect").bold());
    println!("  Path: {}", style(&report.path).cyan());
    if let Some(language) = report.language {
        println!("  Language: {}", style(language).cyan());
    }

    println!("\n  {}", style("Files").bold());
    let mut any = false;
    for (tag, count) in snapshot.counts.non_zero() {
        any = true;
        println!("    {:<8} {}", tag.as_str(), style(count).cyan());
    }
    if !any {
        println!("    {}", style("no VBA-related files").dim());
    }

    println!("\n  {}", style(".gitattributes").bold());
    match report.misconfigured {
        Some(true) => println!("    {} checks .frm/.cls out with LF", style("[!!]").red()),
        Some(false) => println!("    {} present, line endings OK", style("[OK]").green()),
        None if report.gitattributes_needed => println!(
            "    {} missing, and .frm/.cls files are committed with LF",
            style("[!!]").red()
        ),
        None => println!("    {} not present", style("[--]").dim()),
    }

    print_files("Committed with LF and marked -text", &report.check_f_files);
    print_files("Checked out with LF", &report.lf_working_directory_files);
    print_files("Header mangled by LF conversion", &snapshot.double_lf_headers);

    match &report.check {
        Some(check) => println!("\n  Would open: {}", style(check).yellow().bold()),
        None => println!("\n  {} Nothing to report", style("[OK]").green()),
    }
}

fn print_files(heading: &str, files: &[String]) {
    if files.is_empty() {
        return;
    }
    println!("\n  {} ({})", style(heading).bold(), files.len());
    for file in files {
        println!("    {}", file);
    }
}
