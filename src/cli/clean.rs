//! Clean command - remove leftover checkouts from the scratch folder

use anyhow::Result;
use std::path::Path;
use vbascout::git::checkout::SEPARATOR;
use walkdir::WalkDir;

pub fn run(scratch_dir: &Path, dry_run: bool) -> Result<()> {
    if !scratch_dir.is_dir() {
        println!("No scratch folder at {}.", scratch_dir.display());
        return Ok(());
    }

    let mut found = Vec::new();

    // Checkouts are the direct children named "<owner> --- <repo>"
    for entry in WalkDir::new(scratch_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() && entry.file_name().to_string_lossy().contains(SEPARATOR) {
            found.push(entry.path().to_path_buf());
        }
    }

    if found.is_empty() {
        println!("No checkouts found in {}.", scratch_dir.display());
        return Ok(());
    }

    println!(
        "Found {} checkout{}:",
        found.len(),
        if found.len() == 1 { "" } else { "s" }
    );

    for dir in &found {
        println!("  {}", dir.display());
    }

    if dry_run {
        println!("\nDry run - nothing removed. Run without --dry-run to delete.");
        return Ok(());
    }

    println!();
    let mut removed = 0;
    for dir in &found {
        match std::fs::remove_dir_all(dir) {
            Ok(_) => {
                removed += 1;
                println!("Removed: {}", dir.display());
            }
            Err(e) => eprintln!("Failed to remove {}: {}", dir.display(), e),
        }
    }

    println!(
        "\nCleaned {} checkout{}.",
        removed,
        if removed == 1 { "" } else { "s" }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_removes_only_checkouts() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("octo --- macros/.git")).unwrap();
        std::fs::create_dir(dir.path().join("notes")).unwrap();

        run(dir.path(), true).unwrap();
        assert!(dir.path().join("octo --- macros").exists());

        run(dir.path(), false).unwrap();
        assert!(!dir.path().join("octo --- macros").exists());
        assert!(dir.path().join("notes").exists());
    }

    #[test]
    fn test_missing_scratch_dir() {
        let dir = tempdir().unwrap();
        assert!(run(&dir.path().join("repos"), false).is_ok());
    }
}
