//! File classification scanner
//!
//! Walks a checkout (skipping `.git`, never following symlinks) and counts
//! files per [`ExtTag`]. Ambiguous extensions only count when their content
//! backs them up:
//!
//! - `.txt`, `.vbs` and extension-less files must contain VBA procedures
//! - Office containers (`.xlsm`, `.docm`, ...) must be binary
//! - everything else counts on the suffix alone

pub mod content;

use crate::models::{ExtTag, FileCounts};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Counts plus the exported modules whose header was mangled by LF conversion
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub counts: FileCounts,
    /// Repository-relative `.frm`/`.cls` paths with a double-LF `VERSION` header
    pub double_lf_headers: Vec<String>,
}

/// Tags a file name can belong to, before any content check.
///
/// A name can match several suffix tags (`x.d.vb` is both `.d.vb` and `.vb`).
pub fn candidate_tags(file_name: &str) -> Vec<ExtTag> {
    if !file_name.contains('.') {
        return vec![ExtTag::NoExt];
    }
    let lower = file_name.to_ascii_lowercase();
    ExtTag::ALL
        .iter()
        .copied()
        .filter(|t| *t != ExtTag::NoExt && lower.ends_with(t.as_str()))
        .collect()
}

/// Scan a checkout and return per-extension counts
pub fn count_vba_related_files(root: &Path) -> FileCounts {
    scan(root).counts
}

/// Scan a checkout, collecting counts and header corruption
pub fn scan(root: &Path) -> ScanReport {
    let mut counts: BTreeMap<ExtTag, usize> = BTreeMap::new();
    let mut double_lf_headers = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let tags = candidate_tags(&file_name);
        if tags.is_empty() {
            continue;
        }

        let path = entry.path();
        for tag in classify(path, &tags) {
            *counts.entry(tag).or_insert(0) += 1;
        }

        if tags.iter().any(|t| matches!(t, ExtTag::Frm | ExtTag::Cls)) {
            if let Ok(bytes) = std::fs::read(path) {
                if content::has_double_lf_header(&bytes) {
                    double_lf_headers.push(relative(root, path));
                }
            }
        }
    }

    let counts = FileCounts::from_map(counts);
    for (tag, count) in counts.non_zero() {
        info!("Number of '{}' files: {}", tag, count);
    }
    for path in &double_lf_headers {
        warn!("{} has a double LF header", path);
    }

    ScanReport {
        counts,
        double_lf_headers,
    }
}

/// Keep the candidate tags whose content checks pass
fn classify(path: &Path, tags: &[ExtTag]) -> Vec<ExtTag> {
    let needs_content = tags
        .iter()
        .any(|t| t.needs_vba_content() || t.is_office_document());
    if !needs_content {
        return tags.to_vec();
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            return tags
                .iter()
                .copied()
                .filter(|t| !t.needs_vba_content() && !t.is_office_document())
                .collect();
        }
    };

    tags.iter()
        .copied()
        .filter(|t| {
            if t.needs_vba_content() {
                content::contains_vba_code(&bytes)
            } else if t.is_office_document() {
                content::is_binary(&bytes)
            } else {
                true
            }
        })
        .collect()
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests;
