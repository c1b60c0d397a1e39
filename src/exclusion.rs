//! Opt-out list of GitHub users
//!
//! Users who reply "stop" on their own tracking issue are never flagged
//! again. The list stores the SHA-256 hash of the username exactly as
//! GitHub spells it, one lowercase hex digest per line, so the file can be
//! committed publicly.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lowercase hex SHA-256 of a username (unsalted)
pub fn hash_username(username: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Does this comment ask the bot to stop?
pub fn is_stop_request(body: &str) -> bool {
    body.trim().to_lowercase().starts_with("stop")
}

/// Hashes of excluded users, backed by a newline-delimited file
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    path: Option<PathBuf>,
    hashes: HashSet<String>,
}

impl ExclusionSet {
    /// Load the list; a missing file is an empty list
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let hashes = match std::fs::read_to_string(path) {
            Ok(text) => text
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No exclusion file at {}", path.display());
                HashSet::new()
            }
            Err(e) => return Err(e),
        };
        debug!("Loaded {} excluded users", hashes.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            hashes,
        })
    }

    /// In-memory set, not persisted
    pub fn from_usernames<'a>(usernames: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            path: None,
            hashes: usernames.into_iter().map(hash_username).collect(),
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.hashes.contains(&hash_username(username))
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Add a user and append the hash to the backing file.
    ///
    /// Returns `false` when the user was already excluded.
    pub fn add(&mut self, username: &str) -> std::io::Result<bool> {
        let hash = hash_username(username);
        if self.hashes.contains(&hash) {
            return Ok(false);
        }

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let needs_newline = std::fs::read(path)
                .map(|bytes| bytes.last().is_some_and(|b| *b != b'\n'))
                .unwrap_or(false);
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            if needs_newline {
                writeln!(file)?;
            }
            writeln!(file, "{}", hash)?;
            info!("Added {} to {}", username, path.display());
        }

        self.hashes.insert(hash);
        Ok(true)
    }
}
