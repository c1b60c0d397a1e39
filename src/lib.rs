//! vbascout - finds mis-tagged VBA code on GitHub
//!
//! Scans repositories for VBA saved under extensions GitHub's language
//! detection does not recognise as VBA, and for `.gitattributes` setups
//! that check `.frm`/`.cls` modules out with LF line endings. Findings
//! become tracking issues that the bot follows up on.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod exclusion;
pub mod git;
pub mod github;
pub mod models;
pub mod scanner;
pub mod templates;
