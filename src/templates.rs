//! Issue body templates
//!
//! One Markdown template per check, with `%{key}%` placeholders. Templates
//! are compiled into the binary; a `templates_dir` from the config can
//! override them file by file (`check_a.md` ... `check_g.md`).

use crate::models::CheckLabel;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CHECK_A: &str = include_str!("../templates/check_a.md");
const CHECK_B: &str = include_str!("../templates/check_b.md");
const CHECK_C: &str = include_str!("../templates/check_c.md");
const CHECK_D: &str = include_str!("../templates/check_d.md");
const CHECK_E: &str = include_str!("../templates/check_e.md");
const CHECK_F: &str = include_str!("../templates/check_f.md");
const CHECK_G: &str = include_str!("../templates/check_g.md");

/// Built-in template for a check
pub fn builtin(check: CheckLabel) -> &'static str {
    match check {
        CheckLabel::A => CHECK_A,
        CheckLabel::B => CHECK_B,
        CheckLabel::C => CHECK_C,
        CheckLabel::D => CHECK_D,
        CheckLabel::E => CHECK_E,
        CheckLabel::F => CHECK_F,
        CheckLabel::G => CHECK_G,
    }
}

/// File name of a check's template (`check_a.md`)
pub fn file_name(check: CheckLabel) -> String {
    format!("check_{}.md", check.letter().to_ascii_lowercase())
}

/// Template lookup: override directory first, built-ins otherwise
#[derive(Debug, Clone, Default)]
pub struct Templates {
    dir: Option<PathBuf>,
}

impl Templates {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn load(&self, check: CheckLabel) -> String {
        if let Some(dir) = &self.dir {
            let path = dir.join(file_name(check));
            if path.is_file() {
                match std::fs::read_to_string(&path) {
                    Ok(text) => {
                        debug!("Using template {}", path.display());
                        return text;
                    }
                    Err(e) => warn!("Failed to read {}: {}; using built-in", path.display(), e),
                }
            }
        }
        builtin(check).to_string()
    }
}

/// Replace every `%{key}%` with its value. Unknown placeholders are kept.
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("%{{{}}}%", key), value);
    }
    out
}

/// Escape the two characters that break file names in Markdown
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '`' || c == '_' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `- path` bullet list, escaped
pub fn file_list(files: &[String]) -> String {
    files
        .iter()
        .map(|f| format!("- {}", escape_markdown(f)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_placeholders() {
        let out = render(
            "Hi @%{user}%, see %{url}% (%{reponame}%) %{missing}%",
            &[
                ("user", "octo".into()),
                ("reponame", "macros".into()),
                ("url", "https://github.com/octo/macros".into()),
            ],
        );
        assert_eq!(
            out,
            "Hi @octo, see https://github.com/octo/macros (macros) %{missing}%"
        );
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("my_module`s.cls"), "my\\_module\\`s.cls");
        assert_eq!(escape_markdown("Plain.frm"), "Plain.frm");
    }

    #[test]
    fn test_file_list() {
        let files = vec!["src/Form_1.frm".to_string(), "Class1.cls".to_string()];
        assert_eq!(file_list(&files), "- src/Form\\_1.frm\n- Class1.cls");
        assert_eq!(file_list(&[]), "");
    }

    #[test]
    fn test_every_builtin_names_the_user() {
        for check in CheckLabel::ALL {
            assert!(builtin(check).contains("%{user}%"), "{}", check);
            assert!(builtin(check).contains("%{url}%"), "{}", check);
        }
    }

    #[test]
    fn test_directory_override() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("check_b.md"), "custom %{user}%").unwrap();

        let templates = Templates::new(Some(dir.path().to_path_buf()));
        assert_eq!(templates.load(CheckLabel::B), "custom %{user}%");
        assert_eq!(templates.load(CheckLabel::A), builtin(CheckLabel::A));
    }
}
