//! Core data models for vbascout
//!
//! These models are shared by the scanner, the line-ending analysis and the
//! decision engine: extension counts, per-file line-ending records, check
//! labels and the tracking-repository coordinates parsed from issue titles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Extension tags counted by the scanner.
///
/// The set is closed; every tag is always present in a [`FileCounts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExtTag {
    #[serde(rename = ".bas")]
    Bas,
    #[serde(rename = ".cls")]
    Cls,
    #[serde(rename = ".frm")]
    Frm,
    #[serde(rename = ".vba")]
    Vba,
    #[serde(rename = ".vbs")]
    Vbs,
    #[serde(rename = ".vb")]
    Vb,
    #[serde(rename = ".d.vb")]
    DVb,
    #[serde(rename = ".vbproj")]
    Vbproj,
    #[serde(rename = ".txt")]
    Txt,
    #[serde(rename = "No ext")]
    NoExt,
    #[serde(rename = ".docm")]
    Docm,
    #[serde(rename = ".dotm")]
    Dotm,
    #[serde(rename = ".xlsm")]
    Xlsm,
    #[serde(rename = ".xltm")]
    Xltm,
    #[serde(rename = ".xlsb")]
    Xlsb,
    #[serde(rename = ".xlam")]
    Xlam,
    #[serde(rename = ".pptm")]
    Pptm,
    #[serde(rename = ".ppam")]
    Ppam,
    #[serde(rename = ".potm")]
    Potm,
}

impl ExtTag {
    pub const ALL: [ExtTag; 19] = [
        ExtTag::Bas,
        ExtTag::Cls,
        ExtTag::Frm,
        ExtTag::Vba,
        ExtTag::Vbs,
        ExtTag::Vb,
        ExtTag::DVb,
        ExtTag::Vbproj,
        ExtTag::Txt,
        ExtTag::NoExt,
        ExtTag::Docm,
        ExtTag::Dotm,
        ExtTag::Xlsm,
        ExtTag::Xltm,
        ExtTag::Xlsb,
        ExtTag::Xlam,
        ExtTag::Pptm,
        ExtTag::Ppam,
        ExtTag::Potm,
    ];

    /// Tag as written in logs and issue bodies (`.bas`, `No ext`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtTag::Bas => ".bas",
            ExtTag::Cls => ".cls",
            ExtTag::Frm => ".frm",
            ExtTag::Vba => ".vba",
            ExtTag::Vbs => ".vbs",
            ExtTag::Vb => ".vb",
            ExtTag::DVb => ".d.vb",
            ExtTag::Vbproj => ".vbproj",
            ExtTag::Txt => ".txt",
            ExtTag::NoExt => "No ext",
            ExtTag::Docm => ".docm",
            ExtTag::Dotm => ".dotm",
            ExtTag::Xlsm => ".xlsm",
            ExtTag::Xltm => ".xltm",
            ExtTag::Xlsb => ".xlsb",
            ExtTag::Xlam => ".xlam",
            ExtTag::Pptm => ".pptm",
            ExtTag::Ppam => ".ppam",
            ExtTag::Potm => ".potm",
        }
    }

    /// Office container formats that can embed a VBA project
    pub fn is_office_document(&self) -> bool {
        matches!(
            self,
            ExtTag::Docm
                | ExtTag::Dotm
                | ExtTag::Xlsm
                | ExtTag::Xltm
                | ExtTag::Xlsb
                | ExtTag::Xlam
                | ExtTag::Pptm
                | ExtTag::Ppam
                | ExtTag::Potm
        )
    }

    /// Extensions too ambiguous to count without sniffing the content
    pub fn needs_vba_content(&self) -> bool {
        matches!(self, ExtTag::Txt | ExtTag::Vbs | ExtTag::NoExt)
    }
}

impl fmt::Display for ExtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-extension file counts for one repository snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts(BTreeMap<ExtTag, usize>);

impl FileCounts {
    /// Build counts from a partial map; missing tags count as zero.
    pub fn from_map(map: BTreeMap<ExtTag, usize>) -> Self {
        let mut full: BTreeMap<ExtTag, usize> = ExtTag::ALL.iter().map(|t| (*t, 0)).collect();
        full.extend(map);
        Self(full)
    }

    pub fn get(&self, tag: ExtTag) -> usize {
        self.0.get(&tag).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExtTag, usize)> + '_ {
        self.0.iter().map(|(t, c)| (*t, *c))
    }

    /// Tags with a non-zero count, for human-readable output
    pub fn non_zero(&self) -> impl Iterator<Item = (ExtTag, usize)> + '_ {
        self.iter().filter(|(_, c)| *c > 0)
    }
}

impl Default for FileCounts {
    fn default() -> Self {
        Self::from_map(BTreeMap::new())
    }
}

/// Line-ending state of one tracked file, as reported by `git ls-files --eol`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EolRecord {
    /// Line endings in the index (`lf`, `crlf`, `mixed`, `none`, `-text`)
    pub index: String,
    /// Line endings in the working tree
    pub working_directory: String,
    /// `text` attribute (`text`, `-text`, `text=auto`, empty when unspecified)
    pub attribute_text: String,
    /// `eol` attribute token (`eol=crlf`) or `unspecified`
    pub attribute_eol: String,
}

/// Resolved state of the `text` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAttr {
    Set,
    Unset,
    Auto,
    Unspecified,
    Other(String),
}

impl EolRecord {
    pub fn text_attr(&self) -> TextAttr {
        match self.attribute_text.as_str() {
            "text" => TextAttr::Set,
            "-text" => TextAttr::Unset,
            "text=auto" => TextAttr::Auto,
            "" | "unspecified" => TextAttr::Unspecified,
            other => TextAttr::Other(other.to_string()),
        }
    }

    pub fn index_is_lf(&self) -> bool {
        self.index == "lf"
    }

    pub fn working_directory_is_lf(&self) -> bool {
        self.working_directory == "lf"
    }
}

/// Per-file line-ending records keyed by repository-relative path
pub type EolIndex = BTreeMap<String, EolRecord>;

/// The fixed set of checks a tracking issue can be labeled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckLabel {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl CheckLabel {
    pub const ALL: [CheckLabel; 7] = [
        CheckLabel::A,
        CheckLabel::B,
        CheckLabel::C,
        CheckLabel::D,
        CheckLabel::E,
        CheckLabel::F,
        CheckLabel::G,
    ];

    pub fn letter(&self) -> char {
        match self {
            CheckLabel::A => 'A',
            CheckLabel::B => 'B',
            CheckLabel::C => 'C',
            CheckLabel::D => 'D',
            CheckLabel::E => 'E',
            CheckLabel::F => 'F',
            CheckLabel::G => 'G',
        }
    }

    /// GitHub label name (`Check A`)
    pub fn label(&self) -> String {
        format!("Check {}", self.letter())
    }

    /// Parse a GitHub label name such as `Check D`
    pub fn from_label(name: &str) -> Option<Self> {
        let letter = name.strip_prefix("Check ")?.trim();
        CheckLabel::ALL
            .into_iter()
            .find(|c| letter.len() == 1 && letter.starts_with(c.letter()))
    }

    /// Short issue title summary for a newly flagged repository
    pub fn summary(&self) -> &'static str {
        match self {
            CheckLabel::A => "VBA code saved with the .vb extension",
            CheckLabel::B => "VBA code saved with the .vbs extension",
            CheckLabel::C => "VBA code saved in files without an extension",
            CheckLabel::D => "VBA code saved with the .txt extension",
            CheckLabel::E => ".gitattributes checks out .frm/.cls files with LF line endings",
            CheckLabel::F => ".frm/.cls files committed with LF and marked -text",
            CheckLabel::G => ".frm/.cls files committed with LF and no .gitattributes file",
        }
    }
}

impl fmt::Display for CheckLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Check {}", self.letter())
    }
}

/// Repository coordinates encoded in a tracking issue title
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedRepo {
    pub owner: String,
    pub repo: String,
}

impl TrackedRepo {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse `[owner/repo] summary`
    pub fn from_title(title: &str) -> Option<Self> {
        let inner = title.trim_start().strip_prefix('[')?;
        let (slug, _) = inner.split_once(']')?;
        let (owner, repo) = slug.split_once('/')?;
        let (owner, repo) = (owner.trim(), repo.trim());
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self::new(owner, repo))
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    /// Title of the tracking issue for this repository and check
    pub fn issue_title(&self, check: CheckLabel) -> String {
        format!("[{}] {}", self.slug(), check.summary())
    }
}

impl fmt::Display for TrackedRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_counts_default_has_every_tag() {
        let counts = FileCounts::default();
        assert_eq!(counts.iter().count(), ExtTag::ALL.len());
        assert_eq!(counts.non_zero().count(), 0);
    }

    #[test]
    fn test_file_counts_from_partial_map() {
        let counts = FileCounts::from_map(BTreeMap::from([(ExtTag::Frm, 2), (ExtTag::NoExt, 1)]));
        assert_eq!(counts.get(ExtTag::Frm), 2);
        assert_eq!(counts.get(ExtTag::NoExt), 1);
        assert_eq!(counts.get(ExtTag::Cls), 0);
        assert_eq!(counts.non_zero().count(), 2);
    }

    #[test]
    fn test_check_label_round_trip() {
        for check in CheckLabel::ALL {
            assert_eq!(CheckLabel::from_label(&check.label()), Some(check));
        }
        assert_eq!(CheckLabel::from_label("Check"), None);
        assert_eq!(CheckLabel::from_label("Check AB"), None);
        assert_eq!(CheckLabel::from_label("completed"), None);
    }

    #[test]
    fn test_tracked_repo_from_title() {
        let repo = TrackedRepo::from_title("[octo/macros] VBA code saved with the .vb extension")
            .unwrap();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.repo, "macros");
        assert_eq!(repo.html_url(), "https://github.com/octo/macros");

        assert!(TrackedRepo::from_title("no brackets here").is_none());
        assert!(TrackedRepo::from_title("[missing-slash] title").is_none());
    }

    #[test]
    fn test_issue_title_round_trips_through_parser() {
        let repo = TrackedRepo::new("someone", "excel-tools");
        let title = repo.issue_title(CheckLabel::E);
        assert!(title.starts_with("[someone/excel-tools] "));
        assert_eq!(TrackedRepo::from_title(&title), Some(repo));
    }

    #[test]
    fn test_text_attr_states() {
        let mut record = EolRecord {
            index: "lf".into(),
            working_directory: "crlf".into(),
            attribute_text: "-text".into(),
            attribute_eol: "unspecified".into(),
        };
        assert_eq!(record.text_attr(), TextAttr::Unset);
        record.attribute_text = "text=auto".into();
        assert_eq!(record.text_attr(), TextAttr::Auto);
        record.attribute_text = String::new();
        assert_eq!(record.text_attr(), TextAttr::Unspecified);
        assert!(record.index_is_lf());
        assert!(!record.working_directory_is_lf());
    }
}
