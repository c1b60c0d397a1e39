use super::*;
use crate::git::parse_ls_files_eol;
use std::collections::BTreeMap;

fn counts(frm: usize, cls: usize) -> FileCounts {
    FileCounts::from_map(BTreeMap::from([(ExtTag::Frm, frm), (ExtTag::Cls, cls)]))
}

fn attrs(text: &str, eol: &str) -> AttrResolution {
    AttrResolution {
        frm_eol: eol.to_string(),
        frm_text: text.to_string(),
        cls_eol: eol.to_string(),
        cls_text: text.to_string(),
    }
}

#[test]
fn test_misconfigured_when_auto_and_lf() {
    assert!(is_misconfigured(&counts(2, 0), &attrs("auto", "lf")));
}

#[test]
fn test_misconfiguration_is_count_gated() {
    assert!(!is_misconfigured(&counts(0, 0), &attrs("auto", "lf")));
}

#[test]
fn test_crlf_or_unset_text_is_fine() {
    assert!(!is_misconfigured(&counts(2, 2), &attrs("auto", "crlf")));
    assert!(!is_misconfigured(&counts(2, 2), &attrs("unset", "lf")));
    assert!(!is_misconfigured(&counts(2, 2), &attrs("unspecified", "unspecified")));
    assert!(is_misconfigured(&counts(0, 1), &attrs("set", "unspecified")));
}

#[test]
fn test_per_extension_rules() {
    let mixed = AttrResolution {
        frm_eol: "crlf".into(),
        frm_text: "set".into(),
        cls_eol: "lf".into(),
        cls_text: "auto".into(),
    };
    assert!(!is_misconfigured(&counts(3, 0), &mixed));
    assert!(is_misconfigured(&counts(3, 1), &mixed));
}

#[test]
fn test_snapshot_without_gitattributes_is_an_error() {
    let snapshot = RepoSnapshot {
        counts: counts(1, 1),
        attrs: Some(attrs("auto", "lf")),
        ..Default::default()
    };
    assert!(matches!(
        gitattributes_misconfigured(&snapshot),
        Err(AnalysisError::MissingGitattributes)
    ));

    let with_file = RepoSnapshot {
        gitattributes: Some("* text=auto\n".into()),
        ..snapshot
    };
    assert!(gitattributes_misconfigured(&with_file).unwrap());
}

#[test]
fn test_benign_files() {
    assert!(is_benign("ThisWorkbook.cls"));
    assert!(is_benign("src/Sheet1.cls"));
    assert!(is_benign("Sheet42.cls"));
    assert!(!is_benign("Sheet.cls"));
    assert!(!is_benign("MySheet1.cls"));
    assert!(!is_benign("Class1.cls"));
}

#[test]
fn test_benign_files_excluded_from_check_f_and_g() {
    let eol = parse_ls_files_eol([
        "i/lf    w/lf    attr/-text             \tThisWorkbook.cls",
        "i/lf    w/lf    attr/-text             \tsrc/Sheet3.cls",
        "i/lf    w/lf    attr/-text             \tsrc/Sheet12.cls",
    ]);
    assert!(check_f_files(&eol).is_empty());
    assert!(!gitattributes_needed(&eol));
}

#[test]
fn test_check_f_files() {
    let eol = parse_ls_files_eol([
        "i/lf    w/lf    attr/-text             \tsrc/Class1.cls",
        "i/crlf  w/crlf  attr/-text             \tsrc/Class2.cls",
        "i/lf    w/crlf  attr/text eol=crlf     \tsrc/UserForm1.frm",
        "i/lf    w/lf    attr/-text             \tsrc/Module1.bas",
    ]);
    assert_eq!(check_f_files(&eol), vec!["src/Class1.cls".to_string()]);
}

#[test]
fn test_gitattributes_needed_uses_index() {
    let eol = parse_ls_files_eol(["i/lf    w/crlf  attr/                 \tUserForm1.frm"]);
    assert!(gitattributes_needed(&eol));

    let eol = parse_ls_files_eol(["i/crlf  w/crlf  attr/                 \tUserForm1.frm"]);
    assert!(!gitattributes_needed(&eol));
}

#[test]
fn test_lf_working_directory_files() {
    let eol = parse_ls_files_eol([
        "i/lf    w/lf    attr/text=auto         \tClass1.cls",
        "i/lf    w/crlf  attr/text eol=crlf     \tForm1.frm",
    ]);
    assert_eq!(lf_working_directory_files(&eol), vec!["Class1.cls".to_string()]);
}

#[test]
fn test_linguist_override() {
    let attrs = "# VBA\n*.vb linguist-language=VBA\n**/*.txt text linguist-language=VBA\n";
    assert!(has_linguist_override(attrs, Some("vb")));
    assert!(has_linguist_override(attrs, Some("txt")));
    assert!(!has_linguist_override(attrs, Some("vbs")));
    assert!(!has_linguist_override(attrs, None));

    assert!(has_linguist_override("src/* linguist-language=VBA", None));
    assert!(!has_linguist_override("*.vb linguist-detectable", Some("vb")));
    assert!(!has_linguist_override("# *.vb linguist-language=VBA", Some("vb")));
}
