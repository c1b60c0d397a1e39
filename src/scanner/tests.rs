use super::*;
use std::fs;

const VBA_MODULE: &str = "Attribute VB_Name = \"Module1\"\r\nPublic Sub Foo()\r\n    MsgBox \"hi\"\r\nEnd Sub\r\n";

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_candidate_tags() {
    assert_eq!(candidate_tags("Module1.bas"), vec![ExtTag::Bas]);
    assert_eq!(candidate_tags("FORM1.FRM"), vec![ExtTag::Frm]);
    assert_eq!(candidate_tags("Module1"), vec![ExtTag::NoExt]);
    assert_eq!(candidate_tags("types.d.vb"), vec![ExtTag::Vb, ExtTag::DVb]);
    assert_eq!(candidate_tags("App.vbproj"), vec![ExtTag::Vbproj]);
    assert!(candidate_tags(".gitattributes").is_empty());
    assert!(candidate_tags("main.rs").is_empty());
}

#[test]
fn test_txt_counts_only_with_vba_code() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "code.txt", b"Public Sub Foo()\n    x = 1\nEnd Sub\n");
    write(dir.path(), "notes.txt", b"Remember to export the modules before committing.\n");

    let counts = count_vba_related_files(dir.path());
    assert_eq!(counts.get(ExtTag::Txt), 1);
}

#[test]
fn test_prose_txt_is_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "README.txt", b"Just some prose about spreadsheets.\n");

    let counts = count_vba_related_files(dir.path());
    assert_eq!(counts.get(ExtTag::Txt), 0);
}

#[test]
fn test_no_extension_and_vbs_need_vba_code() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/Module1", VBA_MODULE.as_bytes());
    write(dir.path(), "LICENSE", b"MIT License\n");
    write(dir.path(), "macro.vbs", VBA_MODULE.as_bytes());
    write(dir.path(), "install.vbs", b"WScript.Echo \"Installing\"\n");

    let counts = count_vba_related_files(dir.path());
    assert_eq!(counts.get(ExtTag::NoExt), 1);
    assert_eq!(counts.get(ExtTag::Vbs), 1);
}

#[test]
fn test_suffix_only_tags() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Module1.bas", b"");
    write(dir.path(), "Class1.cls", b"");
    write(dir.path(), "forms/UserForm1.frm", b"");
    write(dir.path(), "Helpers.vb", b"");
    write(dir.path(), "Types.d.vb", b"");

    let counts = count_vba_related_files(dir.path());
    assert_eq!(counts.get(ExtTag::Bas), 1);
    assert_eq!(counts.get(ExtTag::Cls), 1);
    assert_eq!(counts.get(ExtTag::Frm), 1);
    assert_eq!(counts.get(ExtTag::Vb), 2);
    assert_eq!(counts.get(ExtTag::DVb), 1);
}

#[test]
fn test_office_documents_must_be_binary() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Book1.xlsm", b"PK\x03\x04\x14\x00\x06\x00\x08\x00\x00\x00");
    write(dir.path(), "fake.xlsm", b"version https://git-lfs.github.com/spec/v1\n");

    let counts = count_vba_related_files(dir.path());
    assert_eq!(counts.get(ExtTag::Xlsm), 1);
}

#[test]
fn test_git_directory_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".git/objects/Module1.bas", b"");
    write(dir.path(), ".git/HEAD", VBA_MODULE.as_bytes());
    write(dir.path(), "Module2.bas", b"");

    let counts = count_vba_related_files(dir.path());
    assert_eq!(counts.get(ExtTag::Bas), 1);
    assert_eq!(counts.get(ExtTag::NoExt), 0);
}

#[test]
fn test_scan_reports_double_lf_headers() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/Broken.cls", b"VERSION 1.0 CLASS\n\nBEGIN\n  MultiUse = -1\nEND\n");
    write(dir.path(), "src/Fine.cls", b"VERSION 1.0 CLASS\r\nBEGIN\r\n  MultiUse = -1\r\nEND\r\n");

    let report = scan(dir.path());
    assert_eq!(report.counts.get(ExtTag::Cls), 2);
    assert_eq!(report.double_lf_headers, vec!["src/Broken.cls".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "real/Module1.bas", VBA_MODULE.as_bytes());
    symlink(dir.path().join("real/Module1.bas"), dir.path().join("Alias.bas")).unwrap();
    symlink(dir.path().join("real"), dir.path().join("mirror")).unwrap();

    let counts = count_vba_related_files(dir.path());
    assert_eq!(counts.get(ExtTag::Bas), 1);
}
