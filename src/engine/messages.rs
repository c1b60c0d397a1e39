//! Comment bodies posted on tracking issues
//!
//! Every comment that does not close the issue carries a `[SubCheck XY]`
//! marker so it is posted at most once.

use crate::models::CheckLabel;

pub const DELETED: &str =
    "Looks like the repository has been deleted or privated. Closing the issue.";

pub const NOW_VBA: &str =
    "Looks like you made some changes and the repository is now reported as VBA, great!";

pub const RESOLVED: &str =
    "This issue is now resolved, so I'm closing it. If you have any questions, feel free to ask.";

pub const STILL_NOT_VBA: &str =
    "I see that you've made some changes to the files, but the repo is still reported as not VBA 🤔.";

pub const GITATTRIBUTES_FIXED: &str =
    "Looks like you made some changes and the .gitattributes file is now correctly configured.";

pub const GITATTRIBUTES_ADDED: &str =
    "Looks like you added a .gitattributes file and it is correctly configured.";

pub const CRLF_COMMITTED: &str =
    "Looks like you made some changes and the .frm/.cls files are now committed with CRLF line endings.";

/// `[SubCheck <check><variant>]`
pub fn marker(check: CheckLabel, variant: char) -> String {
    format!("[SubCheck {}{}]", check.letter(), variant)
}

/// How the stray files of an extension check are described in comments
pub fn stray_files(check: CheckLabel) -> &'static str {
    match check {
        CheckLabel::A => "files with the .vb extension",
        CheckLabel::B => "files with the .vbs extension",
        CheckLabel::C => "files with no extension that contain VBA code",
        CheckLabel::D => "files with the .txt extension that contain VBA code",
        _ => "files with the wrong extension",
    }
}

fn join(lines: &[&str]) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Closing comment for an extension check
pub fn extension_resolved(now_vba: bool) -> String {
    if now_vba {
        join(&[NOW_VBA, RESOLVED])
    } else {
        join(&[RESOLVED])
    }
}

/// `[SubCheck XA]`: stray files remain
pub fn still_stray(check: CheckLabel, now_vba: bool) -> String {
    let reminder = format!(
        "However, there are still {}. Is this intentional? {}",
        stray_files(check),
        marker(check, 'A')
    );
    if now_vba {
        join(&[NOW_VBA, &reminder])
    } else {
        join(&[&reminder])
    }
}

/// `[SubCheck XB]`: `.vba` files appeared next to the stray ones
pub fn mixed_extensions(check: CheckLabel) -> String {
    let reminder = format!(
        "There are still {}. Is this intentional? {}",
        stray_files(check),
        marker(check, 'B')
    );
    join(&[STILL_NOT_VBA, &reminder])
}

/// Closing comment once `.gitattributes` stops forcing LF
pub fn gitattributes_resolved(check: CheckLabel) -> String {
    let greeting = if check == CheckLabel::G {
        GITATTRIBUTES_ADDED
    } else {
        GITATTRIBUTES_FIXED
    };
    join(&[greeting, RESOLVED])
}

/// Renormalize instructions for files still stored with LF
pub fn renormalize(check: CheckLabel, files: &[String]) -> String {
    let greeting = if check == CheckLabel::G {
        GITATTRIBUTES_ADDED
    } else {
        GITATTRIBUTES_FIXED
    };
    let mut body = String::new();
    body.push_str(greeting);
    body.push('\n');
    body.push_str(
        "However, the following files are still stored with LF line endings in the repository:\n\n",
    );
    for file in files {
        body.push_str(&format!("- {}\n", crate::templates::escape_markdown(file)));
    }
    body.push_str(
        "\nTo convert them, run the following commands and push the result:\n\n\
         ```\n\
         git add --renormalize .\n\
         git commit -m \"Normalize line endings\"\n\
         ```\n\n",
    );
    body.push_str(&marker(check, 'A'));
    body.push('\n');
    body
}

/// Closing comment for Check F
pub fn crlf_committed() -> String {
    join(&[CRLF_COMMITTED, RESOLVED])
}
