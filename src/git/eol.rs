//! Parser for `git ls-files --eol` output
//!
//! Git prints one line per tracked file:
//!
//! ```text
//! i/lf    w/crlf  attr/text eol=crlf      Export/App/ufConfirmation.frm
//! ```
//!
//! The info columns are padded with spaces and separated from the path by a
//! TAB. The `eol=` token is only present when the attribute is set, and git
//! quotes paths containing unusual bytes using C-style escapes.

use crate::models::{EolIndex, EolRecord};

/// Value stored in `attribute_eol` when no `eol=` token is present
pub const UNSPECIFIED: &str = "unspecified";

/// Parse `git ls-files --eol` lines into records keyed by path.
///
/// Lines that do not carry at least four fields are skipped.
pub fn parse_ls_files_eol<'a, I>(lines: I) -> EolIndex
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(String, EolRecord)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let (fields, raw_path): (Vec<&str>, &str) = match line.split_once('\t') {
        Some((info, path)) => (info.split_whitespace().collect(), path),
        None => {
            // No TAB separator: the path is the last whitespace-separated token
            let mut tokens: Vec<&str> = line.split_whitespace().collect();
            let path = tokens.pop()?;
            (tokens, path)
        }
    };

    // index, working tree, attr + path
    if fields.len() < 3 || raw_path.is_empty() {
        return None;
    }

    let attribute_eol = fields
        .get(3)
        .map(|v| strip_category(v).to_string())
        .unwrap_or_else(|| UNSPECIFIED.to_string());

    let record = EolRecord {
        index: strip_category(fields[0]).to_string(),
        working_directory: strip_category(fields[1]).to_string(),
        attribute_text: strip_category(fields[2]).to_string(),
        attribute_eol,
    };

    Some((unquote_path(raw_path), record))
}

/// Drop the `<category>/` prefix, keeping the value untouched.
fn strip_category(field: &str) -> &str {
    field.split_once('/').map(|(_, v)| v).unwrap_or(field)
}

/// Undo git's C-style path quoting (`"dir/caf\303\251.frm"`).
pub fn unquote_path(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let next = bytes[i + 1];
        let simple = match next {
            b'\\' => Some(b'\\'),
            b'"' => Some(b'"'),
            b'a' => Some(0x07),
            b'b' => Some(0x08),
            b'f' => Some(0x0c),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'v' => Some(0x0b),
            _ => None,
        };
        if let Some(b) = simple {
            out.push(b);
            i += 2;
            continue;
        }

        let octal: Vec<u8> = bytes[i + 1..]
            .iter()
            .take(3)
            .take_while(|b| (b'0'..=b'7').contains(*b))
            .copied()
            .collect();
        if octal.len() == 3 {
            let value = octal
                .iter()
                .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            out.push((value & 0xff) as u8);
            i += 4;
        } else {
            out.push(b'\\');
            i += 1;
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
