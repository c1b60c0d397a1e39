//! Content sniffing for ambiguous files
//!
//! - VBA code detection (procedure declarations, Windows-1252 decoded)
//! - Text vs binary detection for Office containers
//! - Corrupted `.frm`/`.cls` headers (`VERSION` line followed by a blank LF line)

use encoding_rs::WINDOWS_1252;
use regex::Regex;
use std::sync::OnceLock;

/// Bytes inspected by the binary check
pub const SNIFF_LEN: usize = 1024;

static VBA_PROCEDURE: OnceLock<Regex> = OnceLock::new();

fn vba_procedure_regex() -> &'static Regex {
    VBA_PROCEDURE.get_or_init(|| {
        // `Sub Foo`, `Public Function Bar`, `Private Sub Baz` at line start
        Regex::new(r"(?m)^(?:(?:Public|Private)[ \t]+)?(?:Sub|Function)[ \t]").unwrap()
    })
}

/// Decode bytes as Windows-1252. Every byte maps to a character; a leading
/// byte-order mark is decoded like any other bytes.
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Does the file content look like VBA source?
pub fn contains_vba_code(bytes: &[u8]) -> bool {
    vba_procedure_regex().is_match(&decode_windows_1252(bytes))
}

fn is_text_byte(b: u8) -> bool {
    matches!(b, 7 | 8 | 9 | 10 | 12 | 13 | 27) || (b >= 0x20 && b != 0x7f)
}

/// Binary when any of the first [`SNIFF_LEN`] bytes falls outside the text set.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(SNIFF_LEN).any(|b| !is_text_byte(*b))
}

/// `VERSION ...\n\n` at the top of an exported module.
///
/// The VBE writes CRLF; a bare LF line followed by an empty LF line means
/// the file went through a CR to LF conversion and will not re-import.
pub fn has_double_lf_header(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"VERSION") {
        return false;
    }
    let Some(nl) = bytes.iter().position(|b| *b == b'\n') else {
        return false;
    };
    nl > 0 && bytes[nl - 1] != b'\r' && bytes.get(nl + 1) == Some(&b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vba_code_detection() {
        assert!(contains_vba_code(b"Public Sub Foo()\r\n    x = 1\r\nEnd Sub\r\n"));
        assert!(contains_vba_code(b"Option Explicit\n\nFunction Add(a, b)\nEnd Function\n"));
        assert!(contains_vba_code(b"' module\nPrivate Sub Helper()\nEnd Sub"));
        assert!(!contains_vba_code(b"x\n    Sub Foo()\n"));
        assert!(!contains_vba_code(b"This file lists the things to buy.\nMilk\nEggs\n"));
        assert!(!contains_vba_code(b"Call Subroutine\n"));
    }

    #[test]
    fn test_vba_code_with_windows_1252_bytes() {
        // 0xE9 is e-acute in Windows-1252 and invalid as standalone UTF-8
        let bytes = b"' R\xe9sum\xe9\r\nPrivate Function Total()\r\nEnd Function\r\n";
        assert!(std::str::from_utf8(bytes).is_err());
        assert!(contains_vba_code(bytes));
    }

    #[test]
    fn test_byte_order_marks_stay_windows_1252() {
        assert_eq!(decode_windows_1252(b"\xef\xbb\xbfA"), "\u{ef}\u{bb}\u{bf}A");
        assert_eq!(decode_windows_1252(b"\xff\xfeS\x00"), "\u{ff}\u{fe}S\u{0}");
    }

    #[test]
    fn test_binary_detection() {
        assert!(!is_binary(b"plain text\r\nwith lines\t and tabs"));
        assert!(is_binary(b"PK\x03\x04\x14\x00\x06\x00"));
        assert!(is_binary(b"text then \x7f delete"));
        assert!(!is_binary(b""));
    }

    #[test]
    fn test_binary_detection_only_reads_prefix() {
        let mut bytes = vec![b'a'; SNIFF_LEN];
        bytes.push(0);
        assert!(!is_binary(&bytes));
    }

    #[test]
    fn test_double_lf_header() {
        assert!(has_double_lf_header(
            b"VERSION 1.0 CLASS\n\nBEGIN\n    MultiUse = -1\nEND\n"
        ));
        assert!(has_double_lf_header(b"VERSION 5.00\n\nBegin {guid} UserForm1\n"));
        assert!(!has_double_lf_header(b"VERSION 1.0 CLASS\nBEGIN\n"));
        assert!(!has_double_lf_header(b"VERSION 1.0 CLASS\r\nBEGIN\r\n"));
        assert!(!has_double_lf_header(b"VERSION 1.0 CLASS\r\n\r\nBEGIN\r\n"));
        assert!(!has_double_lf_header(b"Attribute VB_Name = \"Module1\"\n\nSub Test()\n"));
    }
}
