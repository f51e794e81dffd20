//! Array-literal quiz format
//!
//! ```text
//! const rawIds = ["a1", "a2", "a3"];
//! const correctAnswers = ["A", "B", "3"];
//! ```
//!
//! Only the two declarations are read; the rest of the file is ignored.
//! Entries are comma separated, quoted or bare. Each entry is trimmed, quote
//! characters are removed and empty entries are dropped. `//` line comments
//! are allowed between entries; inside a bare value they are kept.

use regex::Regex;
use std::sync::LazyLock;

use super::FormatError;

pub const IDS_ARRAY: &str = "rawIds";
pub const ANSWERS_ARRAY: &str = "correctAnswers";

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:const|let|var)\s+(rawIds|correctAnswers)\s*=\s*\[").unwrap()
});

/// Returns `(ids, answers)` in file order.
pub fn extract_arrays(text: &str) -> Result<(Vec<String>, Vec<String>), FormatError> {
    let (Some(ids_open), Some(answers_open)) =
        (find_array(text, IDS_ARRAY), find_array(text, ANSWERS_ARRAY))
    else {
        return Err(FormatError::MissingArrays);
    };

    let ids = scan_array(text, ids_open)?;
    let answers = scan_array(text, answers_open)?;
    Ok((ids, answers))
}

/// Byte offset of the `[` opening the first declaration of `name`.
fn find_array(text: &str, name: &str) -> Option<usize> {
    DECLARATION_RE
        .captures_iter(text)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(0))
        .map(|m| m.end() - 1)
}

/// Scans entries from the `[` at `open` up to its matching `]`.
fn scan_array(text: &str, open: usize) -> Result<Vec<String>, FormatError> {
    let body_start = open + 1;
    let mut entries = Vec::new();
    let mut raw = String::new();
    let mut quote: Option<(char, usize)> = None;
    let mut chars = text[body_start..].char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let offset = body_start + i;

        if let Some((q, started)) = quote {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        raw.push(escaped);
                    }
                }
                '\n' if q != '`' => {
                    return Err(FormatError::syntax_at(
                        text,
                        started,
                        "unterminated string literal",
                    ));
                }
                _ if c == q => {
                    raw.push(c);
                    quote = None;
                }
                _ => raw.push(c),
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                raw.push(c);
                quote = Some((c, offset));
            }
            ',' => {
                push_entry(&mut entries, &raw);
                raw.clear();
            }
            ']' => {
                push_entry(&mut entries, &raw);
                return Ok(entries);
            }
            '[' => {
                return Err(FormatError::syntax_at(
                    text,
                    offset,
                    "nested arrays are not supported",
                ));
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) && starts_comment(&raw) => {
                for (_, skipped) in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            _ => raw.push(c),
        }
    }

    match quote {
        Some((_, started)) => Err(FormatError::syntax_at(
            text,
            started,
            "unterminated string literal",
        )),
        None => Err(FormatError::syntax_at(
            text,
            open,
            "unterminated array: missing `]`",
        )),
    }
}

/// `//` opens a comment only at the start of an entry, after whitespace or
/// after a closed quote, so bare values such as URLs keep their `//`.
fn starts_comment(raw: &str) -> bool {
    raw.trim().is_empty()
        || raw.ends_with(char::is_whitespace)
        || raw.ends_with(['"', '\'', '`'])
}

fn push_entry(entries: &mut Vec<String>, raw: &str) {
    let value: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`'))
        .collect();
    if !value.is_empty() {
        entries.push(value);
    }
}
