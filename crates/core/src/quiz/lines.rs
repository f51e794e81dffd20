//! Line-oriented quiz format
//!
//! ```text
//! # JEE mock 3, shift 1
//! a1 A
//! a2 B
//! a21 42
//! ```
//!
//! One question per line: an identifier and the correct answer separated by
//! whitespace. Blank lines and lines starting with `#` are skipped. Question
//! order is line order.

use super::FormatError;

/// Returns `(id, answer)` pairs in file order.
pub fn parse_pairs(text: &str) -> Result<Vec<(String, String)>, FormatError> {
    let mut pairs = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1; // 1-indexed
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_fields(line);
        match fields.as_slice() {
            [(_, id), (_, answer)] => pairs.push((id.to_string(), answer.to_string())),
            [(offset, id)] => {
                return Err(FormatError::Syntax {
                    line: line_no,
                    column: column_at(line, offset + id.len()),
                    message: "expected `<id> <answer>`, answer is missing".to_string(),
                });
            }
            _ => {
                let (offset, extra) = fields[2];
                return Err(FormatError::Syntax {
                    line: line_no,
                    column: column_at(line, offset),
                    message: format!("unexpected field `{}`", extra),
                });
            }
        }
    }

    if pairs.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(pairs)
}

/// Whitespace-separated fields with their byte offsets.
fn split_fields(line: &str) -> Vec<(usize, &str)> {
    let mut fields = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                fields.push((s, &line[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        fields.push((s, &line[s..]));
    }
    fields
}

/// 1-based char column of a byte offset within `line`.
fn column_at(line: &str, offset: usize) -> usize {
    line[..offset].chars().count() + 1
}
