//! Name patterns.
//!
//! A pattern is a template such as `%A/%y - %a`. Recognized tokens:
//!
//! | Token | Field        |
//! |-------|--------------|
//! | `%A`  | artist       |
//! | `%a`  | album        |
//! | `%t`  | title        |
//! | `%tn` | track number |
//! | `%y`  | year         |
//!
//! Any other `%` sequence is copied through unchanged.

use serde::{Deserialize, Serialize};

use super::Tag;

pub const DEFAULT_DIR_PATTERN: &str = "%A/%y - %a";
pub const DEFAULT_FILE_PATTERN: &str = "%tn - %t";

/// Characters replaced with `_` in field values.
const FORBIDDEN_CHARS: &[char] = &['*', '.', '"', '/', '[', ']', ':', ';', '|', '=', '?', ','];

#[derive(Debug, Clone, Copy)]
enum Field {
    Artist,
    Album,
    Title,
    Track,
    Year,
}

/// Token table, longest first. `%t` is a prefix of `%tn`, so `%tn` must be
/// tried before it.
const TOKENS: &[(&str, Field)] = &[
    ("%tn", Field::Track),
    ("%A", Field::Artist),
    ("%a", Field::Album),
    ("%t", Field::Title),
    ("%y", Field::Year),
];

/// Directory and file patterns used for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patterns {
    pub directory: String,
    pub file: String,
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            directory: DEFAULT_DIR_PATTERN.to_string(),
            file: DEFAULT_FILE_PATTERN.to_string(),
        }
    }
}

/// Expand `pattern` with values from `tag`.
///
/// Works in a single left-to-right pass: at each position the longest
/// matching token is substituted, and substituted text is never rescanned.
pub fn generate(tag: &Tag, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 32);
    let mut rest = pattern;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            Some((token, field)) => {
                out.push_str(&field_value(tag, *field));
                rest = &rest[token.len()..];
            }
            None => {
                out.push('%');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn field_value(tag: &Tag, field: Field) -> String {
    match field {
        Field::Artist => sanitize(&tag.artist),
        Field::Album => sanitize(&tag.album),
        Field::Title => sanitize(&tag.title),
        Field::Year => sanitize(&tag.year),
        Field::Track => tag.track.map(|n| format!("{:02}", n)).unwrap_or_default(),
    }
}

/// Replace filesystem-unsafe characters in a field value with `_`.
/// NUL characters are dropped.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|&c| c != '\0')
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
