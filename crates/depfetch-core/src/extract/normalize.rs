//! Turns one matched line into a canonical path, or rejects it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::CanonicalPath;

/// Literal that shows up when a keyword matches inside `<?php`.
const DEGENERATE_LITERAL: &str = "/php";

/// Which quote character is looked for first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuotePriority {
    #[default]
    #[serde(rename = "single")]
    SingleFirst,
    #[serde(rename = "double")]
    DoubleFirst,
}

impl QuotePriority {
    fn order(self) -> [char; 2] {
        match self {
            QuotePriority::SingleFirst => ['\'', '"'],
            QuotePriority::DoubleFirst => ['"', '\''],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub quote_priority: QuotePriority,
    /// When true every path is forced to start with "/". When false an
    /// empty literal is rejected instead.
    pub leading_slash: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            quote_priority: QuotePriority::SingleFirst,
            leading_slash: true,
        }
    }
}

/// Why a line could not be reduced to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No quote character on the line.
    NoDelimiter,
    /// The literal is "/php", a keyword false match.
    Degenerate,
    /// The literal names a directory, not a file.
    Directory,
    /// Nothing left after trimming (leading slash off only).
    Empty,
}

impl Rejection {
    /// Short tag written to the rejection journal.
    pub fn tag(self) -> &'static str {
        match self {
            Rejection::NoDelimiter => "no-delimiter",
            Rejection::Degenerate => "degenerate",
            Rejection::Directory => "directory",
            Rejection::Empty => "empty",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rejection::NoDelimiter => "no quote delimiter",
            Rejection::Degenerate => "degenerate value",
            Rejection::Directory => "directory, not a file",
            Rejection::Empty => "empty path",
        };
        f.write_str(s)
    }
}

/// Normalizes `line` into a [`CanonicalPath`]. Pure; never panics on
/// malformed input.
pub fn normalize(line: &str, opts: &ExtractOptions) -> Result<CanonicalPath, Rejection> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();

    let literal = opts
        .quote_priority
        .order()
        .iter()
        .find_map(|q| quoted(&compact, *q))
        .ok_or(Rejection::NoDelimiter)?;

    let literal = literal.strip_prefix('.').unwrap_or(literal);

    let literal = if opts.leading_slash && !literal.starts_with('/') {
        format!("/{}", literal)
    } else {
        literal.to_string()
    };

    if literal.is_empty() {
        return Err(Rejection::Empty);
    }
    if literal == DEGENERATE_LITERAL {
        return Err(Rejection::Degenerate);
    }
    if literal.ends_with('/') {
        return Err(Rejection::Directory);
    }
    let last = literal.rsplit('/').next().unwrap_or(&literal);
    if last == "." || last == ".." {
        return Err(Rejection::Directory);
    }

    Ok(CanonicalPath::new(literal))
}

/// Text between the first and second `quote`. An unterminated quote runs to
/// the end of the line.
fn quoted(s: &str, quote: char) -> Option<&str> {
    let start = s.find(quote)? + quote.len_utf8();
    let rest = &s[start..];
    Some(match rest.find(quote) {
        Some(end) => &rest[..end],
        None => rest,
    })
}
