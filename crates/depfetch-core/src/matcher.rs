//! Line selection: keeps every line that contains any keyword as a literal substring.

use crate::error::ConfigError;

/// One line of the scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number (informational only).
    pub number: usize,
    pub content: String,
}

/// Returns the lines of `text` containing at least one of `keywords`, in
/// document order. Duplicates are kept; comments are not special.
pub fn find_matches<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<SourceLine> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| keywords.iter().any(|k| line.contains(k.as_ref())))
        .map(|(i, line)| SourceLine {
            number: i + 1,
            content: line.to_string(),
        })
        .collect()
}

/// Drops empty keywords (they would match every line). Nothing left is a
/// configuration error.
pub fn usable_keywords<I, S>(keywords: I) -> Result<Vec<String>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let keywords: Vec<String> = keywords
        .into_iter()
        .map(Into::into)
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(ConfigError::NoKeywords);
    }
    Ok(keywords)
}
