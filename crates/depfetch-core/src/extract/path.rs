use std::fmt;

/// A normalized relative resource path such as `/core/config.php`.
///
/// Only produced by [`normalize`](super::normalize): never empty, never ends
/// in "/", never the literal "/php", and its last segment is a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub(crate) fn new(raw: String) -> Self {
        debug_assert!(!raw.is_empty() && !raw.ends_with('/'));
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment: the local file name.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Non-empty segments before the file name, in order.
    pub fn dir_segments(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = self.0.split('/').collect();
        parts.pop();
        parts.into_iter().filter(|s| !s.is_empty()).collect()
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_dirs_and_file() {
        let p = CanonicalPath::new("/a/b/c.txt".to_string());
        assert_eq!(p.dir_segments(), vec!["a", "b"]);
        assert_eq!(p.file_name(), "c.txt");
    }

    #[test]
    fn top_level_file_has_no_dirs() {
        let p = CanonicalPath::new("/index.php".to_string());
        assert!(p.dir_segments().is_empty());
        assert_eq!(p.file_name(), "index.php");

        let bare = CanonicalPath::new("index.php".to_string());
        assert!(bare.dir_segments().is_empty());
        assert_eq!(bare.file_name(), "index.php");
    }

    #[test]
    fn empty_segments_are_skipped() {
        let p = CanonicalPath::new("//lib//db.php".to_string());
        assert_eq!(p.dir_segments(), vec!["lib"]);
        assert_eq!(p.file_name(), "db.php");
    }
}
