//! Base location that canonical paths are appended to.

use std::fmt;

use crate::error::ConfigError;
use crate::extract::CanonicalPath;

/// Server address or URL prefix. Request URLs are formed by plain
/// concatenation, so prefixes like `http://host/download.php?file=` work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Normalizes a host or URL: `http://` is prepended when the value does
    /// not begin with "http".
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        let full = if raw.starts_with("http") {
            raw.to_string()
        } else {
            format!("http://{}", raw)
        };
        url::Url::parse(&full).map_err(|source| ConfigError::InvalidBaseUrl {
            url: full.clone(),
            source,
        })?;
        Ok(Self(full))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full request URL for `path`.
    pub fn join(&self, path: &CanonicalPath) -> String {
        format!("{}{}", self.0, path.as_str())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{normalize, ExtractOptions};

    #[test]
    fn prepends_scheme_for_bare_host() {
        let base = BaseUrl::parse("example.com").unwrap();
        assert_eq!(base.as_str(), "http://example.com");
    }

    #[test]
    fn keeps_existing_scheme() {
        assert_eq!(
            BaseUrl::parse("https://example.com").unwrap().as_str(),
            "https://example.com"
        );
        assert_eq!(
            BaseUrl::parse("http://10.0.0.5:8080/dl.php?f=").unwrap().as_str(),
            "http://10.0.0.5:8080/dl.php?f="
        );
    }

    #[test]
    fn empty_is_missing() {
        assert!(matches!(BaseUrl::parse("  "), Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn unparsable_is_invalid() {
        assert!(matches!(
            BaseUrl::parse("http://exa mple.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn join_concatenates() {
        let opts = ExtractOptions::default();
        let path = normalize("include('./core/config.php');", &opts).unwrap();
        let base = BaseUrl::parse("example.com").unwrap();
        assert_eq!(base.join(&path), "http://example.com/core/config.php");

        let lfi = BaseUrl::parse("http://victim/download.php?file=").unwrap();
        assert_eq!(lfi.join(&path), "http://victim/download.php?file=/core/config.php");
    }
}
