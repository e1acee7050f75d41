//! Folds raw response header lines into a ResponseHead.

use super::transport::ResponseHead;

/// Applies one header line. A status line starts a new head, so only the
/// last response of a redirect chain is kept.
pub(crate) fn apply_header_line(head: &mut ResponseHead, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if line.starts_with("HTTP/") {
        let status = line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);
        *head = ResponseHead {
            status,
            content_length: None,
        };
        return;
    }
    if let Some((name, value)) = line.split_once(':') {
        if name.trim().eq_ignore_ascii_case("content-length") {
            head.content_length = value.trim().parse::<u64>().ok();
        }
    }
}
