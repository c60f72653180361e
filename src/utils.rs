//! Small helpers shared across the crate.
//!
//! - Content length checks used by both pipeline stages
//! - String truncation and slugification for logs and Markdown anchors
//! - JSON error classification for handling truncated model replies
//! - File system validation for output directories

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Articles shorter than this (in characters) are never sent to a model.
pub const MIN_CONTENT_CHARS: usize = 50;

/// Length of `content` in characters rather than bytes.
pub fn content_len(content: &str) -> usize {
    content.chars().count()
}

/// Whether `content` is long enough to be classified or grouped.
pub fn has_min_content(content: &str) -> bool {
    content_len(content) >= MIN_CONTENT_CHARS
}

/// Truncate a string for logging purposes.
///
/// Keeps at most `max` characters and appends `"…(+N bytes)"` with the
/// number of bytes dropped.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// A reply cut off by the model's token limit fails with an EOF error,
/// which is worth one more attempt.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Convert a title to a URL-friendly slug for Markdown anchors.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Sync probe: simpler error surface than tokio's
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_content_boundary() {
        assert!(!has_min_content(&"a".repeat(49)));
        assert!(has_min_content(&"a".repeat(50)));
        assert!(!has_min_content(""));
    }

    #[test]
    fn test_content_len_counts_chars() {
        // 25 two-byte characters: 50 bytes but only 25 chars
        let s = "é".repeat(25);
        assert_eq!(s.len(), 50);
        assert_eq!(content_len(&s), 25);
        assert!(!has_min_content(&s));
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "ééé";
        assert_eq!(truncate_for_log(s, 1), "é…(+4 bytes)");
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Times of India"), "times-of-india");
        assert_eq!(slugify_title("Flood Alert Issued!"), "flood-alert-issued");
        assert_eq!(slugify_title("Special@#$Characters"), "specialcharacters");
    }

    #[test]
    fn test_looks_truncated() {
        let result: Result<serde_json::Value, _> = serde_json::from_str(r#"{"isRelevant": tr"#);
        assert!(looks_truncated(&result.unwrap_err()));

        let result: Result<serde_json::Value, _> = serde_json::from_str("not json");
        assert!(!looks_truncated(&result.unwrap_err()));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = std::env::temp_dir().join(format!("lawlens-utils-{}", std::process::id()));
        let path = dir.to_string_lossy().to_string();
        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
