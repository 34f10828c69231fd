//! Core types for weblog

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::constants::{HTTP_DATE_FORMAT, SIZE_UNIT_BYTES};
use crate::error::AccessError;

/// Escape a log path for use in a query string
pub fn escape_url_path(path: &str) -> String {
    path.replace('#', "%23")
}

/// Escape `<` and `>` only; quotes and ampersands pass through untouched
pub fn escape_angle_brackets(s: &str) -> String {
    s.replace('<', "&lt;").replace('>', "&gt;")
}

/// Format a timestamp as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.format(HTTP_DATE_FORMAT).to_string()
}

/// Render a byte count as whole kibibytes, truncating
pub fn format_size(bytes: u64) -> String {
    format!("{} KB", bytes / SIZE_UNIT_BYTES)
}

/// Single entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size_bytes: u64,
    pub modified: SystemTime,
}

/// Row of the directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    /// Navigable URL: `?dir=` for directories, `log?dir=` for files
    pub url: String,
    pub name: String,
    pub is_dir: bool,
    /// Display size, e.g. "2 KB"
    pub size: String,
    pub size_bytes: u64,
    pub modified: String,
}

impl ListingRow {
    /// Build a row for `entry` found in directory `dir`
    pub fn from_entry(dir: &str, entry: &DirEntry) -> Self {
        let path = if dir.is_empty() {
            entry.name.clone()
        } else {
            format!("{}/{}", dir, entry.name)
        };

        let url = if entry.is_dir {
            format!("?dir={}", path)
        } else {
            format!("log?dir={}", path)
        };

        Self {
            url: escape_url_path(&url),
            name: entry.name.clone(),
            is_dir: entry.is_dir,
            size: format_size(entry.size_bytes),
            size_bytes: entry.size_bytes,
            modified: format_http_date(entry.modified),
        }
    }
}

/// How a log file is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Page with breadcrumbs and raw/download links
    Rendered,
    /// Bare content with angle brackets escaped
    Raw,
}

/// Content of a viewed log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRow {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// One step of the breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbSegment {
    pub text: String,
    pub url: String,
    pub is_log: bool,
}

/// Entry of the scope selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeOption {
    pub name: String,
    pub active: bool,
}

/// Response metadata for a log download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadMeta {
    pub filename: String,
    /// File size from the stat taken before reading
    pub content_length: u64,
    pub last_modified: String,
}

impl DownloadMeta {
    /// Response headers in the order they are sent
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Transfer-Encoding", "binary".to_string()),
            ("Last-Modified", self.last_modified.clone()),
            ("Accept-Ranges", "bytes".to_string()),
            ("Content-Length", self.content_length.to_string()),
            ("Content-Encoding", "none".to_string()),
            ("Content-Type", "text/plain".to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename={}", self.filename),
            ),
        ]
    }
}

/// A log ready to be sent as an attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub meta: DownloadMeta,
    /// File bytes as stored, newlines dropped
    pub content: Bytes,
}

/// Everything a page request produces, handed to the host for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// No scope has been selected yet
    pub no_scope: bool,
    pub messages: Vec<String>,
    pub errors: Vec<String>,
    pub listing: Vec<ListingRow>,
    pub log: Option<LogRow>,
    pub breadcrumbs: Vec<BreadcrumbSegment>,
    pub scopes: Vec<ScopeOption>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, err: &AccessError) {
        self.errors.push(err.to_string());
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_escape_url_path() {
        assert_eq!(escape_url_path("sub#dir/file.log"), "sub%23dir/file.log");
        assert_eq!(escape_url_path("plain"), "plain");
    }

    #[test]
    fn test_escape_angle_brackets() {
        assert_eq!(escape_angle_brackets("<script>"), "&lt;script&gt;");
        assert_eq!(
            escape_angle_brackets("a & \"b\" 'c'"),
            "a & \"b\" 'c'"
        );
    }

    #[test]
    fn test_format_size_truncates() {
        assert_eq!(format_size(0), "0 KB");
        assert_eq!(format_size(1023), "0 KB");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(3071), "2 KB");
    }

    #[test]
    fn test_format_http_date() {
        let t = UNIX_EPOCH + Duration::from_secs(784111777);
        assert_eq!(format_http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_listing_row_urls() {
        let file = DirEntry {
            name: "irc.log".into(),
            is_dir: false,
            size_bytes: 2048,
            modified: UNIX_EPOCH,
        };
        let row = ListingRow::from_entry("", &file);
        assert_eq!(row.url, "log?dir=irc.log");
        assert_eq!(row.size, "2 KB");

        let dir = DirEntry {
            name: "#chan".into(),
            is_dir: true,
            size_bytes: 0,
            modified: UNIX_EPOCH,
        };
        let row = ListingRow::from_entry("libera", &dir);
        assert_eq!(row.url, "?dir=libera/%23chan");
        assert_eq!(row.name, "#chan");
    }

    #[test]
    fn test_download_headers() {
        let meta = DownloadMeta {
            filename: "2024-01-01.log".into(),
            content_length: 42,
            last_modified: "Sun, 06 Nov 1994 08:49:37 GMT".into(),
        };
        let headers = meta.headers();
        assert_eq!(headers.len(), 7);
        assert!(headers.contains(&("Content-Length", "42".to_string())));
        assert!(headers.contains(&(
            "Content-Disposition",
            "attachment; filename=2024-01-01.log".to_string()
        )));
        assert!(headers.contains(&("Content-Encoding", "none".to_string())));
    }
}
