//! List, view and download operations on a user's logs

use std::path::Path;
use tracing::{debug, info};
use weblog_core::{
    escape_angle_brackets, escape_url_path, format_http_date, AccessError, Action,
    BreadcrumbSegment, Download, DownloadMeta, ListingRow, LogRow, Scope, ViewMode,
};

use crate::breadcrumbs;
use crate::lister;
use crate::reader::LogReader;
use crate::resolver::PathResolver;

/// A viewed log plus the navigation that goes with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogView {
    pub log: LogRow,
    /// Empty in raw mode
    pub breadcrumbs: Vec<BreadcrumbSegment>,
}

/// Performs the user-facing operations. Each call either succeeds or
/// returns exactly one [`AccessError`].
#[derive(Debug, Clone)]
pub struct LogAccessor {
    resolver: PathResolver,
}

impl LogAccessor {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// List the directory `dir` relative to the user's base
    pub fn list(
        &self,
        username: &str,
        scope: &Scope,
        dir: &str,
    ) -> Result<Vec<ListingRow>, AccessError> {
        let path = self.resolver.resolve(username, scope, dir, Action::List)?;

        if !path.exists() {
            return Err(AccessError::DirectoryNotFound(dir.to_string()));
        }
        if path.is_file() {
            return Err(AccessError::NotADirectory(dir.to_string()));
        }

        let entries = lister::list_dir(&path);
        if entries.is_empty() {
            return Err(AccessError::EmptyDirectory(dir.to_string()));
        }

        debug!("Listed {} entries in {}", entries.len(), path.display());
        Ok(entries
            .iter()
            .map(|entry| ListingRow::from_entry(dir, entry))
            .collect())
    }

    /// Read the log file `dir` for display
    pub fn view(
        &self,
        username: &str,
        scope: &Scope,
        dir: &str,
        mode: ViewMode,
    ) -> Result<LogView, AccessError> {
        let path = self.resolver.resolve(username, scope, dir, Action::View)?;
        let mut reader = open_log(&path, dir)?;
        let content = reader
            .read_stripped()
            .map_err(|_| AccessError::ReadFailed(dir.to_string()))?;

        let view = match mode {
            ViewMode::Raw => LogView {
                log: LogRow {
                    content: escape_angle_brackets(&content),
                    raw_url: None,
                    download_url: None,
                },
                breadcrumbs: Vec::new(),
            },
            ViewMode::Rendered => {
                let escaped = escape_url_path(dir);
                LogView {
                    log: LogRow {
                        content,
                        raw_url: Some(format!("raw?dir={}", escaped)),
                        download_url: Some(format!("download?dir={}", escaped)),
                    },
                    breadcrumbs: breadcrumbs::build(dir, true),
                }
            }
        };

        Ok(view)
    }

    /// Read the log file `dir` for download.
    ///
    /// `content_length` is the stat size taken before reading, which is
    /// larger than the stripped content whenever the file has newlines.
    pub fn download(
        &self,
        username: &str,
        scope: &Scope,
        dir: &str,
    ) -> Result<Download, AccessError> {
        let filename = download_filename(dir);
        let path = self.resolver.resolve(username, scope, dir, Action::View)?;
        let mut reader = open_log(&path, dir)?;

        let content_length = reader.size();
        let last_modified = format_http_date(reader.modified());
        let content = reader
            .read_stripped_bytes()
            .map_err(|_| AccessError::ReadFailed(dir.to_string()))?;

        info!("{} downloading {}", username, path.display());
        Ok(Download {
            meta: DownloadMeta {
                filename,
                content_length,
                last_modified,
            },
            content: content.into(),
        })
    }
}

/// Final `/`-separated segment of the requested path
pub fn download_filename(dir: &str) -> String {
    dir.rsplit('/').next().unwrap_or(dir).to_string()
}

/// Existence and type checks, then open and rewind
fn open_log(path: &Path, dir: &str) -> Result<LogReader, AccessError> {
    if !path.exists() {
        return Err(AccessError::FileNotFound(dir.to_string()));
    }
    if path.is_dir() {
        return Err(AccessError::NotAFile(dir.to_string()));
    }

    let mut reader =
        LogReader::open(path).map_err(|_| AccessError::OpenFailed(dir.to_string()))?;
    reader
        .rewind()
        .map_err(|_| AccessError::ReadFailed(dir.to_string()))?;
    Ok(reader)
}
