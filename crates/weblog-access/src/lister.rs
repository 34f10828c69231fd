//! Directory enumeration with per-entry sizes

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use weblog_core::DirEntry;

/// List the entries of a directory, sorted by name.
///
/// A missing or unreadable directory yields an empty list; callers that
/// need to tell "missing" apart check existence first. Symlinks are not
/// followed: a link is listed with its own size and mtime.
pub fn list_dir(path: &Path) -> Vec<DirEntry> {
    let Ok(read) = fs::read_dir(path) else {
        return Vec::new();
    };

    let mut entries: Vec<DirEntry> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let entry_path = entry.path();
            DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
                size_bytes: entry_size(&entry_path),
                modified: modified_time(&entry_path),
            }
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Size of a file, or for a directory the sum of its immediate children's
/// stat sizes. Nested directories are not descended into; a child
/// directory counts with its own inode size. Any failed stat yields 0.
pub fn entry_size(path: &Path) -> u64 {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return 0;
    };
    if !meta.is_dir() {
        return meta.len();
    }

    let Ok(read) = fs::read_dir(path) else {
        return 0;
    };

    let mut total = 0u64;
    for child in read {
        let Ok(child) = child else {
            return 0;
        };
        match child.metadata() {
            Ok(meta) => total += meta.len(),
            Err(_) => return 0,
        }
    }
    total
}

/// Modification time of the entry itself, the epoch when it cannot be read
pub fn modified_time(path: &Path) -> SystemTime {
    fs::symlink_metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(UNIX_EPOCH)
}
