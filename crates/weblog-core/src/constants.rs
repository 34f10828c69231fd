//! Constants and default values for weblog

use std::path::PathBuf;

/// Default weblog home directory name
pub const WEBLOG_DIR: &str = ".weblog";

/// Default scope database file name
pub const DB_FILE: &str = "scopes.db";

/// Default config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &["weblog.toml", "weblog.yaml", "weblog.yml", "weblog.json"];

/// Default address the web server binds to
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Header carrying the authenticated username, set by the fronting proxy
pub const DEFAULT_USER_HEADER: &str = "X-Remote-User";

/// Scope names offered in addition to the user's networks
pub const SCOPE_GLOBAL: &str = "Global";
pub const SCOPE_USER: &str = "User";

/// Display prefix for log paths in error rows
pub const LOGS_PREFIX: &str = "/logs";

/// Text of the root breadcrumb
pub const BREADCRUMB_ROOT: &str = "logs";

/// Bytes per unit shown in the listing size column
pub const SIZE_UNIT_BYTES: u64 = 1024;

/// Format used for listing times and the Last-Modified header
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Get the weblog home directory
pub fn weblog_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(WEBLOG_DIR))
        .unwrap_or_else(|| PathBuf::from(WEBLOG_DIR))
}

/// Get the default scope database path
pub fn db_path() -> PathBuf {
    weblog_home().join(DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weblog_home() {
        let home = weblog_home();
        assert!(home.to_string_lossy().contains(".weblog"));
    }

    #[test]
    fn test_db_path() {
        let path = db_path();
        assert!(path.to_string_lossy().ends_with("scopes.db"));
    }
}
