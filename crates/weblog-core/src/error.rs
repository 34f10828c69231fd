//! Error types for weblog

use std::path::PathBuf;

use crate::constants::LOGS_PREFIX;

/// weblog error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Database error: {0}")]
    DbError(String),

    #[error("Scope store error: {0}")]
    StoreError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for weblog
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn db<S: Into<String>>(msg: S) -> Self {
        Error::DbError(msg.into())
    }

    pub fn store<S: Into<String>>(msg: S) -> Self {
        Error::StoreError(msg.into())
    }
}

/// Operation named in a permission error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    View,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::List => write!(f, "list directory"),
            Action::View => write!(f, "view"),
        }
    }
}

/// Broad class of an [`AccessError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoScopeConfigured,
    PermissionDenied,
    NotFound,
    WrongType,
    IoError,
    EmptyDirectory,
}

/// Outcome of a browse operation that did not succeed.
///
/// The `Display` text is exactly what ends up in the error row shown to the
/// user. None of these are fatal to the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Error: No scope set. Please set a scope below.")]
    NoScope,

    #[error("You do not have permission to {} '{}'", .action, logs_path(.dir))]
    PermissionDenied { action: Action, dir: String },

    #[error("Directory '{}' does not exist", logs_path(.0))]
    DirectoryNotFound(String),

    #[error("Directory '{}' is a file", logs_path(.0))]
    NotADirectory(String),

    #[error("Directory '{0}' is empty")]
    EmptyDirectory(String),

    #[error("File {0} does not exist")]
    FileNotFound(String),

    #[error("File '{0}' is a directory")]
    NotAFile(String),

    #[error("Unable to open file '{0}'")]
    OpenFailed(String),

    #[error("Unable to read file '{0}'")]
    ReadFailed(String),

    #[error("Unable to load scope: {0}")]
    ScopeUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccessError {
    pub fn denied(action: Action, dir: &str) -> Self {
        AccessError::PermissionDenied {
            action,
            dir: dir.to_string(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::NoScope => ErrorKind::NoScopeConfigured,
            AccessError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            AccessError::DirectoryNotFound(_) | AccessError::FileNotFound(_) => ErrorKind::NotFound,
            AccessError::NotADirectory(_) | AccessError::NotAFile(_) => ErrorKind::WrongType,
            AccessError::OpenFailed(_)
            | AccessError::ReadFailed(_)
            | AccessError::ScopeUnavailable(_)
            | AccessError::Internal(_) => ErrorKind::IoError,
            AccessError::EmptyDirectory(_) => ErrorKind::EmptyDirectory,
        }
    }
}

/// Render a relative log path the way error rows show it
pub fn logs_path(dir: &str) -> String {
    let dir = dir.trim_start_matches('/');
    if dir.is_empty() {
        LOGS_PREFIX.to_string()
    } else {
        format!("{}/{}", LOGS_PREFIX, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ConfigError("missing root".to_string());
        assert_eq!(err.to_string(), "Config error: missing root");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_permission_denied_messages() {
        let err = AccessError::denied(Action::List, "");
        assert_eq!(
            err.to_string(),
            "You do not have permission to list directory '/logs'"
        );

        let err = AccessError::denied(Action::View, "../../etc/passwd");
        assert_eq!(
            err.to_string(),
            "You do not have permission to view '/logs/../../etc/passwd'"
        );
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_row_texts() {
        assert_eq!(
            AccessError::DirectoryNotFound("2024".into()).to_string(),
            "Directory '/logs/2024' does not exist"
        );
        assert_eq!(
            AccessError::NotADirectory("irc.log".into()).to_string(),
            "Directory '/logs/irc.log' is a file"
        );
        assert_eq!(
            AccessError::EmptyDirectory("old".into()).to_string(),
            "Directory 'old' is empty"
        );
        assert_eq!(
            AccessError::FileNotFound("a.log".into()).to_string(),
            "File a.log does not exist"
        );
        assert_eq!(
            AccessError::NotAFile("chan".into()).to_string(),
            "File 'chan' is a directory"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(AccessError::NoScope.kind(), ErrorKind::NoScopeConfigured);
        assert_eq!(AccessError::NotAFile("x".into()).kind(), ErrorKind::WrongType);
        assert_eq!(AccessError::NotADirectory("x".into()).kind(), ErrorKind::WrongType);
        assert_eq!(AccessError::OpenFailed("x".into()).kind(), ErrorKind::IoError);
        assert_eq!(AccessError::ReadFailed("x".into()).kind(), ErrorKind::IoError);
        assert_eq!(AccessError::FileNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            AccessError::EmptyDirectory("x".into()).kind(),
            ErrorKind::EmptyDirectory
        );
    }
}
