//! Configuration file parsing for weblog
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Per-user settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    pub name: String,
    /// Networks offered as scopes
    #[serde(default)]
    pub networks: Vec<String>,
}

/// Configuration file structure (weblog.toml/yaml/json)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Installation root all log trees live under
    pub root: PathBuf,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Header carrying the authenticated username
    #[serde(default = "default_user_header")]
    pub user_header: String,
    /// SQLite file holding the selected scopes
    pub database: Option<PathBuf>,
    pub cors_origin: Option<String>,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_user_header() -> String {
    DEFAULT_USER_HEADER.to_string()
}

impl Config {
    /// Minimal config for an installation root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut config = Self {
            root: root.into(),
            bind: default_bind(),
            user_header: default_user_header(),
            database: None,
            cors_origin: None,
            users: Vec::new(),
        };
        config.normalize();
        config
    }

    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let mut config: Config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Find and load a config file from the given directories, first match wins
    pub fn find_and_load(dirs: &[PathBuf]) -> Result<(Self, PathBuf)> {
        for dir in dirs {
            for name in CONFIG_FILES {
                let path = dir.join(name);
                if path.exists() {
                    let config = Self::load(&path)?;
                    return Ok((config, path));
                }
            }
        }
        Err(Error::ConfigError(format!(
            "No config file found in {:?}. Expected one of: {:?}",
            dirs, CONFIG_FILES
        )))
    }

    /// Override the installation root
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
        self.normalize();
    }

    /// Installation root as a string without trailing slash
    pub fn root_str(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    /// Scope database path, defaulting under the weblog home
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(db_path)
    }

    /// Configured networks for a user, `None` if the user is not listed
    pub fn networks_for(&self, username: &str) -> Option<&[String]> {
        self.users
            .iter()
            .find(|u| u.name == username)
            .map(|u| u.networks.as_slice())
    }

    fn normalize(&mut self) {
        let root = self.root.to_string_lossy();
        let trimmed = root.trim_end_matches('/');
        if !trimmed.is_empty() && trimmed.len() != root.len() {
            self.root = PathBuf::from(trimmed);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::config("root must not be empty"));
        }
        if !self.root.is_absolute() {
            return Err(Error::config(format!(
                "root must be an absolute path, got {}",
                self.root.display()
            )));
        }
        if self.user_header.trim().is_empty() {
            return Err(Error::config("user_header must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_config_format_detection() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("yaml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_config_parse_toml() {
        let config_content = r#"
root = "/data/znc/"
bind = "0.0.0.0:9000"

[[users]]
name = "alice"
networks = ["libera", "oftc"]

[[users]]
name = "bob"
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.root, PathBuf::from("/data/znc"));
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.user_header, DEFAULT_USER_HEADER);
        assert_eq!(
            config.networks_for("alice"),
            Some(&["libera".to_string(), "oftc".to_string()][..])
        );
        assert_eq!(config.networks_for("bob"), Some(&[][..]));
        assert_eq!(config.networks_for("carol"), None);
    }

    #[test]
    fn test_config_parse_yaml() {
        let config_content = r#"
root: /data/znc
user_header: X-Forwarded-User
database: /var/lib/weblog/scopes.db
users:
  - name: alice
    networks: [libera]
"#;
        let config = Config::parse(config_content, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.user_header, "X-Forwarded-User");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/weblog/scopes.db")
        );
        assert_eq!(config.users.len(), 1);
    }

    #[test]
    fn test_config_parse_json() {
        let config_content = r#"{ "root": "/srv/znc", "cors_origin": "http://localhost:3000" }"#;
        let config = Config::parse(config_content, ConfigFormat::Json).unwrap();
        assert_eq!(config.root_str(), "/srv/znc");
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_config_relative_root_rejected() {
        let result = Config::parse(r#"root = "data/znc""#, ConfigFormat::Toml);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/weblog.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_find_and_load() {
        let empty = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("weblog.yml"), "root: /data/znc\n").unwrap();

        let dirs = vec![empty.path().to_path_buf(), dir.path().to_path_buf()];
        let (config, path) = Config::find_and_load(&dirs).unwrap();
        assert_eq!(config.root_str(), "/data/znc");
        assert!(path.ends_with("weblog.yml"));

        assert!(Config::find_and_load(&[empty.path().to_path_buf()]).is_err());
    }

    #[test]
    fn test_set_root_trims_slash() {
        let mut config = Config::new("/data/znc");
        config.set_root("/other/root//");
        assert_eq!(config.root_str(), "/other/root");
    }
}
