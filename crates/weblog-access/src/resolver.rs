//! Base path derivation and path confinement

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use weblog_core::{AccessError, Action, Config, Scope};

/// Turns (user, scope, relative dir) into a path the user may touch
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: String,
}

impl PathResolver {
    /// Create a resolver for an installation root
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_string_lossy();
        let trimmed = root.trim_end_matches('/');
        Self {
            root: if trimmed.is_empty() {
                root.into_owned()
            } else {
                trimmed.to_string()
            },
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.root)
    }

    /// Installation root, without trailing slash
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Base directory of a user's logs for a scope. Always ends with `/`.
    pub fn derive_base(&self, username: &str, scope: &Scope) -> String {
        match scope {
            Scope::Global => format!("{}/moddata/log/{}/", self.root, username),
            Scope::User => format!("{}/users/{}/moddata/log/", self.root, username),
            Scope::Network(network) => format!(
                "{}/users/{}/networks/{}/moddata/log/",
                self.root, username, network
            ),
        }
    }

    /// Coarse gate every candidate path must pass before touching the disk.
    ///
    /// Denies unless the path starts with the installation root, contains the
    /// username somewhere and has no `/..` in it.
    pub fn is_allowed(&self, username: &str, candidate: &str) -> bool {
        !username.is_empty()
            && candidate.starts_with(&self.root)
            && candidate.contains(username)
            && !candidate.contains("/..")
    }

    /// Resolve `dir` under the user's base for `scope`.
    ///
    /// On top of [`is_allowed`](Self::is_allowed), an existing candidate must
    /// canonicalize to somewhere under the canonical base, so symlinks cannot
    /// lead out of the user's tree.
    pub fn resolve(
        &self,
        username: &str,
        scope: &Scope,
        dir: &str,
        action: Action,
    ) -> Result<PathBuf, AccessError> {
        let base = self.derive_base(username, scope);
        let candidate = format!("{}{}", base, dir);

        if !self.is_allowed(username, &candidate) {
            warn!("Denied {} of {:?} for {}", action, dir, username);
            return Err(AccessError::denied(action, dir));
        }

        let path = PathBuf::from(candidate);
        if !is_contained(Path::new(&base), &path) {
            warn!("Denied {} of {:?} for {}: escapes base", action, dir, username);
            return Err(AccessError::denied(action, dir));
        }

        debug!("Resolved {:?} to {}", dir, path.display());
        Ok(path)
    }

    /// Names of the network directories a user has on disk
    pub fn discover_networks(&self, username: &str) -> Vec<String> {
        if username.is_empty() || username.contains('/') || username.contains("..") {
            return Vec::new();
        }

        let dir = format!("{}/users/{}/networks", self.root, username);
        let Ok(read) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut networks: Vec<String> = read
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        networks.sort();
        networks
    }
}

/// Whether `path` stays under `base` once symlinks are resolved.
/// A path that does not exist yet is left to the caller's existence check.
fn is_contained(base: &Path, path: &Path) -> bool {
    let Ok(real_path) = fs::canonicalize(path) else {
        return true;
    };
    match fs::canonicalize(base) {
        Ok(real_base) => real_path.starts_with(real_base),
        Err(_) => false,
    }
}
