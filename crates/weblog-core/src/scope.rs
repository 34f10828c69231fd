//! Scope selection and per-user scope storage

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::constants::{SCOPE_GLOBAL, SCOPE_USER};
use crate::error::Result;

/// Which log tree a user is browsing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Logs written by the global log module for this user
    Global,
    /// Logs written by the user-level log module
    User,
    /// Logs of a single network owned by the user
    Network(String),
}

impl Scope {
    /// Parse a stored scope value
    /// - "" -> None (unset)
    /// - "global" (any case) -> Global
    /// - "user" (any case) -> User
    /// - anything else -> Network
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            None
        } else if s.eq_ignore_ascii_case("global") {
            Some(Scope::Global)
        } else if s.eq_ignore_ascii_case("user") {
            Some(Scope::User)
        } else {
            Some(Scope::Network(s.to_string()))
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "{}", SCOPE_GLOBAL),
            Scope::User => write!(f, "{}", SCOPE_USER),
            Scope::Network(name) => write!(f, "{}", name),
        }
    }
}

/// Persistence for the scope each user has selected.
///
/// Values are stored verbatim. An empty value is the unset state and reads
/// back as `None`.
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// Get the raw scope string stored for a user
    async fn get_scope(&self, username: &str) -> Result<Option<String>>;

    /// Overwrite the scope stored for a user
    async fn set_scope(&self, username: &str, scope: &str) -> Result<()>;
}

/// In-memory scope store, lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryScopeStore {
    scopes: RwLock<HashMap<String, String>>,
}

impl MemoryScopeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScopeStore for MemoryScopeStore {
    async fn get_scope(&self, username: &str) -> Result<Option<String>> {
        Ok(self
            .scopes
            .read()
            .get(username)
            .filter(|s| !s.is_empty())
            .cloned())
    }

    async fn set_scope(&self, username: &str, scope: &str) -> Result<()> {
        self.scopes
            .write()
            .insert(username.to_string(), scope.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parse() {
        assert_eq!(Scope::parse(""), None);
        assert_eq!(Scope::parse("Global"), Some(Scope::Global));
        assert_eq!(Scope::parse("GLOBAL"), Some(Scope::Global));
        assert_eq!(Scope::parse("user"), Some(Scope::User));
        assert_eq!(
            Scope::parse("libera"),
            Some(Scope::Network("libera".to_string()))
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Global.to_string(), "Global");
        assert_eq!(Scope::User.to_string(), "User");
        assert_eq!(Scope::Network("oftc".into()).to_string(), "oftc");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryScopeStore::new();
        assert_eq!(store.get_scope("alice").await.unwrap(), None);

        store.set_scope("alice", "mynet").await.unwrap();
        assert_eq!(
            store.get_scope("alice").await.unwrap(),
            Some("mynet".to_string())
        );

        store.set_scope("alice", "").await.unwrap();
        assert_eq!(store.get_scope("alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_keyed_by_user() {
        let store = MemoryScopeStore::new();
        store.set_scope("alice", "Global").await.unwrap();
        store.set_scope("bob", "User").await.unwrap();
        store.set_scope("alice", "Global").await.unwrap();

        assert_eq!(
            store.get_scope("alice").await.unwrap(),
            Some("Global".to_string())
        );
        assert_eq!(store.get_scope("bob").await.unwrap(), Some("User".to_string()));
    }
}
