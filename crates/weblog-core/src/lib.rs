//! weblog core - shared types, configuration, scope storage and error handling

pub mod config;
pub mod constants;
pub mod error;
pub mod scope;
pub mod types;

pub use config::*;
pub use constants::*;
pub use error::{logs_path, AccessError, Action, Error, ErrorKind, Result};
pub use scope::{MemoryScopeStore, Scope, ScopeStore};
pub use types::*;
