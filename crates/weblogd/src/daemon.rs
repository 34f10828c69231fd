//! Daemon setup: configuration, scope database and web server

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use weblog_core::{constants, Config, Error, Result};
use weblog_db::Database;

use crate::cli::Cli;

/// Resolve the configuration from CLI arguments.
///
/// An explicit `--config` must load. Otherwise the working directory and the
/// weblog home are searched, and a bare `--root` is enough to run.
pub fn load_config(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, path) = match &cli.config {
        Some(path) => (Config::load(path)?, Some(path.clone())),
        None => {
            let mut dirs = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                dirs.push(cwd);
            }
            dirs.push(constants::weblog_home());

            match Config::find_and_load(&dirs) {
                Ok((config, path)) => (config, Some(path)),
                Err(e) => match &cli.root {
                    Some(root) => (Config::new(root), None),
                    None => return Err(e),
                },
            }
        }
    };

    if let Some(root) = &cli.root {
        if !root.is_absolute() {
            return Err(Error::config(format!(
                "root must be an absolute path, got {}",
                root.display()
            )));
        }
        config.set_root(root);
    }
    if let Some(bind) = &cli.bind {
        config.bind = bind.clone();
    }

    Ok((config, path))
}

/// Main daemon struct
pub struct Daemon {
    config: Arc<Config>,
    db: Database,
}

impl Daemon {
    /// Open the scope database for a config
    pub async fn new(config: Config) -> Result<Self> {
        if !config.root.is_dir() {
            warn!(
                "Installation root {} does not exist, every listing will be empty",
                config.root.display()
            );
        }

        let db_path = config.database_path();
        let db = Database::new(&db_path).await?;
        let stored = db.scopes().count().await?;
        info!(
            "Scope database at {} ({} users)",
            db_path.display(),
            stored
        );

        Ok(Self {
            config: Arc::new(config),
            db,
        })
    }

    /// Serve until `shutdown` resolves
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        info!("Serving logs under {}", self.config.root.display());

        let store = Arc::new(self.db.scopes());
        weblog_web::start_server(Arc::clone(&self.config), store, shutdown).await?;

        self.db.close().await;
        Ok(())
    }
}
