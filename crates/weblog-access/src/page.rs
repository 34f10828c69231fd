//! Page requests: scope handling, dispatch and page assembly

use std::sync::Arc;
use tracing::{debug, warn};
use weblog_core::{
    AccessError, Config, Download, Page, Scope, ScopeOption, ScopeStore, ViewMode,
    SCOPE_GLOBAL, SCOPE_USER,
};

use crate::accessor::LogAccessor;
use crate::breadcrumbs;
use crate::resolver::PathResolver;

/// Message shown after a scope change
pub const SCOPE_SET_MESSAGE: &str = "Scope successfully set.";

/// Pages served by the log browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Index,
    Log,
    Raw,
    Download,
}

impl PageKind {
    /// Parse a page name, case-insensitively. An empty name is the index.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "" | "index" => Some(PageKind::Index),
            "log" => Some(PageKind::Log),
            "raw" => Some(PageKind::Raw),
            "download" => Some(PageKind::Download),
            _ => None,
        }
    }
}

/// A parsed page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: PageKind,
    /// Requested path relative to the scope's base
    pub dir: String,
    /// Scope to select first, only honoured on the index page
    pub scope: Option<String>,
}

impl PageRequest {
    pub fn new(kind: PageKind, dir: impl Into<String>) -> Self {
        Self {
            kind,
            dir: dir.into(),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Result of handling a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: Page,
    /// Set when a download succeeded
    pub download: Option<Download>,
}

/// Serves page requests for logged-in users
#[derive(Clone)]
pub struct Browser {
    config: Arc<Config>,
    store: Arc<dyn ScopeStore>,
    accessor: LogAccessor,
}

impl Browser {
    pub fn new(config: Arc<Config>, store: Arc<dyn ScopeStore>) -> Self {
        let accessor = LogAccessor::new(PathResolver::from_config(&config));
        Self {
            config,
            store,
            accessor,
        }
    }

    /// Handle one page request for `username`
    pub async fn handle(&self, username: &str, request: PageRequest) -> PageOutcome {
        let mut page = Page::new();
        let mut download = None;

        if request.kind == PageKind::Index {
            if let Some(scope) = request.scope.as_deref().filter(|s| !s.is_empty()) {
                match self.store.set_scope(username, scope).await {
                    Ok(()) => page.push_message(SCOPE_SET_MESSAGE),
                    Err(e) => {
                        warn!("Failed to store scope for {}: {}", username, e);
                        page.push_error(&AccessError::ScopeUnavailable(e.to_string()));
                    }
                }
            }
        }

        let stored = self.load_scope(username, &mut page).await;

        match stored.as_deref().and_then(Scope::parse) {
            None => {
                page.no_scope = true;
                if page.errors.is_empty() {
                    page.push_error(&AccessError::NoScope);
                }
            }
            Some(scope) => {
                debug!("{} requested {:?} {:?} in {}", username, request.kind, request.dir, scope);
                download = self.dispatch(username, scope, &request, &mut page).await;
            }
        }

        page.scopes = self.scope_options(username, stored.as_deref());
        PageOutcome { page, download }
    }

    /// Page carrying only the scope selector, for unknown pages
    pub async fn scopes_only(&self, username: &str) -> Page {
        let mut page = Page::new();
        let stored = self.load_scope(username, &mut page).await;
        page.no_scope = stored.is_none();
        page.scopes = self.scope_options(username, stored.as_deref());
        page
    }

    /// Selectable scopes: the user's networks, then Global and User
    pub fn scope_options(&self, username: &str, active: Option<&str>) -> Vec<ScopeOption> {
        let mut names = match self.config.networks_for(username) {
            Some(networks) => networks.to_vec(),
            None => self.accessor.resolver().discover_networks(username),
        };
        names.push(SCOPE_GLOBAL.to_string());
        names.push(SCOPE_USER.to_string());

        names
            .into_iter()
            .map(|name| ScopeOption {
                active: active == Some(name.as_str()),
                name,
            })
            .collect()
    }

    async fn load_scope(&self, username: &str, page: &mut Page) -> Option<String> {
        match self.store.get_scope(username).await {
            Ok(scope) => scope,
            Err(e) => {
                warn!("Failed to load scope for {}: {}", username, e);
                page.push_error(&AccessError::ScopeUnavailable(e.to_string()));
                None
            }
        }
    }

    async fn dispatch(
        &self,
        username: &str,
        scope: Scope,
        request: &PageRequest,
        page: &mut Page,
    ) -> Option<Download> {
        let accessor = self.accessor.clone();
        let user = username.to_string();
        let dir = request.dir.clone();

        match request.kind {
            PageKind::Index => {
                let result = run_blocking(move || accessor.list(&user, &scope, &dir)).await;
                page.breadcrumbs = breadcrumbs::build(&request.dir, false);
                match result {
                    Ok(rows) => page.listing = rows,
                    Err(e) => page.push_error(&e),
                }
                None
            }
            PageKind::Log | PageKind::Raw => {
                let mode = if request.kind == PageKind::Raw {
                    ViewMode::Raw
                } else {
                    ViewMode::Rendered
                };
                match run_blocking(move || accessor.view(&user, &scope, &dir, mode)).await {
                    Ok(view) => {
                        page.log = Some(view.log);
                        page.breadcrumbs = view.breadcrumbs;
                    }
                    Err(e) => page.push_error(&e),
                }
                None
            }
            PageKind::Download => {
                match run_blocking(move || accessor.download(&user, &scope, &dir)).await {
                    Ok(download) => Some(download),
                    Err(e) => {
                        page.push_error(&e);
                        None
                    }
                }
            }
        }
    }
}

/// Run filesystem work on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T, AccessError>
where
    F: FnOnce() -> Result<T, AccessError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AccessError::Internal(e.to_string()))?
}
