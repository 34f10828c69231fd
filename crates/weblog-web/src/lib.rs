//! weblog Web Server
//!
//! Serves the log browser pages for users authenticated by a fronting proxy.

use axum::{
    extract::{Path, Query, Request as AxumRequest, State},
    http::{header::HeaderValue, HeaderMap, HeaderName, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response as AxumResponse},
    routing::get,
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use weblog_access::{Browser, PageKind, PageRequest};
use weblog_core::{Config, Download, ScopeStore};

/// API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    browser: Browser,
    user_header: HeaderName,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<dyn ScopeStore>) -> Self {
        let user_header = HeaderName::from_bytes(config.user_header.as_bytes()).unwrap_or_else(|_| {
            warn!(
                "Invalid user header {:?}, falling back to {}",
                config.user_header,
                weblog_core::DEFAULT_USER_HEADER
            );
            HeaderName::from_static("x-remote-user")
        });

        Self {
            browser: Browser::new(config, store),
            user_header,
        }
    }
}

/// Username of the logged-in user, as asserted by the fronting proxy
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Query parameters accepted by every page
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub dir: Option<String>,
    pub scope: Option<String>,
}

/// Login-required middleware: reject requests without a user
async fn require_user(
    State(state): State<AppState>,
    mut request: AxumRequest,
    next: Next,
) -> AxumResponse {
    let username = request
        .headers()
        .get(&state.user_header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    match username {
        Some(username) => {
            request.extensions_mut().insert(CurrentUser(username));
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::err("Login required")),
        )
            .into_response(),
    }
}

/// Create the router
pub fn create_router(state: AppState) -> Router {
    create_router_with_cors(state, None)
}

/// Create the router with custom CORS origin
pub fn create_router_with_cors(state: AppState, cors_origin: Option<String>) -> Router {
    let default_origin = HeaderValue::from_static("http://localhost:3000");
    let origin = match cors_origin {
        Some(origin) => origin.parse::<HeaderValue>().unwrap_or_else(|_| {
            warn!("Invalid CORS origin {:?}, using default", origin);
            default_origin
        }),
        None => default_origin,
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    // Every log page requires a logged-in user
    let protected_routes = Router::new()
        .route("/", get(index_page))
        .route("/:page", get(named_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let public_routes = Router::new().route("/api/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server, stopping when `shutdown` resolves
pub async fn start_server(
    config: Arc<Config>,
    store: Arc<dyn ScopeStore>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let bind_addr = config.bind.clone();
    let cors_origin = config.cors_origin.clone();
    let state = AppState::new(config, store);
    let app = create_router_with_cors(state, cors_origin);

    info!("Starting weblog on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

// === Handlers ===

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

async fn index_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PageParams>,
) -> AxumResponse {
    render_page(&state, &user, "index", params).await
}

async fn named_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(page): Path<String>,
    Query(params): Query<PageParams>,
) -> AxumResponse {
    render_page(&state, &user, &page, params).await
}

async fn render_page(
    state: &AppState,
    user: &CurrentUser,
    page_name: &str,
    params: PageParams,
) -> AxumResponse {
    let Some(kind) = PageKind::parse(page_name) else {
        debug!("Unknown page {:?}", page_name);
        let page = state.browser.scopes_only(&user.0).await;
        return (StatusCode::NOT_FOUND, Json(ApiResponse::ok(page))).into_response();
    };

    let mut request = PageRequest::new(kind, params.dir.unwrap_or_default());
    request.scope = params.scope;

    let outcome = state.browser.handle(&user.0, request).await;
    match outcome.download {
        Some(download) => download_response(download),
        None => Json(ApiResponse::ok(outcome.page)).into_response(),
    }
}

/// Attachment response carrying the download headers.
///
/// Content-Length is only passed through when it matches the body, the
/// stat size is larger whenever newlines were stripped.
fn download_response(download: Download) -> AxumResponse {
    let body_len = download.content.len().to_string();
    let mut headers = HeaderMap::new();

    for (name, value) in download.meta.headers() {
        if name.eq_ignore_ascii_case("content-length") && value != body_len {
            debug!("Stat size {} differs from body size {}", value, body_len);
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Skipping invalid header {}: {:?}", name, value),
        }
    }

    (StatusCode::OK, headers, download.content).into_response()
}
