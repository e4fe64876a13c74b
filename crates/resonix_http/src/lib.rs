//! HTTP surface for the Resonix Society site.
//!
//! # Responsibility
//! - Route public and admin action requests to the core services.
//! - Wrap every outcome in the `{success, ...}` JSON envelope.
//! - Apply the CORS allow-list and answer preflight requests.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use envelope::failure;
use log::error;
use resonix_core::{AdminService, ContentService, JsonStore, SessionManager, SiteConfig};
use serde_json::json;
use std::sync::Arc;

mod admin_api;
mod cookies;
mod envelope;
mod public_api;

pub use cookies::{REMEMBER_COOKIE, SESSION_COOKIE};

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub content: Arc<ContentService>,
    pub admin: Arc<AdminService>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(store: Arc<JsonStore>, config: SiteConfig) -> Self {
        Self {
            content: Arc::new(ContentService::new(Arc::clone(&store))),
            admin: Arc::new(AdminService::new(store)),
            sessions: Arc::new(SessionManager::from_config(&config)),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api", get(public_api::handle).post(public_api::handle))
        .route("/php/api.php", get(public_api::handle).post(public_api::handle))
        .route("/admin", get(admin_api::handle).post(admin_api::handle))
        .route(
            "/php/admin_handler.php",
            get(admin_api::handle).post(admin_api::handle),
        )
        .layer(middleware::from_fn_with_state(state.clone(), cors_middleware))
        .with_state(state)
}

/// Runs a synchronous handler body on the blocking pool.
///
/// Store calls do file I/O under `std` mutexes and must stay off the async workers.
async fn run_blocking(work: impl FnOnce() -> Response + Send + 'static) -> Response {
    match tokio::task::spawn_blocking(work).await {
        Ok(resp) => resp,
        Err(err) => {
            error!(
                "event=handler_join module=http status=error error_code=blocking_task_failed error={}",
                err
            );
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

async fn healthz_handler() -> Response {
    Json(json!({"status": "ok", "version": resonix_core::core_version()})).into_response()
}

async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|origin| state.config.is_origin_allowed(origin));

    let mut resp = if *req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };
    apply_cors_headers(resp.headers_mut(), origin.as_deref());
    resp
}

fn apply_cors_headers(headers: &mut HeaderMap, allowed_origin: Option<&str>) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    if let Some(origin) = allowed_origin {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
            headers.insert(VARY, HeaderValue::from_static("Origin"));
        }
    }
}
