//! Public content actions (`/api`).

use crate::envelope::{failure, service_failure, success};
use crate::{admin_api, run_blocking, AppState};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use log::debug;
use resonix_core::{
    top_limit, ListQuery, MediaKind, PageRequest, RecordId, ServiceError, ServiceResult,
};
use serde_json::{json, Value};
use std::collections::HashMap;

const DEFAULT_TOP_LIMIT: usize = 5;

pub(crate) async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    run_blocking(move || respond(&state, &headers, &params)).await
}

fn respond(state: &AppState, headers: &HeaderMap, params: &HashMap<String, String>) -> Response {
    let Some(action) = params
        .get("action")
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
    else {
        return failure(StatusCode::BAD_REQUEST, "No action specified");
    };
    debug!("event=public_action module=http status=start action={}", action);

    // Dashboard reads share this endpoint but still need a session.
    if let Some(resp) = admin_api::dashboard_read(state, action, headers) {
        return resp;
    }

    match dispatch(state, action, params) {
        Ok(fields) => success(fields),
        Err(err) => service_failure(&err, action, fallback_message(action), state.config.app_env),
    }
}

fn dispatch(
    state: &AppState,
    action: &str,
    params: &HashMap<String, String>,
) -> ServiceResult<Value> {
    let content = &state.content;
    let param = |name: &str| params.get(name).map(String::as_str);
    let page = || PageRequest::from_params(param("page"), param("limit"), &state.config);
    let id = || param("id").and_then(|raw| raw.trim().parse::<RecordId>().ok());

    let fields = match action {
        "get_stats" => json!({"stats": content.stats()?}),
        "get_events" => {
            let query = ListQuery::new(param("filter"), page());
            json!({"events": content.list_events(&query)?})
        }
        "get_event" => json!({"event": content.get_event(id())?}),
        "get_projects" => {
            let query = ListQuery::new(param("filter"), page());
            json!({"projects": content.list_projects(&query)?})
        }
        "get_project" => json!({"project": content.get_project(id())?}),
        "get_team_members" => json!({"members": content.list_team()?}),
        "get_team_member" => json!({"member": content.get_team_member(id())?}),
        "get_news" => {
            let listing = content.list_news(&ListQuery::new(param("filter"), page()))?;
            json!({"featured": listing.featured, "news": listing.items})
        }
        "get_news_article" => json!({"article": content.get_news_article(id())?}),
        "get_blog_posts" => {
            let listing = content.list_blog_posts(&ListQuery::new(param("category"), page()))?;
            json!({"featured": listing.featured, "posts": listing.items})
        }
        "get_blog_post" => json!({"post": content.get_blog_post(id())?}),
        "get_popular_posts" => {
            let limit = top_limit(param("limit"), DEFAULT_TOP_LIMIT, &state.config);
            json!({"posts": content.popular_posts(limit)?})
        }
        "get_top_authors" => {
            let limit = top_limit(param("limit"), DEFAULT_TOP_LIMIT, &state.config);
            json!({"authors": content.top_authors(limit)?})
        }
        "get_gallery" => {
            let kind = MediaKind::from_query(param("type"));
            let query = ListQuery::new(param("filter"), page());
            json!({"items": content.list_gallery(kind, &query)?})
        }
        "get_settings" => {
            json!({"settings": content.settings(state.config.default_settings())?})
        }
        _ => return Err(ServiceError::NotFound { label: "Action" }),
    };
    Ok(fields)
}

/// Generic message for storage failures.
fn fallback_message(action: &str) -> &'static str {
    match action {
        "get_stats" => "Failed to load statistics",
        "get_events" => "Failed to load events",
        "get_event" => "Failed to load event",
        "get_projects" => "Failed to load projects",
        "get_project" => "Failed to load project",
        "get_team_members" => "Failed to load team members",
        "get_team_member" => "Failed to load team member",
        "get_news" => "Failed to load news",
        "get_news_article" => "Failed to load news article",
        "get_blog_posts" => "Failed to load blog posts",
        "get_blog_post" => "Failed to load blog post",
        "get_popular_posts" => "Failed to load popular posts",
        "get_top_authors" => "Failed to load top authors",
        "get_gallery" => "Failed to load gallery",
        "get_settings" => "Failed to load settings",
        _ => "Internal server error",
    }
}
