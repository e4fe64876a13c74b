//! Admin actions (`/admin`): login, session checks, dashboard reads, and mutations.

use crate::cookies::{self, RequestTokens};
use crate::envelope::{failure, service_failure, success};
use crate::{run_blocking, AppState};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use chrono::{Local, Utc};
use log::{debug, warn};
use resonix_core::{
    parse_record_id, AdminService, BlogPost, Event, GalleryItem, Member, NewsArticle, Project,
    Record, RecordId, ServiceError, ServiceResult,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

type Input = Map<String, Value>;

pub(crate) async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    run_blocking(move || respond(&state, &headers, &params, &body)).await
}

fn respond(
    state: &AppState,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    body: &[u8],
) -> Response {
    let input = parse_input(body);
    let action = input
        .get("action")
        .and_then(Value::as_str)
        .or_else(|| params.get("action").map(String::as_str))
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let Some(action) = action else {
        return failure(StatusCode::BAD_REQUEST, "No action specified");
    };
    debug!("event=admin_action module=http status=start action={}", action);

    match action {
        "login" => login(state, &input),
        "logout" => logout(state, headers),
        "check_auth" => check_auth(state, headers),
        _ => {
            if let Some(resp) = dashboard_read(state, action, headers) {
                return resp;
            }
            let Some(fallback) = mutation_fallback(action) else {
                return failure(StatusCode::NOT_FOUND, "Action not found");
            };
            let raw_id = input
                .get("id")
                .cloned()
                .or_else(|| params.get("id").map(|raw| Value::String(raw.clone())));
            let id = parse_record_id(raw_id.as_ref());
            authorized(state, headers, action, fallback, |user| {
                mutate(&state.admin, action, &input, id, user)
            })
        }
    }
}

/// Runs a dashboard read if `action` names one. Requires a session.
pub(crate) fn dashboard_read(
    state: &AppState,
    action: &str,
    headers: &HeaderMap,
) -> Option<Response> {
    let fallback = match action {
        "get_admin_stats" => "Failed to load admin statistics",
        "get_recent_activities" => "Failed to load recent activities",
        "get_admin_events" => "Failed to load admin events",
        "get_admin_projects" => "Failed to load admin projects",
        "get_admin_team_members" => "Failed to load admin team members",
        "get_admin_news" => "Failed to load admin news",
        "get_admin_blog_posts" => "Failed to load admin blog posts",
        "get_admin_gallery" => "Failed to load admin gallery",
        _ => return None,
    };
    Some(authorized(state, headers, action, fallback, |_| {
        read_dashboard(&state.admin, action)
    }))
}

fn read_dashboard(admin: &AdminService, action: &str) -> ServiceResult<Value> {
    let fields = match action {
        "get_admin_stats" => json!({"stats": admin.stats(Local::now().date_naive())?}),
        "get_recent_activities" => json!({"activities": admin.recent_activities()}),
        "get_admin_events" => json!({"events": admin.list_events()?}),
        "get_admin_projects" => json!({"projects": admin.list_all::<Project>()?}),
        "get_admin_team_members" => json!({"members": admin.list_all::<Member>()?}),
        "get_admin_news" => json!({"news": admin.list_all::<NewsArticle>()?}),
        "get_admin_blog_posts" => json!({"posts": admin.list_all::<BlogPost>()?}),
        "get_admin_gallery" => json!({"items": admin.list_all::<GalleryItem>()?}),
        _ => return Err(ServiceError::NotFound { label: "Action" }),
    };
    Ok(fields)
}

fn mutate(
    admin: &AdminService,
    action: &str,
    input: &Input,
    id: Option<RecordId>,
    user: &str,
) -> ServiceResult<Value> {
    match action {
        "delete_event" => deleted::<Event>(admin, id, user, "Event deleted successfully"),
        "delete_project" => deleted::<Project>(admin, id, user, "Project deleted successfully"),
        "delete_member" => deleted::<Member>(admin, id, user, "Member deleted successfully"),
        "delete_news" => deleted::<NewsArticle>(admin, id, user, "News deleted successfully"),
        "delete_blog" => deleted::<BlogPost>(admin, id, user, "Blog post deleted successfully"),
        "delete_gallery" => {
            deleted::<GalleryItem>(admin, id, user, "Gallery item deleted successfully")
        }
        "approve_project" => {
            let project = admin.approve_project(id, user)?;
            Ok(json!({"message": "Project approved successfully", "project": project}))
        }
        "save_settings" => {
            let kind = input.get("type").and_then(Value::as_str).unwrap_or_default();
            let settings = input.get("settings").cloned().unwrap_or(Value::Null);
            let merged = admin.save_settings(kind, settings, user)?;
            Ok(json!({"message": "Settings saved successfully", "settings": merged}))
        }
        "create_event" => created::<Event>(admin, input, user, "event"),
        "update_event" => updated::<Event>(admin, id, input, user, "event"),
        "create_project" => created::<Project>(admin, input, user, "project"),
        "update_project" => updated::<Project>(admin, id, input, user, "project"),
        "create_member" => created::<Member>(admin, input, user, "member"),
        "update_member" => updated::<Member>(admin, id, input, user, "member"),
        "create_news" => created::<NewsArticle>(admin, input, user, "article"),
        "update_news" => updated::<NewsArticle>(admin, id, input, user, "article"),
        "create_blog" => created::<BlogPost>(admin, input, user, "post"),
        "update_blog" => updated::<BlogPost>(admin, id, input, user, "post"),
        "create_gallery" => created::<GalleryItem>(admin, input, user, "item"),
        "update_gallery" => updated::<GalleryItem>(admin, id, input, user, "item"),
        _ => Err(ServiceError::NotFound { label: "Action" }),
    }
}

fn deleted<T: Record>(
    admin: &AdminService,
    id: Option<RecordId>,
    user: &str,
    message: &str,
) -> ServiceResult<Value> {
    admin.delete::<T>(id, user)?;
    Ok(json!({"message": message}))
}

fn created<T: Record>(
    admin: &AdminService,
    input: &Input,
    user: &str,
    key: &str,
) -> ServiceResult<Value> {
    let record = admin.create::<T>(record_payload(input), user)?;
    Ok(json!({
        "message": format!("{} created successfully", T::LABEL),
        key: record,
    }))
}

fn updated<T: Record>(
    admin: &AdminService,
    id: Option<RecordId>,
    input: &Input,
    user: &str,
    key: &str,
) -> ServiceResult<Value> {
    let record = admin.update::<T>(id, record_payload(input), user)?;
    Ok(json!({
        "message": format!("{} updated successfully", T::LABEL),
        key: record,
    }))
}

/// Record fields come from `data` when present, else from the body minus routing keys.
fn record_payload(input: &Input) -> Value {
    if let Some(Value::Object(data)) = input.get("data") {
        let mut fields = data.clone();
        fields.remove("id");
        return Value::Object(fields);
    }
    let mut fields = input.clone();
    fields.remove("action");
    fields.remove("id");
    Value::Object(fields)
}

fn mutation_fallback(action: &str) -> Option<&'static str> {
    let message = match action {
        "delete_event" => "Failed to delete event",
        "delete_project" => "Failed to delete project",
        "approve_project" => "Failed to approve project",
        "delete_member" => "Failed to delete member",
        "delete_news" => "Failed to delete news",
        "delete_blog" => "Failed to delete blog post",
        "delete_gallery" => "Failed to delete gallery item",
        "save_settings" => "Failed to save settings",
        "create_event" => "Failed to create event",
        "update_event" => "Failed to update event",
        "create_project" => "Failed to create project",
        "update_project" => "Failed to update project",
        "create_member" => "Failed to create member",
        "update_member" => "Failed to update member",
        "create_news" => "Failed to create news",
        "update_news" => "Failed to update news",
        "create_blog" => "Failed to create blog post",
        "update_blog" => "Failed to update blog post",
        "create_gallery" => "Failed to create gallery item",
        "update_gallery" => "Failed to update gallery item",
        _ => return None,
    };
    Some(message)
}

/// Resolves the caller's session, runs `run` as that user, and refreshes the
/// session cookie when it was re-minted from a remember token.
fn authorized(
    state: &AppState,
    headers: &HeaderMap,
    action: &str,
    fallback: &str,
    run: impl FnOnce(&str) -> ServiceResult<Value>,
) -> Response {
    let tokens = RequestTokens::from_headers(headers);
    let check = match state
        .sessions
        .require(tokens.session, tokens.remember, Utc::now())
    {
        Ok(check) => check,
        Err(err) => {
            warn!(
                "event=admin_action module=http status=error action={} error_code=unauthenticated",
                action
            );
            return failure(StatusCode::UNAUTHORIZED, err.to_string());
        }
    };

    let mut resp = match run(&check.user.username) {
        Ok(fields) => success(fields),
        Err(err) => service_failure(&err, action, fallback, state.config.app_env),
    };
    if check.reissued {
        cookies::set_session(resp.headers_mut(), check.session, state.config.app_env);
    }
    resp
}

fn login(state: &AppState, input: &Input) -> Response {
    let username = input
        .get("username")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    let password = input
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let remember = input.get("remember").is_some_and(is_truthy);

    match state.sessions.login(username, password, remember, Utc::now()) {
        Ok(outcome) => {
            let mut resp = success(json!({
                "message": "Login successful",
                "user": {
                    "username": outcome.user.username,
                    "name": outcome.user.name,
                },
            }));
            cookies::set_session(resp.headers_mut(), outcome.session, state.config.app_env);
            if let Some(token) = outcome.remember {
                let max_age = state.sessions.policy().remember_ttl.num_seconds();
                cookies::set_remember(resp.headers_mut(), token, max_age, state.config.app_env);
            }
            resp
        }
        Err(err) => service_failure(
            &ServiceError::from(err),
            "login",
            "Login failed",
            state.config.app_env,
        ),
    }
}

fn logout(state: &AppState, headers: &HeaderMap) -> Response {
    let tokens = RequestTokens::from_headers(headers);
    state.sessions.logout(tokens.session, tokens.remember);
    let mut resp = success(json!({"message": "Logged out successfully"}));
    cookies::clear_all(resp.headers_mut(), state.config.app_env);
    resp
}

fn check_auth(state: &AppState, headers: &HeaderMap) -> Response {
    let tokens = RequestTokens::from_headers(headers);
    match state
        .sessions
        .check(tokens.session, tokens.remember, Utc::now())
    {
        Some(check) => {
            let mut resp = success(json!({"authenticated": true, "user": check.user}));
            if check.reissued {
                cookies::set_session(resp.headers_mut(), check.session, state.config.app_env);
            }
            resp
        }
        None => success(json!({"authenticated": false})),
    }
}

/// Body JSON object, or empty when the body is absent or not an object.
fn parse_input(body: &[u8]) -> Input {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Input::new(),
    }
}

/// Form-style truthiness for the `remember` flag.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}
