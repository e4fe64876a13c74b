//! Session and remember-me cookies.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use resonix_core::{AppEnv, Token};

pub const SESSION_COOKIE: &str = "resonix_session";
pub const REMEMBER_COOKIE: &str = "resonix_remember";

/// Tokens carried by one request.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RequestTokens {
    pub session: Option<Token>,
    pub remember: Option<Token>,
}

impl RequestTokens {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            session: cookie_value(headers, SESSION_COOKIE).and_then(|value| Token::parse(&value)),
            remember: cookie_value(headers, REMEMBER_COOKIE).and_then(|value| Token::parse(&value)),
        }
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// Shared attributes. Outside development the cookies are HTTPS-only.
fn attributes(env: AppEnv) -> &'static str {
    match env {
        AppEnv::Development => "Path=/; HttpOnly; SameSite=Lax",
        AppEnv::Production => "Path=/; HttpOnly; SameSite=Lax; Secure",
    }
}

pub(crate) fn set_session(headers: &mut HeaderMap, token: Token, env: AppEnv) {
    append(headers, format!("{SESSION_COOKIE}={token}; {}", attributes(env)));
}

pub(crate) fn set_remember(headers: &mut HeaderMap, token: Token, max_age_secs: i64, env: AppEnv) {
    append(
        headers,
        format!("{REMEMBER_COOKIE}={token}; {}; Max-Age={max_age_secs}", attributes(env)),
    );
}

pub(crate) fn clear_all(headers: &mut HeaderMap, env: AppEnv) {
    for name in [SESSION_COOKIE, REMEMBER_COOKIE] {
        append(headers, format!("{name}=; {}; Max-Age=0", attributes(env)));
    }
}

fn append(headers: &mut HeaderMap, cookie: String) {
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(SET_COOKIE, value);
    }
}
