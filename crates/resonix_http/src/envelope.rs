//! `{success, ...}` response envelopes and error-to-status mapping.

use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use resonix_core::logging::sanitize_log_value;
use resonix_core::{AppEnv, AuthError, ServiceError};
use serde_json::{json, Map, Value};

const MAX_LOGGED_ERROR_CHARS: usize = 240;

/// `{"success": true}` merged with the fields of `fields` (an object).
pub(crate) fn success(fields: Value) -> Response {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    if let Value::Object(fields) = fields {
        body.extend(fields);
    }
    (StatusCode::OK, Json(Value::Object(body))).into_response()
}

pub(crate) fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

#[must_use]
pub(crate) fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidId(_) | ServiceError::Validation(_) | ServiceError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Auth(AuthError::LockedOut { .. }) => StatusCode::TOO_MANY_REQUESTS,
        ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
        ServiceError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a service failure to its envelope.
///
/// Storage failures are logged and answered with `fallback`; the cause is
/// only echoed back in development.
pub(crate) fn service_failure(
    err: &ServiceError,
    action: &str,
    fallback: &str,
    env: AppEnv,
) -> Response {
    let status = status_for(err);
    match err {
        ServiceError::Repo(cause) => {
            let detail = sanitize_log_value(&cause.to_string(), MAX_LOGGED_ERROR_CHARS);
            error!(
                "event=action_failed module=http status=error action={} error={}",
                action, detail
            );
            let mut body = json!({"success": false, "message": fallback});
            if env == AppEnv::Development {
                body["error"] = Value::String(detail);
            }
            (status, Json(body)).into_response()
        }
        ServiceError::Validation(validation) => {
            warn!(
                "event=action_rejected module=http status=error action={} error_code=validation",
                action
            );
            (
                status,
                Json(json!({
                    "success": false,
                    "message": validation.to_string(),
                    "errors": validation.messages,
                })),
            )
                .into_response()
        }
        ServiceError::Auth(AuthError::LockedOut { retry_after_secs }) => {
            let mut resp = failure(status, err.to_string());
            resp.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(*retry_after_secs));
            resp
        }
        _ => failure(status, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::status_for;
    use axum::http::StatusCode;
    use resonix_core::{AuthError, ServiceError, Topic, ValidationError};

    #[test]
    fn status_mapping_follows_error_kind() {
        assert_eq!(
            status_for(&ServiceError::InvalidId(Topic::Events)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ServiceError::Validation(ValidationError::new(vec![]))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ServiceError::NotFound { label: "Event" }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ServiceError::Auth(AuthError::Unauthenticated)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&ServiceError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&ServiceError::Auth(AuthError::LockedOut {
                retry_after_secs: 10
            })),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
