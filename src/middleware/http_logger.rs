use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Instant;

use crate::error::AppError;
use crate::state::AppState;

const SENSITIVE_FIELDS: [&str; 8] = [
    "password",
    "newpassword",
    "token",
    "accesstoken",
    "access_token",
    "authorization",
    "secret",
    "credentials",
];

const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "cookie", "x-api-key", "x-auth-token"];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/")
}

fn filter_sensitive_data(mut value: Value) -> Value {
    match &mut value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SENSITIVE_FIELDS.contains(&key.to_ascii_lowercase().as_str()) {
                    *field = Value::String("[REDACTED]".to_string());
                } else {
                    *field = filter_sensitive_data(field.take());
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                *item = filter_sensitive_data(item.take());
            }
        }
        _ => {}
    }
    value
}

fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered_headers = headers.clone();

    for header_name in SENSITIVE_HEADERS {
        if filtered_headers.contains_key(header_name) {
            filtered_headers.insert(header_name, HeaderValue::from_static("[REDACTED]"));
        }
    }

    filtered_headers
}

fn json_or_empty(bytes: &Bytes) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(json) => filter_sensitive_data(json),
        Err(_) => Value::Object(serde_json::Map::new()),
    }
}

pub async fn http_logger(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, AppError> {
    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path();
    let version = req.version();
    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if should_ignore_path(path) || method == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let (parts, body) = req.into_parts();
    let bytes = buffer_body("request", body).await?;
    let req_body = json_or_empty(&bytes);

    let req = Request::from_parts(parts, Body::from(bytes));

    let mut response = next.run(req).await;

    let latency = start_time.elapsed();

    let status = response.status();
    let res_headers = response.headers().clone();

    let should_log_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
    let res_body = if should_log_body {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let json_body = json_or_empty(&bytes);
        response = Response::from_parts(parts, Body::from(bytes));
        json_body
    } else {
        Value::Object(serde_json::Map::new())
    };

    let filtered_req_headers = filter_sensitive_headers(&req_headers);
    let filtered_res_headers = filter_sensitive_headers(&res_headers);

    tracing::info!(
        method = ?method,
        uri = ?uri,
        path = %path,
        x_request_id = %x_request_id,
        version = ?version,
        req_headers = ?filtered_req_headers,
        req_body = %req_body,
        status = ?status,
        latency_ms = latency.as_millis(),
        res_headers = ?filtered_res_headers,
        res_body = %res_body,
        app_env = %state.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

pub async fn buffer_body<B>(direction: &str, body: B) -> Result<Bytes, AppError>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => Err(AppError::bad_request(format!(
            "failed to read {direction} body: {err}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passwords_are_redacted_at_any_depth() {
        let body = json!({
            "email": "principal@test.com",
            "password": "password123",
            "profile": { "accessToken": "abc" },
            "items": [{ "secret": "x", "name": "ok" }]
        });

        let filtered = filter_sensitive_data(body);

        assert_eq!(filtered["email"], "principal@test.com");
        assert_eq!(filtered["password"], "[REDACTED]");
        assert_eq!(filtered["profile"]["accessToken"], "[REDACTED]");
        assert_eq!(filtered["items"][0]["secret"], "[REDACTED]");
        assert_eq!(filtered["items"][0]["name"], "ok");
    }

    #[test]
    fn authorization_header_is_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let filtered = filter_sensitive_headers(&headers);

        assert_eq!(filtered["authorization"], "[REDACTED]");
        assert_eq!(filtered["accept"], "application/json");
    }

    #[test]
    fn non_json_body_logs_as_empty_object() {
        let value = json_or_empty(&Bytes::from_static(b"not json"));
        assert_eq!(value, json!({}));
    }
}
