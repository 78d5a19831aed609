use axum::{
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, GENERIC_FAILURE},
    response::{JsonApiResponse, log_app_error},
};

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Rewrites non-JSON error responses (extractor rejections, unknown routes,
/// bare status codes) into the `{success:false,message}` envelope.
///
/// The original status is kept. Server-error bodies are logged and replaced
/// with the generic message so framework internals never reach the client.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();

    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }
    if is_json_response(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let detail = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => body_bytes_to_message(status, bytes),
        Err(_) => default_message(status),
    };
    let rewritten = rewrite_error(status, detail);
    if let Some(cause) = &rewritten.logged_cause {
        log_app_error(&AppError::internal(cause.clone()), status);
    }

    let mut new_response =
        JsonApiResponse::failure(status, rewritten.client_message).into_response();
    copy_headers(&parts.headers, &mut new_response);
    new_response
}

#[derive(Debug, PartialEq, Eq)]
struct RewrittenError {
    client_message: String,
    logged_cause: Option<String>,
}

fn rewrite_error(status: StatusCode, detail: String) -> RewrittenError {
    if status.is_server_error() {
        RewrittenError {
            client_message: GENERIC_FAILURE.to_string(),
            logged_cause: Some(detail),
        }
    } else {
        RewrittenError {
            client_message: detail,
            logged_cause: None,
        }
    }
}

fn is_json_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("application/json") || value.contains("+json")
        })
        .unwrap_or(false)
}

fn body_bytes_to_message(status: StatusCode, bytes: Bytes) -> String {
    let message = String::from_utf8_lossy(&bytes).trim().to_string();
    if message.is_empty() {
        return default_message(status);
    }
    message
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

fn copy_headers(src: &HeaderMap, dest: &mut Response) {
    for (name, value) in src {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        dest.headers_mut().insert(name.clone(), value.clone());
    }
}
