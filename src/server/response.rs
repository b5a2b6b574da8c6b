use serde_json::Value;
use std::io::Cursor;
use tiny_http::{Header, Response};
use tracing::warn;

use crate::dispatcher::HandlerResponse;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Convert a handler response into a `tiny_http` response.
///
/// Strings are sent as `text/plain`, `Null` bodies are empty and everything
/// else is serialised as JSON. Headers that are not valid HTTP header bytes
/// are dropped with a warning.
pub fn build_response(res: HandlerResponse) -> Response<Cursor<Vec<u8>>> {
    let HandlerResponse {
        status,
        headers,
        body,
    } = res;

    let (bytes, default_type) = match body {
        Value::Null => (Vec::new(), None),
        Value::String(s) => (s.into_bytes(), Some("text/plain; charset=utf-8")),
        other => (other.to_string().into_bytes(), Some("application/json")),
    };

    let mut response = Response::from_data(bytes).with_status_code(status);
    let has_content_type = headers
        .iter()
        .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));
    if let (false, Some(ct)) = (has_content_type, default_type) {
        response = add_header(response, "content-type", ct);
    }
    for (name, value) in &headers {
        response = add_header(response, name, value);
    }
    response
}

fn add_header(
    response: Response<Cursor<Vec<u8>>>,
    name: &str,
    value: &str,
) -> Response<Cursor<Vec<u8>>> {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => {
            warn!(header = %name, "Dropping invalid response header");
            response
        }
    }
}
