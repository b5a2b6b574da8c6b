use http::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// A fully buffered request as handed to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path including query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Raw body text; empty when there is none
    pub body: String,
}

impl ParsedRequest {
    /// Request without headers or body
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// Add a header; the name is lower-cased
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set a JSON body and its content type
    #[must_use]
    pub fn with_json(self, body: &Value) -> Self {
        let mut req = self.with_header("content-type", "application/json");
        req.body = body.to_string();
        req
    }

    /// Set a raw body (content type must be added separately)
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Body decoding failure; rendered as a 400 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No decoder for the request's content type
    UnsupportedContentType {
        /// Content type as sent, or `None` when the header was missing
        content_type: Option<String>,
    },
    /// JSON body that does not parse
    InvalidJson {
        /// Parser message
        reason: String,
    },
    /// JSON body that parses but is not an object
    NotAnObject,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnsupportedContentType {
                content_type: Some(ct),
            } => write!(f, "Unsupported content type '{ct}'"),
            RequestError::UnsupportedContentType { content_type: None } => {
                write!(f, "Unsupported content type: missing content-type header")
            }
            RequestError::InvalidJson { reason } => write!(f, "Invalid JSON body: {reason}"),
            RequestError::NotAnObject => write!(f, "JSON body must be an object"),
        }
    }
}

impl std::error::Error for RequestError {}

/// Split `/users?limit=10` into `("/users", "limit=10")`.
#[must_use]
pub fn split_path(raw: &str) -> (&str, &str) {
    match raw.split_once('?') {
        Some((path, query)) => (path, query),
        None => (raw, ""),
    }
}

/// Parse a query string into string-valued parameters.
///
/// Names and values are URL-decoded. A repeated name keeps its last value.
#[must_use]
pub fn parse_query_params(query: &str) -> Map<String, Value> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

/// Decode a request body according to its content type.
///
/// * `application/json` → the top-level object
/// * `application/x-www-form-urlencoded` → string-valued fields
///
/// # Errors
///
/// [`RequestError`] for any other content type, malformed JSON, or a JSON
/// body that is not an object.
pub fn parse_body(content_type: Option<&str>, body: &str) -> Result<Map<String, Value>, RequestError> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match mime.as_deref() {
        Some("application/json") => {
            match serde_json::from_str::<Value>(body) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Err(RequestError::NotAnObject),
                Err(e) => Err(RequestError::InvalidJson {
                    reason: e.to_string(),
                }),
            }
        }
        Some("application/x-www-form-urlencoded") => Ok(parse_query_params(body)),
        _ => Err(RequestError::UnsupportedContentType {
            content_type: content_type.map(ToString::to_string),
        }),
    }
}
