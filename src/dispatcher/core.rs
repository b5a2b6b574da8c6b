//! Dispatcher core module - request handling from raw request to response.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::cors::CorsConfig;
use crate::ids::RequestId;
use crate::params::{self, ValidationError};
use crate::resource::Resource;
use crate::router::{ParamVec, Router};
use crate::server::request::{parse_body, parse_query_params, split_path, ParsedRequest};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for responses
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// How the dispatcher reports parameter validation failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Stop at the first failing parameter and render that single error
    #[default]
    FirstFailure,
    /// Check every parameter and render `{"errors": [...]}`
    CollectAll,
}

/// Request data handed to a resource handler
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Pattern of the route that matched
    pub route_pattern: String,
    /// Path parameters extracted from the URL, as captured strings
    pub path_params: ParamVec,
    /// Parameters after validation, or the raw merged input when the
    /// handler has no schema
    pub params: Map<String, Value>,
    /// HTTP headers (lower-cased names)
    pub headers: HashMap<String, String>,
}

impl HandlerRequest {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a validated parameter by its output name
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response produced by a handler or by the dispatcher itself
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON; `Null` with 204 is sent without a body
    pub body: Value,
}

impl HandlerResponse {
    /// Create a new response with the given status, headers, and body
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with default headers
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// 200 with a JSON body
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    /// 204 without a body
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(204, HeaderVec::new(), Value::Null)
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Failure returned by a handler; rendered as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    /// HTTP status code
    pub status: u16,
    /// Message placed in the error body
    pub message: String,
}

impl HandlerError {
    /// Error with an explicit status code
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    /// 404 Not Found
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    /// 500 Internal Server Error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// Render as a JSON error response
    #[must_use]
    pub fn into_response(self) -> HandlerResponse {
        HandlerResponse::error(self.status, &self.message)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

/// Outcome of a handler invocation
pub type HandlerResult = Result<HandlerResponse, HandlerError>;

/// Turns parsed requests into responses.
///
/// Owns the route table (shared, read-only) and runs, per request:
/// route resolution, verb lookup, body decoding, parameter validation and
/// the handler itself. Failures at each stage map to a status code:
///
/// | Stage                        | Status |
/// |------------------------------|--------|
/// | no route                     | 404    |
/// | verb not implemented         | 405    |
/// | unsupported / malformed body | 400    |
/// | parameter validation         | 403    |
/// | handler panic                | 500    |
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router<Resource>>,
    validation_mode: ValidationMode,
    cors: Option<CorsConfig>,
}

impl Dispatcher {
    /// Create a dispatcher over a fully registered router
    #[must_use]
    pub fn new(router: Router<Resource>) -> Self {
        Self::from_shared(Arc::new(router))
    }

    /// Create a dispatcher over a router that is already shared
    #[must_use]
    pub fn from_shared(router: Arc<Router<Resource>>) -> Self {
        info!(routes_count = router.len(), "Dispatcher created");
        Self {
            router,
            validation_mode: ValidationMode::default(),
            cors: None,
        }
    }

    /// Choose first-failure or collect-all validation reporting
    #[must_use]
    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Attach CORS headers to every response
    #[must_use]
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = Some(cors);
        self
    }

    /// The route table
    #[must_use]
    pub fn router(&self) -> &Router<Resource> {
        &self.router
    }

    /// Handle one fully buffered request.
    #[must_use]
    pub fn dispatch(&self, req: ParsedRequest) -> HandlerResponse {
        let request_id =
            RequestId::from_header_or_new(req.headers.get("x-request-id").map(String::as_str));
        let start = Instant::now();
        let method = req.method.clone();
        let (path, _) = split_path(&req.path);
        let path = path.to_string();

        let mut response = self.dispatch_inner(request_id, req);

        response.set_header("x-request-id", request_id.to_string());
        if let Some(cors) = &self.cors {
            cors.apply(&mut response);
        }

        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = response.status,
            duration_us = start.elapsed().as_micros(),
            "Request dispatched"
        );
        response
    }

    fn dispatch_inner(&self, request_id: RequestId, req: ParsedRequest) -> HandlerResponse {
        let ParsedRequest {
            method,
            path: raw_path,
            headers,
            body,
        } = req;
        let (path, query) = split_path(&raw_path);

        let Some(route_match) = self.router.resolve(path) else {
            return HandlerResponse::json(
                404,
                json!({ "error": "Not Found", "method": method.as_str(), "path": path }),
            );
        };
        let resource = &route_match.resource;

        let Some(method_handler) = resource.handler(&method) else {
            let allow = resource
                .allowed_methods()
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if method == Method::OPTIONS && self.cors.is_some() {
                let mut response = HandlerResponse::no_content();
                response.set_header("allow", allow);
                return response;
            }
            debug!(
                request_id = %request_id,
                method = %method,
                route_pattern = %route_match.route.pattern(),
                "Method not implemented by resource"
            );
            let mut response = HandlerResponse::json(
                405,
                json!({ "error": "Method Not Allowed", "method": method.as_str(), "path": path }),
            );
            response.set_header("allow", allow);
            return response;
        };

        let mut input = parse_query_params(query);
        if !body.is_empty() {
            let content_type = headers.get("content-type").map(String::as_str);
            match parse_body(content_type, &body) {
                Ok(fields) => input.extend(fields),
                Err(err) => {
                    warn!(request_id = %request_id, error = %err, "Request body rejected");
                    return HandlerResponse::error(400, &err.to_string());
                }
            }
        }
        for (name, value) in &route_match.path_params {
            input.insert(name.to_string(), Value::String(value.clone()));
        }

        let params = match method_handler.schema() {
            Some(schema) => match self.validate(schema, &input) {
                Ok(params) => params,
                Err(body) => {
                    debug!(
                        request_id = %request_id,
                        route_pattern = %route_match.route.pattern(),
                        errors = %body,
                        "Parameter validation failed"
                    );
                    return HandlerResponse::json(403, body);
                }
            },
            None => input,
        };

        let handler_request = HandlerRequest {
            request_id,
            method,
            path: path.to_string(),
            route_pattern: route_match.route.pattern().to_string(),
            path_params: route_match.path_params.clone(),
            params,
            headers,
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            method_handler.call(&handler_request)
        }));
        match result {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                debug!(request_id = %request_id, error = %err, "Handler returned error");
                err.into_response()
            }
            Err(panic) => {
                let panic_message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                error!(
                    request_id = %request_id,
                    route_pattern = %handler_request.route_pattern,
                    panic_message = %panic_message,
                    "Handler panicked"
                );
                HandlerResponse::error(500, "Internal Server Error")
            }
        }
    }

    fn validate(
        &self,
        schema: &params::ParamSchema,
        input: &Map<String, Value>,
    ) -> Result<Map<String, Value>, Value> {
        match self.validation_mode {
            ValidationMode::FirstFailure => {
                params::validate(schema, input).map_err(|e| render_error(&e))
            }
            ValidationMode::CollectAll => params::validate_all(schema, input).map_err(|errors| {
                json!({ "errors": errors.iter().map(render_error).collect::<Vec<_>>() })
            }),
        }
    }
}

fn render_error(err: &ValidationError) -> Value {
    serde_json::to_value(err).unwrap_or_else(|_| json!({ "error": err.to_string() }))
}
