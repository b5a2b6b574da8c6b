//! # Dispatcher Module
//!
//! The dispatcher is the request-facing side of the crate. It takes a fully
//! buffered [`ParsedRequest`](crate::server::ParsedRequest), resolves it
//! against the [`Router`](crate::router::Router), decodes the query string
//! and body, validates parameters against the schema registered for the
//! HTTP method and invokes the handler.
//!
//! ## Request Flow
//!
//! 1. Router resolves the path → resource + path params (404 on miss)
//! 2. Resource looks up the handler for the verb (405 when absent)
//! 3. Query string and body are merged into one parameter map; path
//!    params override body fields, which override query fields
//! 4. The handler's schema validates the map (403 on failure)
//! 5. Handler runs; panics are caught and become 500 responses
//!
//! ## Example
//!
//! ```rust
//! use brrtrest::dispatcher::{Dispatcher, HandlerResponse};
//! use brrtrest::params::{ParamOptions, ParamSchema};
//! use brrtrest::resource::Resource;
//! use brrtrest::router::Router;
//! use brrtrest::server::ParsedRequest;
//! use http::Method;
//! use serde_json::json;
//!
//! let schema = ParamSchema::new()
//!     .param("id", ParamOptions::new().kind("int".parse().unwrap()))
//!     .unwrap();
//! let mut router = Router::new();
//! router
//!     .add_resource(
//!         "/books/<int:id>",
//!         Resource::new().get_with(schema, |req| {
//!             Ok(HandlerResponse::ok(json!({ "id": req.get_param("id") })))
//!         }),
//!     )
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(router);
//! let res = dispatcher.dispatch(ParsedRequest::new(Method::GET, "/books/7"));
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body, json!({ "id": 7 }));
//! ```

mod core;
mod cors;

pub use self::core::{
    Dispatcher, HandlerError, HandlerRequest, HandlerResponse, HandlerResult, HeaderVec,
    ValidationMode, MAX_INLINE_HEADERS,
};
pub use cors::CorsConfig;
