//! # brrtrest
//!
//! **brrtrest** is a small REST routing core: typed path patterns, a
//! weight-ordered router and a declarative parameter validator, with a thin
//! blocking HTTP server in front of them.
//!
//! ## Architecture
//!
//! - **[`router`]** - Compiles patterns like `/books/<int:id>` into anchored
//!   matchers and resolves paths to the registered resource
//! - **[`params`]** - Parameter schemas and the validation pipeline
//!   (defaults, required, null, type, choices, normalisation, conversion, alias)
//! - **[`resource`]** - Per-verb handlers bound to a route, each optionally
//!   guarded by a schema
//! - **[`dispatcher`]** - Turns a buffered request into a response: resolve,
//!   verb lookup, body decoding, validation, handler invocation
//! - **[`server`]** - Request decoding helpers and a `tiny_http` worker pool
//! - **[`config`]** - YAML + environment configuration for the server
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `brrtrest` binary's commands
//!
//! ## Request Flow
//!
//! ```text
//! HTTP request
//!   → server::HttpServer (buffer body, build ParsedRequest)
//!   → dispatcher::Dispatcher
//!       → router::Router::resolve          404 on miss
//!       → resource::Resource::handler      405 when the verb is missing
//!       → query + body + path params       400 on undecodable body
//!       → params::validate                 403 with the ValidationError
//!       → handler                          500 on panic
//!   → JSON response (+ x-request-id, CORS headers)
//! ```
//!
//! ## Quick Start
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
//!     .param("name", ParamOptions::new().required(true).trim(true))
//!     .unwrap();
//!
//! let mut router = Router::new();
//! router
//!     .add_route("/greet/<lang>", || {
//!         Ok::<_, anyhow::Error>(Resource::new().get_with(schema, |req| {
//!             Ok(HandlerResponse::ok(json!({
//!                 "lang": req.get_path_param("lang"),
//!                 "name": req.get_param("name"),
//!             })))
//!         }))
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(router);
//! let res = dispatcher.dispatch(ParsedRequest::new(Method::GET, "/greet/en?name=%20Ada%20"));
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body["name"], "Ada");
//!
//! let res = dispatcher.dispatch(ParsedRequest::new(Method::GET, "/greet/en"));
//! assert_eq!(res.status, 403);
//! assert_eq!(res.body["code"], "REQUIRED_ERROR");
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod echo;
pub mod ids;
pub mod logging;
pub mod params;
pub mod resource;
pub mod router;
pub mod server;

pub use dispatcher::{Dispatcher, HandlerError, HandlerRequest, HandlerResponse, HandlerResult};
pub use params::{validate, validate_all, ParamOptions, ParamSchema, ValidationError};
pub use resource::Resource;
pub use router::{RouteError, Router};
