//! # Resource Module
//!
//! A [`Resource`] is what a route pattern is bound to: a set of handlers,
//! one per HTTP verb, each optionally guarded by a [`ParamSchema`]. The
//! dispatcher asks the resource whether it implements the request's verb
//! instead of looking methods up dynamically.
//!
//! ```rust
//! use brrtrest::dispatcher::HandlerResponse;
//! use brrtrest::params::{ParamOptions, ParamSchema};
//! use brrtrest::resource::Resource;
//! use http::Method;
//! use serde_json::json;
//!
//! let create = ParamSchema::new()
//!     .param("title", ParamOptions::new().required(true))
//!     .unwrap();
//!
//! let books = Resource::new()
//!     .get(|req| Ok(HandlerResponse::ok(json!({ "id": req.get_path_param("id") }))))
//!     .post_with(create, |req| Ok(HandlerResponse::json(201, json!(req.params))));
//!
//! assert_eq!(books.allowed_methods(), vec![Method::GET, Method::POST]);
//! assert!(books.handler(&Method::DELETE).is_none());
//! ```

use http::Method;
use std::fmt;
use std::sync::Arc;

use crate::dispatcher::{HandlerRequest, HandlerResult};
use crate::params::ParamSchema;

type HandlerFn = dyn Fn(&HandlerRequest) -> HandlerResult + Send + Sync;

/// Handler for one verb plus the schema its parameters must satisfy
#[derive(Clone)]
pub struct MethodHandler {
    schema: Option<Arc<ParamSchema>>,
    handler: Arc<HandlerFn>,
}

impl MethodHandler {
    /// Schema checked before the handler runs, if any
    #[must_use]
    pub fn schema(&self) -> Option<&ParamSchema> {
        self.schema.as_deref()
    }

    /// Invoke the handler
    pub fn call(&self, req: &HandlerRequest) -> HandlerResult {
        (self.handler)(req)
    }
}

impl fmt::Debug for MethodHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandler")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Handlers bound to one route, keyed by HTTP verb.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    methods: Vec<(Method, MethodHandler)>,
}

impl Resource {
    /// Resource with no verbs registered
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method`, replacing any previous one.
    #[must_use]
    pub fn on<F>(self, method: Method, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.insert(method, None, handler)
    }

    /// Register `handler` for `method` behind `schema`.
    #[must_use]
    pub fn on_with<F>(self, method: Method, schema: ParamSchema, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.insert(method, Some(Arc::new(schema)), handler)
    }

    fn insert<F>(mut self, method: Method, schema: Option<Arc<ParamSchema>>, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.methods.retain(|(m, _)| *m != method);
        self.methods.push((
            method,
            MethodHandler {
                schema,
                handler: Arc::new(handler),
            },
        ));
        self
    }

    /// Shorthand for [`Resource::on`] with `GET`
    #[must_use]
    pub fn get<F>(self, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(Method::GET, handler)
    }

    /// Shorthand for [`Resource::on_with`] with `GET`
    #[must_use]
    pub fn get_with<F>(self, schema: ParamSchema, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_with(Method::GET, schema, handler)
    }

    /// Shorthand for [`Resource::on`] with `POST`
    #[must_use]
    pub fn post<F>(self, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(Method::POST, handler)
    }

    /// Shorthand for [`Resource::on_with`] with `POST`
    #[must_use]
    pub fn post_with<F>(self, schema: ParamSchema, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_with(Method::POST, schema, handler)
    }

    /// Shorthand for [`Resource::on`] with `PUT`
    #[must_use]
    pub fn put<F>(self, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(Method::PUT, handler)
    }

    /// Shorthand for [`Resource::on_with`] with `PUT`
    #[must_use]
    pub fn put_with<F>(self, schema: ParamSchema, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_with(Method::PUT, schema, handler)
    }

    /// Shorthand for [`Resource::on`] with `DELETE`
    #[must_use]
    pub fn delete<F>(self, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on(Method::DELETE, handler)
    }

    /// Shorthand for [`Resource::on_with`] with `DELETE`
    #[must_use]
    pub fn delete_with<F>(self, schema: ParamSchema, handler: F) -> Self
    where
        F: Fn(&HandlerRequest) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_with(Method::DELETE, schema, handler)
    }

    /// Handler for `method`, if the resource implements it
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&MethodHandler> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, h)| h)
    }

    /// Implemented verbs in registration order
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.methods.iter().map(|(m, _)| m.clone()).collect()
    }
}
