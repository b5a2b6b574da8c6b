//! Router core module - route table and request path resolution.

use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::RouteError;
use super::route::Route;

/// Maximum number of path parameters before heap allocation.
/// Most REST routes have ≤4 placeholders (e.g., /users/<id>/posts/<post_id>).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` because they come from the compiled route
/// (known at startup); values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully resolving a request path
#[derive(Debug)]
pub struct RouteMatch<R> {
    /// The compiled route that matched
    pub route: Arc<Route>,
    /// Path parameters extracted from the URL (e.g., `<id>` → `{"id": "123"}`)
    pub path_params: ParamVec,
    /// Resource instance bound to the route at registration time
    pub resource: Arc<R>,
}

impl<R> Clone for RouteMatch<R> {
    fn clone(&self) -> Self {
        Self {
            route: Arc::clone(&self.route),
            path_params: self.path_params.clone(),
            resource: Arc::clone(&self.resource),
        }
    }
}

impl<R> RouteMatch<R> {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Ordered table of compiled routes bound to resource instances.
///
/// Routes are kept sorted ascending by weight. Insertion is a stable
/// insertion sort, so routes of equal weight keep registration order.
/// [`Router::resolve`] scans in that order and returns the first match:
/// narrow placeholder types (`int`, `float`) are tried before `str`, and
/// `path` catch-alls last.
///
/// The table is written only during setup and read concurrently afterwards;
/// share it behind an `Arc` once registration is complete.
pub struct Router<R> {
    routes: Vec<(Arc<Route>, Arc<R>)>,
    registered: HashSet<String>,
}

impl<R> Default for Router<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Router<R> {
    /// Create an empty router
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            registered: HashSet::new(),
        }
    }

    /// Register `pattern`, building its resource with `factory`.
    ///
    /// The duplicate check and pattern compilation happen before the factory
    /// runs. Route errors are returned as [`RouteError`] inside the
    /// `anyhow::Error`; an error from the factory is passed through as-is.
    ///
    /// # Errors
    ///
    /// * [`RouteError::DuplicateRoute`] if the pattern is already registered
    /// * any compile error from [`Route::compile`]
    /// * whatever the factory returns
    pub fn add_route<F, E>(&mut self, pattern: &str, factory: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> Result<R, E>,
        E: Into<anyhow::Error>,
    {
        let route = self.prepare(pattern)?;
        let resource = factory().map_err(Into::into)?;
        self.insert(route, resource);
        Ok(())
    }

    /// Register `pattern` bound to an already-built resource.
    ///
    /// # Errors
    ///
    /// Same route errors as [`Router::add_route`].
    pub fn add_resource(&mut self, pattern: &str, resource: R) -> Result<(), RouteError> {
        let route = self.prepare(pattern)?;
        self.insert(route, resource);
        Ok(())
    }

    fn prepare(&self, pattern: &str) -> Result<Route, RouteError> {
        if self.registered.contains(pattern) {
            warn!(pattern = %pattern, "Duplicate route registration rejected");
            return Err(RouteError::DuplicateRoute {
                pattern: pattern.to_string(),
            });
        }
        Route::compile(pattern)
    }

    fn insert(&mut self, route: Route, resource: R) {
        let weight = route.weight();
        self.registered.insert(route.pattern().to_string());
        self.routes.push((Arc::new(route), Arc::new(resource)));

        // Walk the new entry left past every strictly heavier route.
        let mut index = self.routes.len() - 1;
        while index > 0 && self.routes[index - 1].0.weight() > weight {
            self.routes.swap(index - 1, index);
            index -= 1;
        }

        info!(
            pattern = %self.routes[index].0.pattern(),
            weight = weight,
            position = index,
            routes_count = self.routes.len(),
            "Route registered"
        );
    }

    /// Resolve a request path to the first matching route in weight order.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - route, extracted path params and bound resource
    /// * `None` - no pattern accepts the path (results in 404)
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<R>> {
        debug!(path = %path, routes_count = self.routes.len(), "Route match attempt");

        for (route, resource) in &self.routes {
            if let Some(path_params) = route.match_path(path) {
                debug!(
                    path = %path,
                    route_pattern = %route.pattern(),
                    path_params = ?path_params,
                    "Route matched"
                );
                return Some(RouteMatch {
                    route: Arc::clone(route),
                    path_params,
                    resource: Arc::clone(resource),
                });
            }
        }

        debug!(path = %path, "No route matched");
        None
    }

    /// Compiled routes in scan order (ascending weight)
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().map(|(route, _)| route.as_ref())
    }

    /// Whether `pattern` has been registered
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.registered.contains(pattern)
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no route has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Print the routing table to stdout in scan order.
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in self.routes() {
            println!("[route] weight={:<4} {}", route.weight(), route.pattern());
        }
    }
}
