//! # Router Module
//!
//! The router module compiles path patterns with typed placeholders and
//! resolves incoming request paths to the resource registered for them.
//!
//! ## Pattern Grammar
//!
//! Literal text is matched verbatim. Placeholders are written `<name>` or
//! `<type:name>`:
//!
//! | Type            | Matches              | Weight |
//! |-----------------|----------------------|--------|
//! | `str` (default) | `[A-Za-z0-9_]+`      | 100    |
//! | `int`           | `[0-9]+`             | 50     |
//! | `float`         | `[0-9]+\.[0-9]+`     | 50     |
//! | `path`          | anything, incl. `/`  | 200    |
//!
//! A route's weight is the number of literal characters plus the weight of
//! each placeholder. Character classes are ASCII only. The router keeps
//! routes sorted ascending by weight and returns the first route whose
//! anchored matcher accepts the whole path.
//!
//! ## Example
//!
//! ```rust
//! use brrtrest::router::Router;
//!
//! let mut router: Router<&'static str> = Router::new();
//! router.add_resource("/books/<int:id>/<page>", "books").unwrap();
//!
//! let m = router.resolve("/books/1/25").unwrap();
//! assert_eq!(*m.resource, "books");
//! assert_eq!(m.get_path_param("id"), Some("1"));
//! assert_eq!(m.get_path_param("page"), Some("25"));
//! assert!(router.resolve("/books/1.5/25").is_none());
//! ```

mod core;
mod error;
mod route;
#[cfg(test)]
mod tests;

pub use self::core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use error::RouteError;
pub use route::{PlaceholderKind, Route, Segment};
