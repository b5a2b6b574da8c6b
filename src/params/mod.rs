//! # Params Module
//!
//! Schema-driven validation and coercion of request parameters.
//!
//! A [`ParamSchema`] declares named parameters with a [`ParamRule`] each.
//! [`validate`] applies the schema to a raw JSON object (query string, form
//! or JSON body merged with path parameters) and returns either the cleaned
//! parameter map or a single [`ValidationError`] for the first failing
//! parameter. [`validate_all`] runs the same checks without stopping.
//!
//! ## Example
//!
//! ```rust
//! use brrtrest::params::{ErrorCode, ParamOptions, ParamSchema};
//! use serde_json::json;
//!
//! let schema = ParamSchema::new()
//!     .param("age", ParamOptions::new().kind("int".parse().unwrap()))
//!     .unwrap()
//!     .param("name", ParamOptions::new().required(true).alias("fullName"))
//!     .unwrap();
//!
//! let ok = schema
//!     .validate(json!({"age": "31", "name": "lleohao"}).as_object().unwrap())
//!     .unwrap();
//! assert_eq!(ok, *json!({"age": 31, "fullName": "lleohao"}).as_object().unwrap());
//!
//! let err = schema
//!     .validate(json!({"age": "lleohao", "name": "x"}).as_object().unwrap())
//!     .unwrap_err();
//! assert_eq!(err.code, ErrorCode::Conver);
//! assert_eq!(err.message, "Can not convert \"age\" to number type");
//! ```

mod error;
mod rule;
mod schema;
mod validate;
#[cfg(test)]
mod tests;

pub use error::{render_message, ErrorCode, ErrorInfo, SchemaError, ValidationError};
pub use rule::{Choices, Coercer, Converter, ParamOptions, ParamRule, ParamType};
pub use schema::ParamSchema;
pub use validate::{validate, validate_all};
