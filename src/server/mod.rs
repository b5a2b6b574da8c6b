//! # Server Module
//!
//! Request decoding helpers used by the dispatcher and a thin blocking HTTP
//! server that feeds it.

pub mod http_server;
pub mod request;
pub mod response;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{ParsedRequest, RequestError};
