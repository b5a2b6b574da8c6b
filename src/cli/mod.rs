//! # CLI Module
//!
//! Command-line front end for the router and the HTTP server.
//!
//! ## Commands
//!
//! ### `resolve`
//!
//! Compile one or more patterns, print the routing table in scan order and
//! the route a path resolves to:
//!
//! ```bash
//! brrtrest resolve --route '/books/<int:id>' --route '/books/<slug>' /books/42
//! ```
//!
//! ### `serve`
//!
//! Register an echo resource (GET/POST/PUT/DELETE) on every pattern and run
//! the HTTP server until interrupted:
//!
//! ```bash
//! brrtrest serve --config server.yaml --route '/items/<int:id>'
//! ```
//!
//! Options:
//! - `--config <FILE>` - YAML server configuration
//! - `--addr <ADDR>` - Bind address, overrides config and `BRRTREST_ADDR`
//! - `--route <PATTERN>` - Route pattern (repeatable, required)
//!
//! A pattern that fails to compile makes either command exit with status 1.

mod commands;


pub use commands::{build_router, describe_match, run, run_cli, Cli, Commands};
