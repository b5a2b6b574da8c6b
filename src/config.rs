//! # Configuration Module
//!
//! Server settings are read from an optional YAML file and then overridden by
//! environment variables.
//!
//! ## File Format
//!
//! ```yaml
//! addr: "0.0.0.0:8080"
//! workers: 8
//! max_body_bytes: 1048576
//! validation: collect_all      # or first_failure (default)
//! cors:
//!   allow_origin: "https://example.com"
//!   allow_methods: [GET, POST]
//! ```
//!
//! Every key is optional; missing keys take their default.
//!
//! ## Environment Variables
//!
//! | Variable                  | Overrides        |
//! |---------------------------|------------------|
//! | `BRRTREST_ADDR`           | `addr`           |
//! | `BRRTREST_WORKERS`        | `workers`        |
//! | `BRRTREST_MAX_BODY_BYTES` | `max_body_bytes` |
//! | `BRRTREST_CORS_ORIGIN`    | `cors.allow_origin` (enables CORS) |
//!
//! Values that fail to parse are ignored with a warning and the file or
//! default value is kept.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::dispatcher::{CorsConfig, ValidationMode};

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
/// Default worker thread count
pub const DEFAULT_WORKERS: usize = 4;
/// Default request body limit (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Settings for the HTTP server and dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, `host:port`
    pub addr: String,
    /// Number of worker threads pulling requests
    pub workers: usize,
    /// Largest accepted request body; larger bodies get 413
    pub max_body_bytes: usize,
    /// CORS headers; disabled when absent
    pub cors: Option<CorsConfig>,
    /// Validation failure reporting
    pub validation: ValidationMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            workers: DEFAULT_WORKERS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors: None,
            validation: ValidationMode::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or a key has the
    /// wrong type.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Invalid server configuration")
    }

    /// Read the YAML file (if any), then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                let config = Self::from_yaml_str(&text)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;
                info!(path = %path.display(), "Loaded server configuration");
                config
            }
            None => Self::default(),
        };
        Ok(config.apply_overrides(|key| env::var(key).ok()))
    }

    /// Apply `BRRTREST_*` overrides from `lookup`.
    #[must_use]
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BRRTREST_ADDR") {
            let addr = addr.trim();
            if addr.is_empty() {
                warn!("BRRTREST_ADDR is empty, keeping {}", self.addr);
            } else {
                self.addr = addr.to_string();
            }
        }
        if let Some(workers) = parse_override::<usize>(&lookup, "BRRTREST_WORKERS") {
            if workers == 0 {
                warn!(workers, "BRRTREST_WORKERS must be positive, keeping {}", self.workers);
            } else {
                self.workers = workers;
            }
        }
        if let Some(limit) = parse_override::<usize>(&lookup, "BRRTREST_MAX_BODY_BYTES") {
            self.max_body_bytes = limit;
        }
        if let Some(origin) = lookup("BRRTREST_CORS_ORIGIN") {
            let mut cors = self.cors.take().unwrap_or_default();
            cors.allow_origin = origin;
            self.cors = Some(cors);
        }
        self
    }
}

fn parse_override<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring invalid environment override");
            None
        }
    }
}
