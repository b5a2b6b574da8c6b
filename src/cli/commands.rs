use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::echo::echo_resource;
use crate::router::{RouteMatch, Router};
use crate::server::{HttpServer, ServerHandle};

/// Command-line interface for brrtrest
#[derive(Parser)]
#[command(name = "brrtrest")]
#[command(about = "Typed path routing and parameter validation", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compile route patterns and show which one a path resolves to
    Resolve {
        /// Route pattern to register (repeatable)
        #[arg(short, long = "route", required = true)]
        routes: Vec<String>,

        /// Request path to resolve
        path: String,
    },
    /// Run the HTTP server with an echo resource on every route
    Serve {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind, overriding the config file and environment
        #[arg(long)]
        addr: Option<String>,

        /// Route pattern to register (repeatable)
        #[arg(short, long = "route", required = true)]
        routes: Vec<String>,
    },
}

/// Register `patterns` in order, binding each to a resource from `make`.
///
/// # Errors
///
/// Returns the first route compile or duplicate-route error.
pub fn build_router<R, F>(patterns: &[String], make: F) -> Result<Router<R>>
where
    F: Fn() -> R,
{
    let mut router = Router::new();
    for pattern in patterns {
        router
            .add_resource(pattern, make())
            .with_context(|| format!("Failed to register route '{pattern}'"))?;
    }
    Ok(router)
}

/// One-line description of a resolve outcome.
#[must_use]
pub fn describe_match<R>(path: &str, matched: Option<&RouteMatch<R>>) -> String {
    match matched {
        Some(m) => {
            let params = m
                .path_params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{path} -> {} {{{params}}}", m.route.pattern())
        }
        None => format!("{path} -> no match"),
    }
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - A route pattern fails to compile or is registered twice
/// - The configuration file cannot be read or parsed
/// - The server fails to start
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

/// Execute an already parsed command line.
///
/// # Errors
///
/// See [`run_cli`].
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve { routes, path } => {
            let router = build_router(&routes, || ())?;
            router.dump_routes();
            println!("{}", describe_match(&path, router.resolve(&path).as_ref()));
            Ok(())
        }
        Commands::Serve {
            config,
            addr,
            routes,
        } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(addr) = addr {
                config.addr = addr;
            }
            let router = build_router(&routes, echo_resource)?;
            router.dump_routes();

            let mut dispatcher = Dispatcher::new(router).with_validation_mode(config.validation);
            if let Some(cors) = config.cors.clone() {
                dispatcher = dispatcher.with_cors(cors);
            }
            let handle = HttpServer::new(dispatcher, &config).start()?;
            info!(addr = %handle.local_addr(), "Serving echo resources");
            run_until_signal(handle)
        }
    }
}

/// Serve until SIGINT or SIGTERM, then stop the workers.
#[cfg(unix)]
fn run_until_signal(handle: ServerHandle) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn run_until_signal(handle: ServerHandle) -> Result<()> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("HTTP worker thread panicked"))
}
