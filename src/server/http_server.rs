use anyhow::{anyhow, Context};
use http::Method;
use std::collections::HashMap;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::request::ParsedRequest;
use super::response::{build_response, status_reason};
use crate::config::ServerConfig;
use crate::dispatcher::{Dispatcher, HandlerResponse};

/// Blocking HTTP front end for a [`Dispatcher`].
///
/// Binds a `tiny_http` listener and runs a fixed pool of worker threads,
/// each pulling requests off the shared listener.
pub struct HttpServer {
    dispatcher: Arc<Dispatcher>,
    addr: String,
    workers: usize,
    max_body_bytes: usize,
}

/// Handle to a running HTTP server
///
/// Provides methods for waiting until the server is ready, stopping it gracefully,
/// or joining the worker threads.
pub struct ServerHandle {
    addr: SocketAddr,
    server: Arc<tiny_http::Server>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl ServerHandle {
    /// Address the listener is bound to (resolves port `0`)
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready to accept connections
    ///
    /// Polls the server address by attempting TCP connections until successful.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server doesn't accept within ~250ms (50 attempts × 5ms).
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop the server and wait for every worker to exit.
    pub fn stop(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        for _ in 0..self.workers.len() {
            self.server.unblock();
        }
        for worker in self.workers {
            if worker.join().is_err() {
                error!("HTTP worker panicked during shutdown");
            }
        }
        info!(addr = %self.addr, "HTTP server stopped");
    }

    /// Block until all workers finish.
    ///
    /// Workers run until [`stop`](Self::stop) is called from elsewhere or the
    /// listener fails, so this normally blocks for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns the panic payload of the first worker that panicked.
    pub fn join(self) -> thread::Result<()> {
        let mut result = Ok(());
        for worker in self.workers {
            if let Err(panic) = worker.join() {
                if result.is_ok() {
                    result = Err(panic);
                }
            }
        }
        result
    }
}

impl HttpServer {
    #[must_use]
    pub fn new(dispatcher: Dispatcher, config: &ServerConfig) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            addr: config.addr.clone(),
            workers: config.workers.max(1),
            max_body_bytes: config.max_body_bytes,
        }
    }

    /// Bind the listener and spawn the worker pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or a worker thread
    /// cannot be spawned.
    pub fn start(self) -> anyhow::Result<ServerHandle> {
        let server = tiny_http::Server::http(self.addr.as_str())
            .map_err(|e| anyhow!("failed to bind {}: {e}", self.addr))?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| anyhow!("listener on {} has no IP address", self.addr))?;
        let server = Arc::new(server);
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let server = Arc::clone(&server);
            let shutdown = Arc::clone(&shutdown);
            let dispatcher = Arc::clone(&self.dispatcher);
            let max_body_bytes = self.max_body_bytes;
            let handle = thread::Builder::new()
                .name(format!("brrtrest-worker-{id}"))
                .spawn(move || worker_loop(&server, &shutdown, &dispatcher, max_body_bytes))
                .with_context(|| format!("failed to spawn HTTP worker {id}"))?;
            workers.push(handle);
        }

        info!(
            addr = %addr,
            workers = self.workers,
            max_body_bytes = self.max_body_bytes,
            "HTTP server started"
        );
        Ok(ServerHandle {
            addr,
            server,
            workers,
            shutdown,
        })
    }
}

fn worker_loop(
    server: &tiny_http::Server,
    shutdown: &AtomicBool,
    dispatcher: &Dispatcher,
    max_body_bytes: usize,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let request = match server.recv() {
            Ok(request) => request,
            Err(e) => {
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
                warn!(error = %e, "Failed to receive request");
                continue;
            }
        };
        handle_request(request, dispatcher, max_body_bytes);
    }
    debug!("HTTP worker exiting");
}

fn handle_request(mut request: tiny_http::Request, dispatcher: &Dispatcher, max_body_bytes: usize) {
    let response = match read_request(&mut request, max_body_bytes) {
        Ok(parsed) => dispatcher.dispatch(parsed),
        Err(rejected) => rejected,
    };
    let status = response.status;
    if let Err(e) = request.respond(build_response(response)) {
        warn!(status, reason = status_reason(status), error = %e, "Failed to write response");
    }
}

fn read_request(
    request: &mut tiny_http::Request,
    max_body_bytes: usize,
) -> Result<ParsedRequest, HandlerResponse> {
    let method = Method::from_bytes(request.method().as_str().as_bytes())
        .map_err(|_| HandlerResponse::error(400, "Invalid HTTP method"))?;

    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .map(|h| {
            (
                h.field.as_str().as_str().to_ascii_lowercase(),
                h.value.as_str().to_string(),
            )
        })
        .collect();

    let limit = u64::try_from(max_body_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut raw = Vec::new();
    request
        .as_reader()
        .take(limit)
        .read_to_end(&mut raw)
        .map_err(|e| HandlerResponse::error(400, &format!("Failed to read body: {e}")))?;
    if raw.len() > max_body_bytes {
        warn!(max_body_bytes, "Request body too large");
        return Err(HandlerResponse::error(413, "Payload Too Large"));
    }
    let body = String::from_utf8(raw)
        .map_err(|_| HandlerResponse::error(400, "Request body is not valid UTF-8"))?;

    Ok(ParsedRequest {
        method,
        path: request.url().to_string(),
        headers,
        body,
    })
}
