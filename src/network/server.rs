//! TCP Server
//!
//! Accepts connections and dispatches each to a worker. The accept loop
//! runs until a client requests shutdown via `EXIT`; accept failures are
//! fatal and propagate out of `run`.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{FileHubError, Result};
use crate::storage::FileStore;

use super::connection::{Connection, Outcome};
use super::pool::WorkerPool;

/// TCP server for filehub
pub struct Server {
    config: Config,
    store: Arc<FileStore>,
    listener: Option<TcpListener>,
    local_addr: Option<SocketAddr>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Create a new server with the given config and store
    pub fn new(config: Config, store: Arc<FileStore>) -> Self {
        Self {
            config,
            store,
            listener: None,
            local_addr: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the listening socket, returning the bound address.
    ///
    /// Useful for tests that listen on port 0 and need the actual port.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            FileHubError::Network(format!("cannot bind {}: {}", self.config.listen_addr, e))
        })?;
        let local_addr = listener.local_addr()?;
        self.listener = Some(listener);
        self.local_addr = Some(local_addr);
        Ok(local_addr)
    }

    /// Run the accept loop (blocking).
    ///
    /// Returns after a client requests shutdown: the registry is
    /// snapshotted, the listening socket is closed, and in-flight
    /// connections are left undrained.
    pub fn run(&mut self) -> Result<()> {
        if self.config.worker_threads == 0 || self.config.queue_depth == 0 {
            return Err(FileHubError::Config(
                "worker_threads and queue_depth must be non-zero".to_string(),
            ));
        }
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return Err(FileHubError::Network("server is not bound".to_string())),
        };
        let local_addr = listener.local_addr()?;

        let pool = WorkerPool::new(self.config.worker_threads, self.config.queue_depth)?;
        tracing::info!(
            "listening on {} with {} workers",
            local_addr,
            pool.worker_count()
        );

        loop {
            // Accept failures are fatal: propagate instead of retrying
            let (stream, peer_addr) = listener.accept()?;

            if self.shutdown.load(Ordering::SeqCst) {
                // Woken by the EXIT handler; the extra connection is dropped
                break;
            }

            let store = Arc::clone(&self.store);
            let shutdown = Arc::clone(&self.shutdown);
            let job = move || handle_client(stream, store, shutdown, local_addr);

            if pool.try_execute(job).is_err() {
                // Reject past the configured limit; the dropped stream
                // closes the socket and the client sees a reset
                tracing::warn!("rejecting connection from {}: worker queue full", peer_addr);
            }
        }

        if let Err(e) = self.store.snapshot() {
            // Does not block exit
            tracing::error!("registry snapshot at shutdown failed: {}", e);
        }

        drop(listener);
        tracing::info!("server stopped");
        Ok(())
    }

    /// Signal the server to shut down and wake the blocked acceptor
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(addr) = self.local_addr {
            let _ = TcpStream::connect(addr);
        }
    }
}

/// Worker entry point for one accepted connection
fn handle_client(
    stream: TcpStream,
    store: Arc<FileStore>,
    shutdown: Arc<AtomicBool>,
    local_addr: SocketAddr,
) {
    let mut connection = match Connection::new(stream, store) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!("failed to set up connection: {}", e);
            return;
        }
    };

    match connection.handle() {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Shutdown) => {
            shutdown.store(true, Ordering::SeqCst);
            // Wake the acceptor blocked in accept()
            let _ = TcpStream::connect(local_addr);
        }
        Err(e) => {
            tracing::warn!("error handling {}: {}", connection.peer_addr(), e);
        }
    }
}
