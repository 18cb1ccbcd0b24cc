//! Connection Handler
//!
//! Handles one client connection: a single request/response exchange. The
//! handler holds no state beyond the request being processed; clients open a
//! fresh connection for every request.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{FileHubError, Result};
use crate::protocol::{
    read_put_payload, read_string, write_blob, write_string, Lookup, Request, Response,
};
use crate::storage::FileStore;

/// What the server should do after an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exchange finished; keep accepting
    Completed,

    /// Client sent `EXIT`; shut the server down
    Shutdown,
}

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the storage engine
    store: Arc<FileStore>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O over cloned read/write handles.
    pub fn new(stream: TcpStream, store: Arc<FileStore>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            store,
            peer_addr,
        })
    }

    /// Handle the single request of this connection.
    ///
    /// Reads one command, dispatches it to the store, writes the response,
    /// and reports whether the server should keep running.
    pub fn handle(&mut self) -> Result<Outcome> {
        tracing::debug!(
            "connection from {}, {} blobs stored",
            self.peer_addr,
            self.store.blob_count()
        );
        for (id, name) in self.store.list() {
            tracing::trace!("  id {} → {:?}", id, name);
        }

        let line = match read_string(&mut self.reader) {
            Ok(line) => line,
            Err(FileHubError::Io(ref e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::UnexpectedEof
                        | std::io::ErrorKind::ConnectionReset
                        | std::io::ErrorKind::ConnectionAborted
                ) =>
            {
                tracing::debug!("client {} disconnected before sending a request", self.peer_addr);
                return Ok(Outcome::Completed);
            }
            Err(e) => return Err(e),
        };

        let request = match Request::parse(&line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("bad request from {}: {}", self.peer_addr, e);
                self.send(Response::BadRequest)?;
                return Ok(Outcome::Completed);
            }
        };
        tracing::trace!("request from {}: {:?}", self.peer_addr, request);

        match request {
            Request::Invalid => Ok(Outcome::Completed),
            Request::Exit => {
                self.send(Response::Ok { id: None })?;
                tracing::info!("shutdown requested by {}", self.peer_addr);
                Ok(Outcome::Shutdown)
            }
            Request::Put { name } => {
                let name = name.unwrap_or_else(timestamp_name);
                let content = read_put_payload(&mut self.reader)?;
                let response = match self.store.put(&name, &content) {
                    Ok(id) => Response::Ok { id: Some(id) },
                    Err(FileHubError::AlreadyExists) => Response::Forbidden,
                    Err(e) => {
                        // A failed PUT reads as forbidden: no id was assigned
                        tracing::warn!("put {:?} failed: {}", name, e);
                        Response::Forbidden
                    }
                };
                self.send(response)?;
                Ok(Outcome::Completed)
            }
            Request::Get(lookup) => {
                let result = match &lookup {
                    Lookup::ByName(name) => self.store.get_by_name(name),
                    Lookup::ById(id) => self.store.get_by_id(*id),
                };
                match result {
                    Ok(content) => {
                        self.send(Response::Ok { id: None })?;
                        write_blob(&mut self.writer, &content)?;
                    }
                    Err(_) => self.send(Response::NotFound)?,
                }
                Ok(Outcome::Completed)
            }
            Request::Delete(lookup) => {
                let deleted = match &lookup {
                    Lookup::ByName(name) => self.store.delete_by_name(name),
                    Lookup::ById(id) => self.store.delete_by_id(*id),
                };
                let response = if deleted {
                    Response::Ok { id: None }
                } else {
                    Response::NotFound
                };
                self.send(response)?;
                Ok(Outcome::Completed)
            }
        }
    }

    /// Send a status response to the client
    fn send(&mut self, response: Response) -> Result<()> {
        write_string(&mut self.writer, &response.status_line())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Name for a PUT that supplied none: current epoch time in milliseconds
fn timestamp_name() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}
