//! Network Module
//!
//! Blocking TCP server.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Bounded worker pool; connections past the queue limit are rejected
//! - One worker owns one connection for its whole (single-request) lifetime
//! - Shutdown only via the protocol `EXIT` request

mod pool;
mod server;
mod connection;

pub use pool::WorkerPool;
pub use server::Server;
pub use connection::{Connection, Outcome};
