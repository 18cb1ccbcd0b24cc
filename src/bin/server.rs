//! filehub Server Binary
//!
//! Starts the TCP file server.

use std::sync::Arc;

use clap::Parser;
use filehub::network::Server;
use filehub::{Config, FileStore};
use tracing_subscriber::{fmt, EnvFilter};

/// filehub Server
#[derive(Parser, Debug)]
#[command(name = "filehub-server")]
#[command(about = "TCP file store with name/id addressing")]
#[command(version)]
struct Args {
    /// Data directory (blob files and registry snapshots)
    #[arg(short, long, default_value = "./filehub_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:23456")]
    listen: String,

    /// Number of worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Pending-connection queue depth before new connections are rejected
    #[arg(short, long, default_value = "64")]
    queue_depth: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filehub=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("filehub Server v{}", filehub::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .queue_depth(args.queue_depth)
        .build();

    // Open the store (restores the registry snapshot)
    let store = match FileStore::open(&config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Store initialized with {} blobs", store.blob_count());

    // Run until a client sends EXIT
    let mut server = Server::new(config, store);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
