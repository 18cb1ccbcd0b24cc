//! End-to-end server tests
//!
//! Run a real server on an ephemeral port and speak the wire protocol to it
//! over TCP, one connection per request as real clients do.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use filehub::network::Server;
use filehub::protocol::{
    read_blob, read_string, write_put_payload, write_string, Response,
};
use filehub::{Config, FileHubError, FileStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    addr: SocketAddr,
    data_dir: PathBuf,
    handle: JoinHandle<filehub::Result<()>>,
    _temp: TempDir,
}

fn start_server() -> TestServer {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .listen_addr("127.0.0.1:0")
        .worker_threads(4)
        .queue_depth(16)
        .build();

    let store = Arc::new(FileStore::open(&config).unwrap());
    let mut server = Server::new(config, store);
    let addr = server.bind().unwrap();
    let handle = thread::spawn(move || server.run());

    TestServer {
        addr,
        data_dir: temp.path().to_path_buf(),
        handle,
        _temp: temp,
    }
}

fn connect(addr: SocketAddr) -> (BufReader<TcpStream>, BufWriter<TcpStream>) {
    let stream = TcpStream::connect(addr).unwrap();
    let reader = BufReader::new(stream.try_clone().unwrap());
    let writer = BufWriter::new(stream);
    (reader, writer)
}

fn send_put(addr: SocketAddr, name: &str, content: &[u8]) -> Response {
    let (mut reader, mut writer) = connect(addr);
    write_string(&mut writer, &format!("PUT {}", name)).unwrap();
    write_put_payload(&mut writer, content).unwrap();
    Response::parse(&read_string(&mut reader).unwrap()).unwrap()
}

fn send_command(addr: SocketAddr, command: &str) -> Response {
    let (mut reader, mut writer) = connect(addr);
    write_string(&mut writer, command).unwrap();
    Response::parse(&read_string(&mut reader).unwrap()).unwrap()
}

fn send_get(addr: SocketAddr, selector: &str) -> (Response, Option<Vec<u8>>) {
    let (mut reader, mut writer) = connect(addr);
    write_string(&mut writer, &format!("GET {}", selector)).unwrap();
    let response = Response::parse(&read_string(&mut reader).unwrap()).unwrap();
    let content = match response {
        Response::Ok { .. } => Some(read_blob(&mut reader).unwrap()),
        _ => None,
    };
    (response, content)
}

fn send_exit(addr: SocketAddr) -> Response {
    send_command(addr, "EXIT")
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_put_get_delete_over_the_wire() {
    let server = start_server();

    let response = send_put(server.addr, "hello.txt", b"hello over tcp");
    assert_eq!(response, Response::Ok { id: Some(0) });

    let (response, content) = send_get(server.addr, "BY_NAME hello.txt");
    assert_eq!(response, Response::Ok { id: None });
    assert_eq!(content.unwrap(), b"hello over tcp");

    let (response, content) = send_get(server.addr, "BY_ID 0");
    assert_eq!(response, Response::Ok { id: None });
    assert_eq!(content.unwrap(), b"hello over tcp");

    assert_eq!(
        send_command(server.addr, "DELETE BY_NAME hello.txt"),
        Response::Ok { id: None }
    );
    assert_eq!(send_get(server.addr, "BY_NAME hello.txt").0, Response::NotFound);
    assert_eq!(send_get(server.addr, "BY_ID 0").0, Response::NotFound);

    assert_eq!(send_exit(server.addr), Response::Ok { id: None });
    server.handle.join().unwrap().unwrap();
}

#[test]
fn test_duplicate_put_is_forbidden_over_the_wire() {
    let server = start_server();

    assert_eq!(
        send_put(server.addr, "dup.txt", b"first"),
        Response::Ok { id: Some(0) }
    );
    assert_eq!(send_put(server.addr, "dup.txt", b"second"), Response::Forbidden);

    // The original content survives
    let (_, content) = send_get(server.addr, "BY_NAME dup.txt");
    assert_eq!(content.unwrap(), b"first");

    send_exit(server.addr);
    server.handle.join().unwrap().unwrap();
}

#[test]
fn test_delete_by_id_over_the_wire() {
    let server = start_server();

    let response = send_put(server.addr, "byid.txt", b"x");
    assert_eq!(response, Response::Ok { id: Some(0) });

    assert_eq!(
        send_command(server.addr, "DELETE BY_ID 0"),
        Response::Ok { id: None }
    );
    assert_eq!(send_command(server.addr, "DELETE BY_ID 0"), Response::NotFound);

    send_exit(server.addr);
    server.handle.join().unwrap().unwrap();
}

// =============================================================================
// Protocol Error Tests
// =============================================================================

#[test]
fn test_unknown_verb_gets_400() {
    let server = start_server();

    assert_eq!(
        send_command(server.addr, "FROB BY_NAME a.txt"),
        Response::BadRequest
    );

    send_exit(server.addr);
    server.handle.join().unwrap().unwrap();
}

#[test]
fn test_malformed_id_gets_400() {
    let server = start_server();

    assert_eq!(
        send_command(server.addr, "GET BY_ID not-a-number"),
        Response::BadRequest
    );
    assert_eq!(
        send_command(server.addr, "DELETE BY_ID 1.5"),
        Response::BadRequest
    );

    send_exit(server.addr);
    server.handle.join().unwrap().unwrap();
}

#[test]
fn test_invalid_request_gets_no_response() {
    let server = start_server();

    let (mut reader, mut writer) = connect(server.addr);
    write_string(&mut writer, "INVALID REQUEST").unwrap();

    // The server no-ops and closes; the read sees EOF, not a status
    assert!(read_string(&mut reader).is_err());

    send_exit(server.addr);
    server.handle.join().unwrap().unwrap();
}

#[test]
fn test_unnamed_put_gets_server_assigned_name() {
    let server = start_server();

    let response = send_put(server.addr, "", b"anonymous");
    let id = match response {
        Response::Ok { id: Some(id) } => id,
        other => panic!("expected 200 with id, got {}", other.status_line()),
    };

    let (response, content) = send_get(server.addr, &format!("BY_ID {}", id));
    assert_eq!(response, Response::Ok { id: None });
    assert_eq!(content.unwrap(), b"anonymous");

    send_exit(server.addr);
    server.handle.join().unwrap().unwrap();
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_zero_worker_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .listen_addr("127.0.0.1:0")
        .worker_threads(0)
        .build();

    let store = Arc::new(FileStore::open(&config).unwrap());
    let mut server = Server::new(config, store);

    assert!(matches!(server.run(), Err(FileHubError::Config(_))));
}

#[test]
fn test_zero_queue_depth_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .listen_addr("127.0.0.1:0")
        .queue_depth(0)
        .build();

    let store = Arc::new(FileStore::open(&config).unwrap());
    let mut server = Server::new(config, store);

    assert!(matches!(server.run(), Err(FileHubError::Config(_))));
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_exit_snapshots_registry_for_restart() {
    let server = start_server();

    send_put(server.addr, "persist.txt", b"keep me");
    assert_eq!(send_exit(server.addr), Response::Ok { id: None });
    server.handle.join().unwrap().unwrap();

    // Both snapshot files were written at shutdown
    assert!(server.data_dir.join("name_index.bin").exists());
    assert!(server.data_dir.join("id_index.bin").exists());

    // A fresh store restores the mapping and can still serve the blob
    let restored = FileStore::open_path(&server.data_dir).unwrap();
    assert_eq!(restored.blob_count(), 1);
    assert_eq!(restored.get_by_name("persist.txt").unwrap(), b"keep me");
    assert_eq!(restored.get_by_id(0).unwrap(), b"keep me");
}

#[test]
fn test_server_refuses_connections_after_exit() {
    let server = start_server();

    assert_eq!(send_exit(server.addr), Response::Ok { id: None });
    server.handle.join().unwrap().unwrap();

    // The listening socket is closed; a new connection must fail
    assert!(TcpStream::connect(server.addr).is_err());
}
