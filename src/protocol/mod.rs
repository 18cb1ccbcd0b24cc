//! Protocol Module
//!
//! Defines the wire protocol for client-server communication. One request is
//! exchanged per connection; the client reconnects for every request.
//!
//! ## Framing
//!
//! Strings are length-prefixed UTF-8:
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │        UTF-8 bytes          │
//! └──────────┴─────────────────────────────┘
//! ```
//! Blob payloads returned by GET use a wider prefix:
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (4)  │        raw bytes            │
//! └──────────┴─────────────────────────────┘
//! ```
//! All length prefixes are big-endian.
//!
//! ## Requests (one length-prefixed command string)
//! - `PUT <name>` — followed by a length-prefixed decimal byte-count string,
//!   then that many raw payload bytes. An empty name asks the server to pick
//!   one.
//! - `GET BY_NAME <name>` | `GET BY_ID <id>`
//! - `DELETE BY_NAME <name>` | `DELETE BY_ID <id>`
//! - `EXIT` — ask the server to shut down
//! - `INVALID REQUEST` — client-side-detected bad input; the server no-ops
//!
//! ## Responses (one length-prefixed status string)
//! - `200` success (`200 <id>` for PUT); a successful GET is followed by a
//!   4-byte-length blob frame
//! - `400` malformed or unknown request
//! - `403` PUT target already exists
//! - `404` name/id not found

mod request;
mod response;
mod codec;

pub use request::{Lookup, Request};
pub use response::Response;
pub use codec::{
    read_blob, read_put_payload, read_string, write_blob, write_put_payload, write_string,
    MAX_BLOB_SIZE,
};
