//! Request definitions
//!
//! Parsed client requests and their command-line form.

use crate::error::{FileHubError, Result};

/// How a GET/DELETE selects its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    ByName(String),
    ById(u64),
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Upload a blob; `None` asks the server to pick a name.
    /// The payload follows the command string on the wire.
    Put { name: Option<String> },

    /// Fetch a blob
    Get(Lookup),

    /// Delete a blob
    Delete(Lookup),

    /// Ask the server to shut down
    Exit,

    /// Client-side-detected bad input; the server no-ops
    Invalid,
}

impl Request {
    /// Parse a command string into a request.
    ///
    /// A malformed numeric id or unknown verb is a protocol error; the
    /// server answers those with `400`.
    pub fn parse(line: &str) -> Result<Request> {
        let line = line.trim();
        if line == "INVALID REQUEST" {
            return Ok(Request::Invalid);
        }

        let mut tokens = line.split_whitespace();
        let verb = tokens.next().unwrap_or("");

        match verb {
            "PUT" => Ok(Request::Put {
                name: tokens.next().map(str::to_string),
            }),
            "GET" => Ok(Request::Get(parse_lookup(tokens)?)),
            "DELETE" => Ok(Request::Delete(parse_lookup(tokens)?)),
            "EXIT" => Ok(Request::Exit),
            _ => Err(FileHubError::Protocol(format!(
                "unknown request verb: {:?}",
                verb
            ))),
        }
    }

    /// Render the request as its wire command string
    pub fn command_line(&self) -> String {
        match self {
            Request::Put { name } => format!("PUT {}", name.as_deref().unwrap_or("")),
            Request::Get(lookup) => format!("GET {}", lookup.selector()),
            Request::Delete(lookup) => format!("DELETE {}", lookup.selector()),
            Request::Exit => "EXIT".to_string(),
            Request::Invalid => "INVALID REQUEST".to_string(),
        }
    }
}

impl Lookup {
    fn selector(&self) -> String {
        match self {
            Lookup::ByName(name) => format!("BY_NAME {}", name),
            Lookup::ById(id) => format!("BY_ID {}", id),
        }
    }
}

fn parse_lookup<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Lookup> {
    let mode = tokens.next().unwrap_or("");
    let value = tokens.next().unwrap_or("");

    match mode {
        "BY_NAME" => {
            if value.is_empty() {
                return Err(FileHubError::Protocol("missing file name".to_string()));
            }
            Ok(Lookup::ByName(value.to_string()))
        }
        "BY_ID" => {
            let id = value.parse().map_err(|_| {
                FileHubError::Protocol(format!("id must be numeric, got {:?}", value))
            })?;
            Ok(Lookup::ById(id))
        }
        _ => Err(FileHubError::Protocol(format!(
            "unknown lookup mode: {:?}",
            mode
        ))),
    }
}
