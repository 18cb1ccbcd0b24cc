//! Response definitions
//!
//! Status responses sent back to clients.

use crate::error::{FileHubError, Result};

/// A response status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// `200`, or `200 <id>` when a PUT assigned an id
    Ok { id: Option<u64> },

    /// `400` — malformed or unknown request
    BadRequest,

    /// `403` — PUT target already exists
    Forbidden,

    /// `404` — name/id not found
    NotFound,
}

impl Response {
    /// Numeric status code
    pub fn code(&self) -> u16 {
        match self {
            Response::Ok { .. } => 200,
            Response::BadRequest => 400,
            Response::Forbidden => 403,
            Response::NotFound => 404,
        }
    }

    /// Render the status line sent on the wire
    pub fn status_line(&self) -> String {
        match self {
            Response::Ok { id: Some(id) } => format!("200 {}", id),
            Response::Ok { id: None } => "200".to_string(),
            other => other.code().to_string(),
        }
    }

    /// Parse a status line received from the server
    pub fn parse(line: &str) -> Result<Response> {
        let mut tokens = line.trim().split_whitespace();
        let code = tokens.next().unwrap_or("");

        match code {
            "200" => {
                let id = match tokens.next() {
                    Some(id_token) => Some(id_token.parse().map_err(|_| {
                        FileHubError::Protocol(format!("invalid id in response: {:?}", id_token))
                    })?),
                    None => None,
                };
                Ok(Response::Ok { id })
            }
            "400" => Ok(Response::BadRequest),
            "403" => Ok(Response::Forbidden),
            "404" => Ok(Response::NotFound),
            other => Err(FileHubError::Protocol(format!(
                "unknown response status: {:?}",
                other
            ))),
        }
    }
}
