//! Endpoint discovery from REST-client `.http` request files.
//!
//! A request file like `get_servers.http` keeps the listing URL next to the
//! editor tooling used to poke at the API by hand:
//!
//! ```text
//! GET https://registry.modelcontextprotocol.io/v0/servers?limit=100
//! Accept: application/json
//! ```

use std::{fs, path::Path};

use crate::error::{ConfigError, Result};

/// Reads the request URL from the first line of a `.http` file.
///
/// Only `GET` requests are accepted. A trailing HTTP version token
/// (`HTTP/1.1`) is ignored, as are header lines after the request line.
///
/// # Errors
///
/// Returns [`ConfigError::IoError`] if the file cannot be read and
/// [`ConfigError::InvalidHttpFile`] if the request line is not `GET <url>`.
pub fn endpoint_from_http_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| {
        ConfigError::IoError {
            action: format!("reading HTTP request file {}", path.display()),
            source: err,
        }
    })?;

    parse_request_line(&content).map_err(|reason| {
        ConfigError::InvalidHttpFile {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    })
}

fn parse_request_line(content: &str) -> std::result::Result<String, &'static str> {
    let line = content.lines().next().unwrap_or_default().trim();

    let target = line
        .strip_prefix("GET ")
        .ok_or("request line does not start with `GET `")?;

    target
        .split_whitespace()
        .next()
        .map(String::from)
        .ok_or("request line has no URL")
}
