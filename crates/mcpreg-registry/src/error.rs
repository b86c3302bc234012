//! Error types for the registry crate.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while fetching or normalizing registry listings.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Failed to reach {url}: {source}")]
    #[diagnostic(
        code(mcpreg_registry::transport),
        help("Check your network connection and the registry endpoint")
    )]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("{url} responded with HTTP {status}: {body}")]
    #[diagnostic(
        code(mcpreg_registry::response),
        help("The registry rejected the request; verify the endpoint and query parameters")
    )]
    Response {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Malformed registry payload: {0}")]
    #[diagnostic(
        code(mcpreg_registry::malformed_payload),
        help("The listing format may have changed; check the [api] section of the config")
    )]
    MalformedPayload(String),

    #[error("Invalid URL: {0}")]
    #[diagnostic(
        code(mcpreg_registry::invalid_url),
        help("Ensure the URL is valid and properly formatted")
    )]
    InvalidUrl(String),

    #[error("Invalid proxy {proxy}: {reason}")]
    #[diagnostic(code(mcpreg_registry::invalid_proxy))]
    InvalidProxy { proxy: String, reason: String },
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::MalformedPayload(err.to_string())
    }
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
