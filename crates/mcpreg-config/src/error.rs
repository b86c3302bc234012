use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(mcpreg_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(mcpreg_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Invalid registry endpoint: {0}")]
    #[diagnostic(
        code(mcpreg_config::invalid_endpoint),
        help("The endpoint must be an absolute http(s) URL, e.g. https://registry.modelcontextprotocol.io/v0/servers")
    )]
    InvalidEndpoint(String),

    #[error("Invalid page size: {0}")]
    #[diagnostic(
        code(mcpreg_config::invalid_page_size),
        help("Use a page size between 1 and 100000")
    )]
    InvalidPageSize(u32),

    #[error("Invalid HTTP request file {path}: {reason}")]
    #[diagnostic(
        code(mcpreg_config::invalid_http_file),
        help("The first line must read `GET <url>`")
    )]
    InvalidHttpFile { path: String, reason: String },

    #[error("Error while {action}")]
    #[diagnostic(code(mcpreg_config::io), help("Check file permissions and the path"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
