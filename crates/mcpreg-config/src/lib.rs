//! Configuration for the mcpreg registry ingester.
//!
//! - [`config::Config`]: endpoint, paging, store location and HTTP client settings
//! - [`shape::ApiShape`]: the key names of the registry listing API
//! - [`http_file::endpoint_from_http_file`]: endpoint discovery from `.http` request files

pub mod config;
pub mod error;
pub mod http_file;
pub mod shape;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use shape::ApiShape;
