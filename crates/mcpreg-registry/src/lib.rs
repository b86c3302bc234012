//! Registry listing client for mcpreg.
//!
//! This crate pages through the MCP server registry listing and turns its raw
//! entries into flat records ready for persistence.
//!
//! # Overview
//!
//! - [`fetch::PageSource`]: anything that yields listing pages by cursor;
//!   [`fetch::PageFetcher`] is the HTTP implementation
//! - [`normalize::normalize`]: maps one raw entry to a [`record::ServerRecord`]
//!   and its optional [`record::RepositoryRecord`]
//!
//! # Example
//!
//! ```no_run
//! use mcpreg_config::Config;
//! use mcpreg_registry::{normalize, PageFetcher, PageSource};
//!
//! fn first_page(config: &Config) -> mcpreg_registry::Result<()> {
//!     let mut fetcher = PageFetcher::new(config)?;
//!     let page = fetcher.fetch_page(None)?;
//!     for raw in &page.entries {
//!         let entry = normalize(raw, &config.api)?;
//!         println!("{}", entry.server.full_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fetch;
pub mod http_client;
pub mod normalize;
pub mod record;

pub use error::{RegistryError, Result};
pub use fetch::{parse_page, Page, PageFetcher, PageSource};
pub use http_client::ClientConfig;
pub use normalize::normalize;
pub use record::{NormalizedEntry, RepositoryRecord, ServerRecord, ServerType};
