//! Page fetching against the registry listing endpoint.
//!
//! The listing is cursor paginated: each response carries an opaque token
//! for the next page, and its absence marks the last page.

use mcpreg_config::{ApiShape, Config};
use serde_json::Value;
use tracing::debug;
use ureq::{http::header::ACCEPT, Agent};
use url::Url;

use crate::{
    error::{RegistryError, Result},
    http_client::ClientConfig,
};

/// Longest slice of an error response body kept in [`RegistryError::Response`].
const ERROR_BODY_LIMIT: usize = 512;

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Raw entries, in source order.
    pub entries: Vec<Value>,
    /// Cursor for the following page; `None` on the last page.
    pub next_cursor: Option<String>,
}

/// A source of listing pages.
pub trait PageSource {
    /// Fetches the page at `cursor`, or the first page when `cursor` is `None`.
    fn fetch_page(&mut self, cursor: Option<&str>) -> Result<Page>;
}

/// Fetches listing pages over HTTP.
pub struct PageFetcher {
    agent: Agent,
    endpoint: Url,
    page_size: u32,
    version_filter: String,
    shape: ApiShape,
}

impl PageFetcher {
    /// Creates a fetcher from the endpoint, paging and client settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidUrl`] if the endpoint cannot be parsed,
    /// or [`RegistryError::InvalidProxy`] for an unusable proxy.
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|err| RegistryError::InvalidUrl(format!("{}: {err}", config.endpoint)))?;
        let agent = ClientConfig::from(config).build()?;

        Ok(Self {
            agent,
            endpoint,
            page_size: config.page_size,
            version_filter: config.version_filter.clone(),
            shape: config.api.clone(),
        })
    }

    /// Builds the request URL for `cursor`.
    ///
    /// Query parameters already present on the endpoint are kept, except the
    /// paging parameters this fetcher controls.
    pub fn page_url(&self, cursor: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !matches!(key.as_ref(), "limit" | "version" | "cursor"))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.extend_pairs(retained);
            query.append_pair("limit", &self.page_size.to_string());
            query.append_pair("version", &self.version_filter);
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }

        url
    }
}

impl PageSource for PageFetcher {
    fn fetch_page(&mut self, cursor: Option<&str>) -> Result<Page> {
        let url = self.page_url(cursor);
        debug!("Fetching registry page {}", url);

        let resp = self
            .agent
            .get(url.as_str())
            .header(ACCEPT, "application/json")
            .call()
            .map_err(|source| {
                RegistryError::Transport {
                    url: url.to_string(),
                    source,
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.into_body().read_to_string().unwrap_or_default();
            return Err(RegistryError::Response {
                url: url.to_string(),
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body = resp.into_body().read_to_vec().map_err(|source| {
            RegistryError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let page = parse_page(&body, &self.shape)?;
        debug!(
            entries = page.entries.len(),
            has_next = page.next_cursor.is_some(),
            "Fetched registry page"
        );
        Ok(page)
    }
}

/// Parses a listing response body.
///
/// # Errors
///
/// Returns [`RegistryError::MalformedPayload`] if the body is not a JSON
/// object, lacks the listing key, or holds something other than an array
/// under it, or if a cursor is present but not a string. An empty (or
/// `null`) listing is a valid, empty page.
pub fn parse_page(body: &[u8], shape: &ApiShape) -> Result<Page> {
    let envelope: Value = serde_json::from_slice(body)?;
    let Value::Object(mut envelope) = envelope else {
        return Err(RegistryError::MalformedPayload(
            "response body is not a JSON object".into(),
        ));
    };

    let entries = match envelope.remove(shape.listing_key.as_str()) {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) => Vec::new(),
        Some(_) => {
            return Err(RegistryError::MalformedPayload(format!(
                "`{}` is not an array",
                shape.listing_key
            )));
        }
        None => {
            return Err(RegistryError::MalformedPayload(format!(
                "response has no `{}` listing",
                shape.listing_key
            )));
        }
    };

    let next_cursor = match envelope.get(shape.metadata_key.as_str()) {
        None | Some(Value::Null) => None,
        Some(metadata @ Value::Object(_)) => next_cursor(metadata, &shape.cursor_keys)?,
        Some(_) => {
            return Err(RegistryError::MalformedPayload(format!(
                "`{}` is not an object",
                shape.metadata_key
            )));
        }
    };

    Ok(Page {
        entries,
        next_cursor,
    })
}

/// First non-empty string among `keys`. A cursor of any other type cannot be
/// followed, and dropping it would end paging early.
fn next_cursor(metadata: &Value, keys: &[String]) -> Result<Option<String>> {
    for key in keys {
        match metadata.get(key.as_str()) {
            None | Some(Value::Null) => {}
            Some(Value::String(cursor)) if cursor.is_empty() => {}
            Some(Value::String(cursor)) => return Ok(Some(cursor.clone())),
            Some(other) => {
                return Err(RegistryError::MalformedPayload(format!(
                    "cursor `{key}` is not a string: {other}"
                )));
            }
        }
    }
    Ok(None)
}
