//! Wire shape of the registry listing API.
//!
//! Every JSON key the ingester looks up to navigate a listing response lives
//! in [`ApiShape`]. The registry API changed its envelope between releases
//! (snake_case cursor keys, then camelCase; bare entries, then entries wrapped
//! in a `server` object with a sibling `_meta`), so the shape is part of the
//! configuration rather than hardcoded at the lookup sites.

use serde::{Deserialize, Serialize};

/// Namespace under `_meta` holding the fields assigned by the official registry.
pub const OFFICIAL_META_NAMESPACE: &str = "io.modelcontextprotocol.registry/official";

/// Key names used to navigate a listing response and its entries.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiShape {
    /// Top-level key holding the ordered array of entries.
    pub listing_key: String,

    /// Top-level key holding the pagination metadata object.
    pub metadata_key: String,

    /// Keys probed, in order, inside the metadata object for the next cursor.
    pub cursor_keys: Vec<String>,

    /// Key wrapping the server object inside each entry. Entries without the
    /// wrapper are read as bare server objects; an empty key disables
    /// unwrapping.
    pub entry_key: String,

    /// Key of the metadata object, either a sibling of the wrapped server or
    /// nested in the server itself.
    pub meta_key: String,

    /// Namespace inside the metadata object holding registry-assigned fields.
    pub meta_namespace: String,
}

impl ApiShape {
    /// Shape of the `v0.1` listing: entries wrapped as `{"server": {..}, "_meta": {..}}`.
    pub fn current() -> Self {
        Self {
            listing_key: "servers".into(),
            metadata_key: "metadata".into(),
            cursor_keys: vec!["nextCursor".into(), "next_cursor".into()],
            entry_key: "server".into(),
            meta_key: "_meta".into(),
            meta_namespace: OFFICIAL_META_NAMESPACE.into(),
        }
    }

    /// Shape of the early `v0` listing: bare server objects carrying their own `_meta`.
    pub fn legacy() -> Self {
        Self {
            entry_key: String::new(),
            ..Self::current()
        }
    }

    /// The wrapper key to unwrap, if any.
    pub fn wrapper(&self) -> Option<&str> {
        Some(self.entry_key.as_str()).filter(|key| !key.is_empty())
    }
}

impl Default for ApiShape {
    fn default() -> Self {
        Self::current()
    }
}
