//! Raw entry normalization.
//!
//! Maps one listing entry, as returned by the registry, onto the
//! [`ServerRecord`]/[`RepositoryRecord`] pair the store persists. The mapping
//! is pure: no I/O, and identical input always yields identical records.
//!
//! Two entry layouts are understood. Early listings returned bare server
//! objects carrying their own `_meta`:
//!
//! ```json
//! { "name": "io.github.acme/search", "status": "active", "remotes": [..],
//!   "_meta": { "io.modelcontextprotocol.registry/official": { "id": "..", "is_latest": true } } }
//! ```
//!
//! Current listings wrap the server and move registry metadata beside it:
//!
//! ```json
//! { "server": { "name": "io.github.acme/search", "packages": [..] },
//!   "_meta": { "io.modelcontextprotocol.registry/official": { "status": "active", "isLatest": true } } }
//! ```

use mcpreg_config::ApiShape;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    error::{RegistryError, Result},
    record::{NormalizedEntry, RepositoryRecord, ServerRecord, ServerType},
};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexiBool {
    Bool(bool),
    String(String),
}

fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlexiBool>::deserialize(deserializer)? {
        Some(FlexiBool::Bool(b)) => Ok(Some(b)),
        Some(FlexiBool::String(s)) => {
            match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(true)),
                "false" | "no" | "0" => Ok(Some(false)),
                "" => Ok(None),
                _ => {
                    Err(de::Error::invalid_value(
                        de::Unexpected::Str(&s),
                        &"a valid boolean (true/false, yes/no, 1/0)",
                    ))
                }
            }
        }
        None => Ok(None),
    }
}

/// Server fields read from an entry. `remotes` and `packages` only matter
/// for classification, so their contents stay untyped.
#[derive(Deserialize)]
struct RawServer {
    name: String,
    description: Option<String>,
    status: Option<String>,
    version: Option<String>,
    remotes: Option<Value>,
    packages: Option<Value>,
    repository: Option<RawRepository>,
}

#[derive(Deserialize)]
struct RawRepository {
    url: Option<String>,
    source: Option<String>,
    subfolder: Option<String>,
    id: Option<String>,
}

/// Registry-assigned fields. Both spellings seen across API versions are
/// accepted; the three id keys are kept apart because newer listings send
/// `serverId` and `versionId` together.
#[derive(Default, Deserialize)]
struct OfficialMeta {
    id: Option<String>,
    #[serde(rename = "versionId")]
    version_id: Option<String>,
    #[serde(rename = "serverId")]
    server_id: Option<String>,
    #[serde(alias = "publishedAt")]
    published_at: Option<String>,
    #[serde(alias = "updatedAt")]
    updated_at: Option<String>,
    #[serde(default, alias = "isLatest", deserialize_with = "flexible_bool")]
    is_latest: Option<bool>,
    status: Option<String>,
}

/// Classifies a server by the collections it lists. Remotes win over packages.
pub fn classify(remotes: Option<&Value>, packages: Option<&Value>) -> ServerType {
    if has_items(remotes) {
        ServerType::Remote
    } else if has_items(packages) {
        ServerType::Local
    } else {
        ServerType::Unknown
    }
}

fn has_items(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        _ => false,
    }
}

/// Splits `developer/name` at the first `/`.
///
/// A name without `/` has no developer part. Further slashes stay in the name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.split_once('/') {
        Some((developer, name)) => (developer.to_string(), name.to_string()),
        None => (String::new(), full_name.to_string()),
    }
}

/// Normalizes one raw listing entry.
///
/// # Errors
///
/// Returns [`RegistryError::MalformedPayload`] if the entry (or its wrapped
/// server) is not an object, has no string `name`, or carries a field whose
/// type cannot be read (e.g. a numeric description). Absent optional fields
/// are never an error.
pub fn normalize(raw: &Value, shape: &ApiShape) -> Result<NormalizedEntry> {
    let entry = raw
        .as_object()
        .ok_or_else(|| malformed("registry entry is not a JSON object"))?;

    let (server, sibling_meta) = match shape.wrapper().and_then(|key| entry.get(key)) {
        Some(inner) => (inner, entry.get(shape.meta_key.as_str())),
        None => (raw, None),
    };

    let server_fields = server
        .as_object()
        .ok_or_else(|| malformed("registry entry server is not a JSON object"))?;

    let raw_server = RawServer::deserialize(server).map_err(|e| {
        let name = server_fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        malformed(format!("entry {name}: {e}"))
    })?;

    let meta = sibling_meta
        .or_else(|| server_fields.get(shape.meta_key.as_str()))
        .and_then(|meta| meta.get(shape.meta_namespace.as_str()))
        .filter(|official| !official.is_null())
        .map(OfficialMeta::deserialize)
        .transpose()
        .map_err(|e| malformed(format!("entry {}: registry metadata: {e}", raw_server.name)))?
        .unwrap_or_default();

    let server_type = classify(raw_server.remotes.as_ref(), raw_server.packages.as_ref());
    let (developer, name) = split_full_name(&raw_server.name);

    let repository = raw_server.repository.map(|repo| {
        RepositoryRecord {
            url: repo.url,
            source: repo.source,
            subfolder: repo.subfolder,
            repo_id: repo.id,
        }
    });

    let server = ServerRecord {
        developer,
        name,
        full_name: raw_server.name,
        description: raw_server.description,
        status: raw_server.status.or(meta.status),
        version: raw_server.version,
        server_type,
        registry_id: meta.id.or(meta.version_id).or(meta.server_id),
        published_at: meta.published_at,
        updated_at: meta.updated_at,
        is_latest: meta.is_latest,
    };

    Ok(NormalizedEntry { server, repository })
}

fn malformed(message: impl Into<String>) -> RegistryError {
    RegistryError::MalformedPayload(message.into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn legacy(raw: Value) -> NormalizedEntry {
        normalize(&raw, &ApiShape::legacy()).unwrap()
    }

    #[test]
    fn test_remote_entry_example() {
        let entry = legacy(json!({"name": "acme/search", "remotes": [{"type": "sse"}]}));

        assert_eq!(entry.server.developer, "acme");
        assert_eq!(entry.server.name, "search");
        assert_eq!(entry.server.full_name, "acme/search");
        assert_eq!(entry.server.server_type, ServerType::Remote);
        assert!(entry.repository.is_none());
    }

    #[test]
    fn test_classification() {
        let packages = json!([{"registry_name": "npm"}]);
        let remotes = json!([{"url": "https://mcp.example.com/sse"}]);

        assert_eq!(
            classify(Some(&remotes), Some(&packages)),
            ServerType::Remote
        );
        assert_eq!(classify(Some(&remotes), None), ServerType::Remote);
        assert_eq!(classify(Some(&json!([])), Some(&packages)), ServerType::Local);
        assert_eq!(classify(None, Some(&packages)), ServerType::Local);
        assert_eq!(classify(Some(&Value::Null), Some(&packages)), ServerType::Local);
        assert_eq!(classify(Some(&json!([])), Some(&json!([]))), ServerType::Unknown);
        assert_eq!(classify(None, None), ServerType::Unknown);
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("io.github.acme/search"),
            ("io.github.acme".to_string(), "search".to_string())
        );
        assert_eq!(
            split_full_name("acme/tools/search"),
            ("acme".to_string(), "tools/search".to_string())
        );
        assert_eq!(
            split_full_name("search"),
            (String::new(), "search".to_string())
        );
        assert_eq!(
            split_full_name("/search"),
            (String::new(), "search".to_string())
        );
    }

    #[test]
    fn test_legacy_entry_with_metadata() {
        let entry = legacy(json!({
            "name": "io.github.acme/files",
            "description": "Filesystem access",
            "status": "active",
            "version": "1.2.0",
            "packages": [{"registry_name": "npm", "name": "@acme/files"}],
            "repository": {
                "url": "https://github.com/acme/files",
                "source": "github",
                "id": "987654"
            },
            "_meta": {
                "io.modelcontextprotocol.registry/official": {
                    "id": "5f1c0e0a",
                    "published_at": "2025-09-08T10:00:00Z",
                    "updated_at": "2025-09-09T10:00:00Z",
                    "is_latest": true
                }
            }
        }));

        let server = entry.server;
        assert_eq!(server.developer, "io.github.acme");
        assert_eq!(server.name, "files");
        assert_eq!(server.server_type, ServerType::Local);
        assert_eq!(server.description.as_deref(), Some("Filesystem access"));
        assert_eq!(server.status.as_deref(), Some("active"));
        assert_eq!(server.version.as_deref(), Some("1.2.0"));
        assert_eq!(server.registry_id.as_deref(), Some("5f1c0e0a"));
        assert_eq!(server.published_at.as_deref(), Some("2025-09-08T10:00:00Z"));
        assert_eq!(server.updated_at.as_deref(), Some("2025-09-09T10:00:00Z"));
        assert_eq!(server.is_latest, Some(true));

        let repository = entry.repository.unwrap();
        assert_eq!(repository.url.as_deref(), Some("https://github.com/acme/files"));
        assert_eq!(repository.source.as_deref(), Some("github"));
        assert_eq!(repository.subfolder, None);
        assert_eq!(repository.repo_id.as_deref(), Some("987654"));
    }

    #[test]
    fn test_wrapped_entry_reads_sibling_meta() {
        let raw = json!({
            "server": {
                "name": "com.example/weather",
                "version": "0.4.0",
                "remotes": [{"type": "streamable-http", "url": "https://weather.example.com/mcp"}],
                "repository": {"url": "https://github.com/example/weather", "source": "github", "subfolder": "mcp"}
            },
            "_meta": {
                "io.modelcontextprotocol.registry/official": {
                    "serverId": "srv-1",
                    "versionId": "ver-9",
                    "status": "deprecated",
                    "publishedAt": "2025-10-01T00:00:00Z",
                    "updatedAt": "2025-10-02T00:00:00Z",
                    "isLatest": "yes"
                }
            }
        });

        let entry = normalize(&raw, &ApiShape::current()).unwrap();
        let server = entry.server;
        assert_eq!(server.developer, "com.example");
        assert_eq!(server.name, "weather");
        assert_eq!(server.server_type, ServerType::Remote);
        assert_eq!(server.status.as_deref(), Some("deprecated"));
        assert_eq!(server.registry_id.as_deref(), Some("ver-9"));
        assert_eq!(server.published_at.as_deref(), Some("2025-10-01T00:00:00Z"));
        assert_eq!(server.is_latest, Some(true));
        assert_eq!(
            entry.repository.unwrap().subfolder.as_deref(),
            Some("mcp")
        );
    }

    #[test]
    fn test_current_shape_reads_unwrapped_entry() {
        let raw = json!({
            "name": "solo",
            "_meta": {"io.modelcontextprotocol.registry/official": {"is_latest": false}}
        });

        let entry = normalize(&raw, &ApiShape::current()).unwrap();
        assert_eq!(entry.server.developer, "");
        assert_eq!(entry.server.name, "solo");
        assert_eq!(entry.server.is_latest, Some(false));
        assert_eq!(entry.server.server_type, ServerType::Unknown);
    }

    #[test]
    fn test_absent_fields_are_none() {
        let entry = legacy(json!({"name": "acme/bare"}));
        let server = entry.server;

        assert_eq!(server.description, None);
        assert_eq!(server.status, None);
        assert_eq!(server.version, None);
        assert_eq!(server.registry_id, None);
        assert_eq!(server.published_at, None);
        assert_eq!(server.updated_at, None);
        assert_eq!(server.is_latest, None);
        assert!(entry.repository.is_none());
    }

    #[test]
    fn test_null_fields_are_none() {
        let entry = legacy(json!({
            "name": "acme/nulls",
            "description": null,
            "repository": null,
            "remotes": null,
            "_meta": {"io.modelcontextprotocol.registry/official": null}
        }));

        assert_eq!(entry.server.description, None);
        assert_eq!(entry.server.server_type, ServerType::Unknown);
        assert!(entry.repository.is_none());
    }

    #[test]
    fn test_empty_repository_object_still_yields_record() {
        let entry = legacy(json!({"name": "acme/repo", "repository": {}}));
        assert_eq!(entry.repository, Some(RepositoryRecord::default()));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = json!({"name": "acme/search", "packages": [{}], "repository": {"url": "u"}});
        assert_eq!(
            normalize(&raw, &ApiShape::legacy()).unwrap(),
            normalize(&raw, &ApiShape::legacy()).unwrap()
        );
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let err = normalize(&json!({"description": "no name"}), &ApiShape::legacy()).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedPayload(_)));
    }

    #[test]
    fn test_non_object_entry_is_malformed() {
        let err = normalize(&json!("acme/search"), &ApiShape::current()).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedPayload(_)));

        let err = normalize(&json!({"server": 7}), &ApiShape::current()).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedPayload(_)));
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        let err = normalize(
            &json!({"name": "acme/search", "description": 42}),
            &ApiShape::legacy(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("acme/search"));
    }

    #[test]
    fn test_unparseable_latest_flag_is_malformed() {
        let raw = json!({
            "name": "acme/search",
            "_meta": {"io.modelcontextprotocol.registry/official": {"is_latest": "maybe"}}
        });
        assert!(normalize(&raw, &ApiShape::legacy()).is_err());
    }
}
