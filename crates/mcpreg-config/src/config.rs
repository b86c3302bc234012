use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    error::{ConfigError, Result},
    shape::ApiShape,
    utils::xdg_config_home,
};

pub const CONFIG_ENV: &str = "MCPREG_CONFIG";
pub const DEFAULT_ENDPOINT: &str = "https://registry.modelcontextprotocol.io/v0/servers";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 100_000;

/// Ingester configuration.
///
/// Built once by the caller and handed to the ingestion driver; nothing here
/// is read from global state during a run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Registry listing endpoint.
    /// Default: https://registry.modelcontextprotocol.io/v0/servers
    pub endpoint: String,

    /// Entries requested per page (`limit` query parameter).
    /// Default: 100
    pub page_size: u32,

    /// Value of the `version` query parameter.
    /// Default: latest
    pub version_filter: String,

    /// SQLite database holding the snapshot.
    /// Default: registry.db
    pub db_path: PathBuf,

    /// User agent sent with every request.
    pub user_agent: Option<String>,

    /// Proxy URL for registry requests.
    pub proxy: Option<String>,

    /// Global timeout for a single request, in seconds.
    /// Unset leaves the HTTP client default in place.
    pub timeout_secs: Option<u64>,

    /// Key names of the listing API.
    pub api: ApiShape,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            version_filter: "latest".to_string(),
            db_path: PathBuf::from("registry.db"),
            user_agent: Some(default_user_agent()),
            proxy: None,
            timeout_secs: None,
            api: ApiShape::default(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("mcpreg/{}", env!("CARGO_PKG_VERSION"))
}

/// Location of the config file when none is given explicitly.
pub fn default_config_path() -> PathBuf {
    xdg_config_home().join("mcpreg").join("config.toml")
}

impl Config {
    /// Loads the configuration.
    ///
    /// Resolution order: `path`, then `$MCPREG_CONFIG`, then
    /// `$XDG_CONFIG_HOME/mcpreg/config.toml`. An explicitly named file must
    /// exist; a missing default file yields [`Config::default`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => {
                match env::var(CONFIG_ENV) {
                    Ok(path) => (PathBuf::from(path), true),
                    Err(_) => (default_config_path(), false),
                }
            }
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound && !explicit => {
                debug!("Config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::IoError {
                    action: format!("reading config file {}", path.display()),
                    source: err,
                });
            }
        };

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks values that would otherwise only fail mid-run.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)
            .map_err(|err| ConfigError::InvalidEndpoint(format!("{}: {err}", self.endpoint)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint(format!(
                "{}: unsupported scheme `{}`",
                self.endpoint,
                url.scheme()
            )));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.version_filter, "latest");
        assert_eq!(config.db_path, PathBuf::from("registry.db"));
        assert!(config.user_agent.unwrap().starts_with("mcpreg/"));
        assert!(config.timeout_secs.is_none());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = Config {
            endpoint: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));

        let config = Config {
            endpoint: "ftp://registry.example.com/servers".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_validate_rejects_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPageSize(0))
        ));
    }

    #[test]
    fn test_toml_roundtrip_keeps_overrides() {
        let config = Config {
            page_size: 25,
            db_path: PathBuf::from("/tmp/snapshot.db"),
            api: ApiShape::legacy(),
            ..Config::default()
        };

        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.page_size, 25);
        assert_eq!(parsed.db_path, PathBuf::from("/tmp/snapshot.db"));
        assert_eq!(parsed.api, ApiShape::legacy());
    }

    #[test]
    #[serial]
    fn test_load_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            endpoint = "http://localhost:8080/v0/servers"
            page_size = 10

            [api]
            cursor_keys = ["next_cursor"]
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/v0/servers");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.api.cursor_keys, vec!["next_cursor".to_string()]);
        assert_eq!(config.version_filter, "latest");
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::IoError { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_load_from_env_var() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("env.toml");
        fs::write(&path, "page_size = 42\n").unwrap();

        with_env(&[(CONFIG_ENV, path.to_str())], || {
            let config = Config::load(None).unwrap();
            assert_eq!(config.page_size, 42);
        });
    }

    #[test]
    #[serial]
    fn test_load_missing_default_uses_defaults() {
        let dir = tempdir().unwrap();
        with_env(
            &[(CONFIG_ENV, None), ("XDG_CONFIG_HOME", dir.path().to_str())],
            || {
                assert_eq!(Config::load(None).unwrap(), Config::default());
            },
        );
    }

    #[test]
    #[serial]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = 0\n").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::InvalidPageSize(0))
        ));
    }
}
