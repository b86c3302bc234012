use std::time::Duration;

use mcpreg_config::{config::default_user_agent, Config};
use ureq::{Agent, Proxy};

use crate::error::{RegistryError, Result};

/// Settings for the HTTP agent used against the registry.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: Some(default_user_agent()),
            proxy: None,
            timeout: None,
        }
    }
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            proxy: config.proxy.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl ClientConfig {
    /// Builds an HTTP `Agent` from this configuration.
    ///
    /// Non-success statuses are returned as responses rather than errors so
    /// the caller can tell a refused request from an unreachable host.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidProxy`] if the proxy URL cannot be parsed.
    pub fn build(&self) -> Result<Agent> {
        let proxy = self
            .proxy
            .as_deref()
            .map(|proxy| {
                Proxy::new(proxy).map_err(|err| {
                    RegistryError::InvalidProxy {
                        proxy: proxy.to_string(),
                        reason: err.to_string(),
                    }
                })
            })
            .transpose()?;

        let mut config = Agent::config_builder()
            .proxy(proxy)
            .timeout_global(self.timeout)
            .http_status_as_error(false);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        Ok(config.build().into())
    }
}
