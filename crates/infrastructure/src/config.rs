//! Harness configuration.
//!
//! Loaded from `REQRES_*` environment variables with the `config` crate;
//! anything unset falls back to the fixed contract of the service.

use std::time::Duration;

use config::{Config, Environment};
use reqres_application::{HttpClientError, UsersEndpoints};
use reqres_domain::{
    RequestSpec,
    contract::{
        DEFAULT_API_KEY, DEFAULT_BASE_PATH, DEFAULT_BASE_URI, DEFAULT_TIMEOUT_MS,
        DEFAULT_USER_AGENT,
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::ReqwestHttpClient;

/// Prefix of the environment variables read by [`HarnessConfig::from_env`].
pub const ENV_PREFIX: &str = "REQRES";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] HttpClientError),
}

/// Endpoint, credential and client settings of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Scheme and authority of the service.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    /// Path prefix of every resource.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Value of the `x-api-key` header.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_uri() -> String {
    DEFAULT_BASE_URI.to_string()
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            base_path: default_base_path(),
            api_key: default_api_key(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl HarnessConfig {
    /// Loads the configuration from `REQRES_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads the configuration from an explicit variable map instead of the
    /// process environment. Keys are full variable names, e.g. `REQRES_BASE_URI`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<config::Map<String, String>>();
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(map)))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        tracing::debug!(
            base_uri = %config.base_uri,
            base_path = %config.base_path,
            timeout_ms = config.timeout_ms,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Checks that the values can drive a run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a non-http(s) base URI or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_uri)
            .map_err(|e| ConfigError::Invalid(format!("base_uri '{}': {e}", self.base_uri)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_uri '{}' must use http or https",
                self.base_uri
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The spec shared by every request: base URI and base path, no credentials.
    #[must_use]
    pub fn anonymous_spec(&self) -> RequestSpec {
        RequestSpec::new("reqres", self.base_uri.clone()).with_base_path(self.base_path.clone())
    }

    /// Request factories for the users resource.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the resource templates do not parse.
    pub fn endpoints(&self) -> Result<UsersEndpoints, ConfigError> {
        UsersEndpoints::new(self.anonymous_spec(), &self.api_key)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// The reqwest adapter configured with this timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Client` if the client cannot be built.
    pub fn http_client(&self) -> Result<ReqwestHttpClient, ConfigError> {
        Ok(ReqwestHttpClient::new(self.timeout(), &self.user_agent)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_when_unset() {
        let config = HarnessConfig::from_vars(Vec::<(String, String)>::new()).expect("defaults");
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.base_uri, "https://reqres.in");
        assert_eq!(config.base_path, "/api");
        assert_eq!(config.api_key, "reqres-free-v1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let config = HarnessConfig::from_vars([
            ("REQRES_BASE_URI", "http://127.0.0.1:8080"),
            ("REQRES_API_KEY", "local-key"),
            ("REQRES_TIMEOUT_MS", "250"),
        ])
        .expect("overrides");

        assert_eq!(config.base_uri, "http://127.0.0.1:8080");
        assert_eq!(config.base_path, "/api");
        assert_eq!(config.api_key, "local-key");
        assert_eq!(config.timeout_ms, 250);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let scheme = HarnessConfig::from_vars([("REQRES_BASE_URI", "ftp://reqres.in")]);
        assert!(matches!(scheme, Err(ConfigError::Invalid(_))));

        let zero = HarnessConfig::from_vars([("REQRES_TIMEOUT_MS", "0")]);
        assert!(matches!(zero, Err(ConfigError::Invalid(_))));

        let garbage = HarnessConfig::from_vars([("REQRES_TIMEOUT_MS", "soon")]);
        assert!(matches!(garbage, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_endpoints_use_config() {
        let config = HarnessConfig {
            base_uri: "http://127.0.0.1:9000".to_string(),
            api_key: "k".to_string(),
            ..HarnessConfig::default()
        };
        let request = config
            .endpoints()
            .expect("endpoints")
            .get_user(2)
            .expect("request");
        assert_eq!(request.url.as_str(), "http://127.0.0.1:9000/api/users/2");
        assert_eq!(request.headers.get("x-api-key"), Some("k"));
    }
}
