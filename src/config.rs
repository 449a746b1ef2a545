//! Routing configuration: where agent members can be reached and how long
//! in-process agent calls may run.
//!
//! ```yaml
//! endpoints:
//!   base_url: http://agents.internal:8080
//!   endpoints:
//!     billing: http://billing:9000
//! local_agent_timeout_ms: 30000
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::a2a::{
    EndpointResolver, FallbackEndpointResolver, MapEndpointResolver, StaticEndpointResolver,
};

/// Shared base URL for every agent member.
pub const BASE_URL_ENV: &str = "PACK_AGENT_BASE_URL";

/// Prefix of per-member endpoint variables, e.g. `PACK_AGENT_ENDPOINT_BILLING`.
pub const ENDPOINT_ENV_PREFIX: &str = "PACK_AGENT_ENDPOINT_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

fn read_config<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or_default().to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// EndpointsConfig
// ---------------------------------------------------------------------------

/// Agent endpoint table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL used for members without their own entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-member base URLs.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

impl EndpointsConfig {
    /// Parse from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_config(path.as_ref())
    }

    /// Read `PACK_AGENT_BASE_URL` and `PACK_AGENT_ENDPOINT_<MEMBER>` from
    /// the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from `(name, value)` pairs shaped like environment variables.
    /// Member names are the lowercased variable suffix; empty values are
    /// ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let key = key.as_ref();
            let value: String = value.into();
            if value.is_empty() {
                continue;
            }
            if key == BASE_URL_ENV {
                config.base_url = Some(value);
            } else if let Some(member) = key.strip_prefix(ENDPOINT_ENV_PREFIX) {
                if !member.is_empty() {
                    config.endpoints.insert(member.to_lowercase(), value);
                }
            }
        }
        config
    }

    /// Overlay `other` on top of `self`: its base URL and entries win.
    pub fn merge(mut self, other: EndpointsConfig) -> Self {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        self.endpoints.extend(other.endpoints);
        self
    }

    /// Whether neither a base URL nor any entry is set.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty() && self.base_url.as_deref().map_or(true, str::is_empty)
    }

    /// Turn the table into a resolver.
    ///
    /// Only a base URL gives a static resolver. Entries give a map
    /// resolver, falling back to the base URL when one is set. An empty
    /// config gives `None`.
    pub fn into_resolver(self) -> Option<Arc<dyn EndpointResolver>> {
        let base_url = self.base_url.filter(|url| !url.is_empty());
        match (base_url, self.endpoints.is_empty()) {
            (None, true) => None,
            (Some(url), true) => Some(Arc::new(StaticEndpointResolver::new(url))),
            (None, false) => Some(Arc::new(MapEndpointResolver::new(self.endpoints))),
            (Some(url), false) => Some(Arc::new(FallbackEndpointResolver {
                endpoints: MapEndpointResolver::new(self.endpoints),
                fallback: StaticEndpointResolver::new(url),
            })),
        }
    }
}

// ---------------------------------------------------------------------------
// RoutingConfig
// ---------------------------------------------------------------------------

/// Everything session setup needs to route tool calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Upper bound for one in-process agent turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_agent_timeout_ms: Option<u64>,
}

impl RoutingConfig {
    /// Parse from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_config(path.as_ref())
    }

    /// Apply endpoint overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        self.endpoints = self.endpoints.merge(EndpointsConfig::from_env());
        self
    }

    /// The local agent timeout as a duration.
    pub fn local_agent_timeout(&self) -> Option<Duration> {
        self.local_agent_timeout_ms.map(Duration::from_millis)
    }
}
