//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variable for the project endpoint.
pub const ENV_ENDPOINT: &str = "CODEAUTH_ENDPOINT";
/// Environment variable for the project ID.
pub const ENV_PROJECT_ID: &str = "CODEAUTH_PROJECT_ID";
/// Environment variable toggling the session cache.
pub const ENV_CACHE_ENABLED: &str = "CODEAUTH_CACHE_ENABLED";
/// Environment variable for the cache window in seconds.
pub const ENV_CACHE_DURATION: &str = "CODEAUTH_CACHE_DURATION";

/// Default cache window in seconds.
pub const DEFAULT_CACHE_DURATION_SECS: u64 = 30;

/// Windows below this many seconds barely mitigate rate limits.
pub const MIN_EFFECTIVE_CACHE_SECS: u64 = 15;

/// One configuration layer. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeAuthConfig {
    /// Project endpoint (host and optional path prefix, no scheme).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Project ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// `[cache]` section.
    #[serde(default)]
    pub cache: CacheSection,
}

/// `[cache]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    /// Whether session records are cached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Cache window in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

impl CodeAuthConfig {
    /// Create an empty config layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config layer from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another layer on top of this one (other takes priority).
    pub fn merge(&mut self, other: CodeAuthConfig) {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.project_id.is_some() {
            self.project_id = other.project_id;
        }
        if other.cache.enabled.is_some() {
            self.cache.enabled = other.cache.enabled;
        }
        if other.cache.duration_secs.is_some() {
            self.cache.duration_secs = other.cache.duration_secs;
        }
    }

    /// Apply `CODEAUTH_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `CODEAUTH_*` overrides using a custom variable lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(project_id) = get(ENV_PROJECT_ID) {
            self.project_id = Some(project_id);
        }
        if let Some(enabled) = get(ENV_CACHE_ENABLED) {
            self.cache.enabled = Some(parse_bool(ENV_CACHE_ENABLED, &enabled)?);
        }
        if let Some(secs) = get(ENV_CACHE_DURATION) {
            let secs = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_CACHE_DURATION.to_string(),
                value: secs.clone(),
            })?;
            self.cache.duration_secs = Some(secs);
        }
        Ok(())
    }

    /// Resolve the merged layers into concrete settings.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let endpoint = self
            .endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "endpoint".to_string(),
                env_var: ENV_ENDPOINT.to_string(),
            })?;

        let project_id = self
            .project_id
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "project_id".to_string(),
                env_var: ENV_PROJECT_ID.to_string(),
            })?;

        let duration_secs = self
            .cache
            .duration_secs
            .unwrap_or(DEFAULT_CACHE_DURATION_SECS);

        Ok(ResolvedConfig {
            endpoint,
            project_id,
            cache_enabled: self.cache.enabled.unwrap_or(true),
            cache_duration: Duration::from_secs(duration_secs),
        })
    }
}

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Project endpoint.
    pub endpoint: String,
    /// Project ID.
    pub project_id: String,
    /// Whether session records are cached.
    pub cache_enabled: bool,
    /// Cache window.
    pub cache_duration: Duration,
}

impl ResolvedConfig {
    /// Check if the cache window is too short to mitigate rate limits.
    pub fn has_short_cache_window(&self) -> bool {
        self.cache_enabled && self.cache_duration.as_secs() < MIN_EFFECTIVE_CACHE_SECS
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}
