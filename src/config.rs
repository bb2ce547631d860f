// Gateway configuration.
// Endpoint URLs, headers and timeouts, with environment overrides.

use std::time::Duration;

use tracing::warn;

use crate::error::{GatewayError, Result};

pub const GITHUB_API_BASE: &str = "https://api.github.com/";
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the outbound HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL that REST paths are joined onto.
    pub api_base: String,
    /// Absolute URL of the GraphQL endpoint.
    pub graphql_url: String,
    pub user_agent: String,
    /// Value for the `X-GitHub-Api-Version` header.
    pub api_version: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            graphql_url: GITHUB_GRAPHQL_URL.to_string(),
            user_agent: concat!("hubgate/", env!("CARGO_PKG_VERSION")).to_string(),
            api_version: GITHUB_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Recognised variables: `HUBGATE_API_URL`, `HUBGATE_GRAPHQL_URL`,
    /// `HUBGATE_USER_AGENT`, `HUBGATE_TIMEOUT_SECS`. Unset or empty values keep
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("HUBGATE_API_URL") {
            config.api_base = url;
        }
        if let Some(url) = get("HUBGATE_GRAPHQL_URL") {
            config.graphql_url = url;
        }
        if let Some(agent) = get("HUBGATE_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(raw) = get("HUBGATE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid HUBGATE_TIMEOUT_SECS"),
            }
        }

        config
    }

    /// Join a REST path (with or without leading slash) onto the API base.
    pub fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Read an already-issued token from `GITHUB_TOKEN`.
pub fn token_from_env() -> Result<String> {
    std::env::var("GITHUB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or(GatewayError::MissingToken)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_target_github() {
        let config = GatewayConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.rest_url("user"), "https://api.github.com/user");
        assert!(config.user_agent.starts_with("hubgate/"));
    }

    #[test]
    fn test_env_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("HUBGATE_API_URL", "https://ghe.example.com/api/v3"),
            ("HUBGATE_GRAPHQL_URL", "https://ghe.example.com/api/graphql"),
            ("HUBGATE_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(
            config.rest_url("/repos/acme/widgets/labels"),
            "https://ghe.example.com/api/v3/repos/acme/widgets/labels"
        );
        assert_eq!(config.graphql_url, "https://ghe.example.com/api/graphql");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("HUBGATE_TIMEOUT_SECS", "soon"),
            ("HUBGATE_USER_AGENT", "  "),
        ]));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("hubgate/"));
    }
}
