//! Connection settings for the game-side API

use std::time::Duration;
use tracing::warn;

/// Port the RimWorld GM mod listens on by default
pub const DEFAULT_BASE_URL: &str = "http://localhost:18800";

/// Per-call timeout for tool invocations
pub const BRIDGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-call timeout for contract probes
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

const ENV_BASE_URL: &str = "RIMWORLD_GM_API_URL";
const ENV_TIMEOUT_SECS: &str = "RIMWORLD_GM_TIMEOUT_SECS";

/// Where the remote lives and how long to wait for it
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Base URL without trailing path, e.g. `http://localhost:18800`
    pub base_url: String,
    /// Bound on a single request, connect included
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: BRIDGE_TIMEOUT,
        }
    }
}

impl RemoteConfig {
    /// Settings used by contract probes
    pub fn probe(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: PROBE_TIMEOUT,
        }
    }

    /// Bridge settings with `RIMWORLD_GM_API_URL` / `RIMWORLD_GM_TIMEOUT_SECS` applied
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config.base_url = url;
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }

        config
    }

    /// Join a route path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RemoteConfig::default();
        assert_eq!(config.base_url, "http://localhost:18800");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_probe_timeout() {
        let config = RemoteConfig::probe("http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_url_joining() {
        let config = RemoteConfig::probe("http://127.0.0.1:9000/");
        assert_eq!(config.url("/state"), "http://127.0.0.1:9000/state");
        assert_eq!(config.url("health"), "http://127.0.0.1:9000/health");
    }
}
