use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CachePolicy;
use crate::retry::{OpKind, RetryPolicy};

/// Retry policy parameters (optional sections in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// Applies these overrides to a built-in policy of the given kind.
    pub fn to_policy(&self, kind: OpKind) -> RetryPolicy {
        let mut policy = match kind {
            OpKind::Query => RetryPolicy::query(),
            OpKind::Mutation => RetryPolicy::mutation(),
        };
        policy.ceiling = self.max_attempts;
        policy.base_delay = Duration::from_millis(self.base_delay_ms);
        policy.max_delay = Duration::from_millis(self.max_delay_ms);
        policy
    }
}

/// Cache lifetime parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached value is served without a network request.
    pub stale_after_secs: u64,
    /// Seconds an unsubscribed entry survives before being purged.
    pub evict_after_secs: u64,
}

impl CacheConfig {
    pub fn to_policy(&self) -> CachePolicy {
        CachePolicy::new(
            Duration::from_secs(self.stale_after_secs),
            Duration::from_secs(self.evict_after_secs),
        )
    }
}

/// Stored account identifiers (optional section in config.toml).
///
/// The bearer token is deliberately not part of the config file; it comes
/// from the `AEGIS_API_TOKEN` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub user_id: String,
    /// Identifier assigned by the payment provider, if the user ever subscribed.
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// Global configuration loaded from `~/.config/aegis/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AegisConfig {
    /// Base URL of the backend API.
    pub backend_url: String,
    /// Optional query retry overrides; built-in defaults otherwise.
    #[serde(default)]
    pub query_retry: Option<RetryConfig>,
    /// Optional mutation retry overrides; built-in defaults otherwise.
    #[serde(default)]
    pub mutation_retry: Option<RetryConfig>,
    /// Optional cache lifetime overrides; built-in defaults otherwise.
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    /// Signed-in account, once known.
    #[serde(default)]
    pub account: Option<AccountConfig>,
}

impl Default for AegisConfig {
    fn default() -> Self {
        Self {
            backend_url: "https://api.aegiswallet.app".to_string(),
            query_retry: None,
            mutation_retry: None,
            cache: None,
            account: None,
        }
    }
}

impl AegisConfig {
    pub fn query_policy(&self) -> RetryPolicy {
        self.query_retry
            .as_ref()
            .map(|c| c.to_policy(OpKind::Query))
            .unwrap_or_else(RetryPolicy::query)
    }

    pub fn mutation_policy(&self) -> RetryPolicy {
        self.mutation_retry
            .as_ref()
            .map(|c| c.to_policy(OpKind::Mutation))
            .unwrap_or_else(RetryPolicy::mutation)
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache
            .as_ref()
            .map(CacheConfig::to_policy)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("aegis")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AegisConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AegisConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AegisConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policies_match_builtins() {
        let cfg = AegisConfig::default();
        assert_eq!(cfg.query_policy().ceiling, 2);
        assert_eq!(cfg.query_policy().max_delay, Duration::from_millis(10_000));
        assert_eq!(cfg.mutation_policy().ceiling, 1);
        assert_eq!(cfg.mutation_policy().max_delay, Duration::from_millis(5_000));
        let cache = cfg.cache_policy();
        assert_eq!(cache.stale_after, Duration::from_secs(300));
        assert_eq!(cache.evict_after, Duration::from_secs(600));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = AegisConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AegisConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.backend_url, cfg.backend_url);
        assert!(parsed.query_retry.is_none());
        assert!(parsed.account.is_none());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            backend_url = "http://localhost:3000"

            [query_retry]
            max_attempts = 3
            base_delay_ms = 500
            max_delay_ms = 4000

            [cache]
            stale_after_secs = 60
            evict_after_secs = 120

            [account]
            user_id = "user-1"
            customer_id = "cus_123"
        "#;
        let cfg: AegisConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.backend_url, "http://localhost:3000");
        let policy = cfg.query_policy();
        assert_eq!(policy.ceiling, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_millis(4000));
        assert_eq!(cfg.cache_policy().stale_after, Duration::from_secs(60));
        let account = cfg.account.unwrap();
        assert_eq!(account.customer_id.as_deref(), Some("cus_123"));
    }
}
