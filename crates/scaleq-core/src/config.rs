//! scaleq.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Region;

pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_AUTOSCALE_API_VERSION: &str = "2015-04-01";
pub const DEFAULT_AUTH_FAILURE_TRIES: u32 = 10;
pub const DEFAULT_AUTH_FAILURE_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleqConfig {
    pub azure: AzureConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Where autoscale settings live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureConfig {
    pub subscription: String,
    /// The base resource group holding both the scale sets and their
    /// autoscale settings.
    pub resource_group: String,
    /// The base region new autoscale settings are created in.
    pub region: Region,
    #[serde(default = "default_management_endpoint")]
    pub management_endpoint: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    /// Name of the environment variable holding the client secret.
    pub client_secret_env: Option<String>,
    /// Name of the environment variable holding a pre-issued bearer token.
    pub token_env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_auth_failure_tries")]
    pub auth_failure_tries: u32,
    #[serde(default = "default_auth_failure_delay_ms")]
    pub auth_failure_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            auth_failure_tries: DEFAULT_AUTH_FAILURE_TRIES,
            auth_failure_delay_ms: DEFAULT_AUTH_FAILURE_DELAY_MS,
        }
    }
}

impl RetryConfig {
    pub fn auth_failure_delay(&self) -> Duration {
        Duration::from_millis(self.auth_failure_delay_ms)
    }
}

fn default_management_endpoint() -> String {
    DEFAULT_MANAGEMENT_ENDPOINT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_AUTOSCALE_API_VERSION.to_string()
}

fn default_auth_failure_tries() -> u32 {
    DEFAULT_AUTH_FAILURE_TRIES
}

fn default_auth_failure_delay_ms() -> u64 {
    DEFAULT_AUTH_FAILURE_DELAY_MS
}

impl AzureConfig {
    pub fn new(subscription: &str, resource_group: &str, region: &str) -> Self {
        Self {
            subscription: subscription.to_string(),
            resource_group: resource_group.to_string(),
            region: Region::new(region),
            management_endpoint: default_management_endpoint(),
            api_version: default_api_version(),
        }
    }
}

impl ScaleqConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: ScaleqConfig = toml::from_str(content)?;
        if config.retry.auth_failure_tries == 0 {
            anyhow::bail!("retry.auth_failure_tries must be at least 1");
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a minimal scaleq.toml for one subscription/resource group.
    pub fn scaffold(subscription: &str, resource_group: &str, region: &str) -> Self {
        ScaleqConfig {
            azure: AzureConfig::new(subscription, resource_group, region),
            auth: AuthConfig {
                tenant_id: None,
                client_id: None,
                client_secret_env: Some("AZURE_CLIENT_SECRET".to_string()),
                token_env: Some("AZURE_ACCESS_TOKEN".to_string()),
            },
            retry: RetryConfig::default(),
        }
    }
}
