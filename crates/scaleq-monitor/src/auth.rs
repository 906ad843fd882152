//! Bearer-token acquisition for the management API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use scaleq_core::AuthConfig;

use crate::error::{MonitorError, MonitorResult};

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens for management API requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> MonitorResult<String>;
}

/// A pre-issued token, e.g. from `az account get-access-token`.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> MonitorResult<String> {
        Ok(self.0.clone())
    }
}

/// OAuth2 client-credentials flow against the Entra ID token endpoint.
///
/// The token is cached and reused until shortly before it expires.
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3_600
}

impl ClientSecretCredential {
    /// `resource` is the management endpoint the token is for; the scope
    /// requested is `{resource}/.default`.
    pub fn new(tenant_id: &str, client_id: &str, client_secret: &str, resource: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: format!("{}/.default", resource.trim_end_matches('/')),
            cached: Mutex::new(None),
        }
    }

    /// Override the login authority (sovereign clouds, tests).
    pub fn with_authority(mut self, authority: &str) -> Self {
        self.authority = authority.trim_end_matches('/').to_string();
        self
    }

    async fn fetch(&self) -> MonitorResult<TokenResponse> {
        let url = format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id);
        debug!(tenant = %self.tenant_id, client = %self.client_id, "requesting management token");

        let resp = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(MonitorError::Authentication(format!(
                "token request failed ({}): {}",
                status.as_u16(),
                body.trim()
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| MonitorError::Authentication(format!("invalid token response: {e}")))
    }
}

#[async_trait]
impl TokenProvider for ClientSecretCredential {
    async fn token(&self) -> MonitorResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(c) = cached.as_ref()
            && Instant::now() < c.refresh_at
        {
            return Ok(c.token.clone());
        }

        let fresh = self.fetch().await?;
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            token: fresh.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(fresh.access_token)
    }
}

/// Pick a token provider from config and the environment.
///
/// A pre-issued token (`token_env`) wins; otherwise the client-credentials
/// flow is used when tenant, client id and secret are all available.
pub fn token_provider_from_config(
    auth: &AuthConfig,
    management_endpoint: &str,
) -> MonitorResult<Arc<dyn TokenProvider>> {
    if let Some(var) = &auth.token_env
        && let Ok(token) = std::env::var(var)
        && !token.trim().is_empty()
    {
        debug!(env = %var, "using pre-issued management token");
        return Ok(Arc::new(StaticToken::new(token.trim())));
    }

    let secret = auth
        .client_secret_env
        .as_ref()
        .and_then(|var| std::env::var(var).ok())
        .filter(|s| !s.is_empty());

    match (&auth.tenant_id, &auth.client_id, secret) {
        (Some(tenant), Some(client), Some(secret)) => Ok(Arc::new(ClientSecretCredential::new(
            tenant,
            client,
            &secret,
            management_endpoint,
        ))),
        _ => Err(MonitorError::Authentication(
            "no credentials configured: set auth.token_env or tenant_id/client_id/client_secret_env"
                .to_string(),
        )),
    }
}
