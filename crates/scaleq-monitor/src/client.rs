//! Management REST client for `microsoft.insights/autoscalesettings`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use scaleq_core::AzureConfig;

use crate::api::AutoscaleSettingsApi;
use crate::auth::TokenProvider;
use crate::error::{MonitorError, MonitorResult};
use crate::models::{AutoscaleSettingPage, AutoscaleSettingParams, AutoscaleSettingResource};

/// Upper bound on followed `nextLink`s, guarding against a looping server.
const MAX_PAGES: usize = 1_000;

/// Autoscale-settings client for the ARM management endpoint.
pub struct ArmMonitorClient {
    http: reqwest::Client,
    endpoint: String,
    subscription: String,
    api_version: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ArmMonitorClient {
    pub fn new(config: &AzureConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_http_client(config, tokens, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (proxies, timeouts).
    pub fn with_http_client(
        config: &AzureConfig,
        tokens: Arc<dyn TokenProvider>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            endpoint: config.management_endpoint.trim_end_matches('/').to_string(),
            subscription: config.subscription.clone(),
            api_version: config.api_version.clone(),
            tokens,
        }
    }

    fn collection_url(&self, resource_group: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/microsoft.insights/autoscalesettings",
            self.endpoint, self.subscription, resource_group
        )
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        with_api_version: bool,
        body: Option<&serde_json::Value>,
    ) -> MonitorResult<T> {
        let token = self.tokens.token().await?;

        let mut request = self.http.request(method.clone(), url).bearer_auth(token);
        if with_api_version {
            request = request.query(&[("api-version", self.api_version.as_str())]);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let err = MonitorError::from_response(status.as_u16(), &text);
            warn!(%method, url, status = status.as_u16(), error = %err, "management request failed");
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| MonitorError::Decode(format!("{url}: {e}")))
    }
}

#[async_trait]
impl AutoscaleSettingsApi for ArmMonitorClient {
    async fn list_by_resource_group(
        &self,
        resource_group: &str,
    ) -> MonitorResult<Vec<AutoscaleSettingResource>> {
        let mut settings = Vec::new();
        let first = self.collection_url(resource_group);
        let mut page: AutoscaleSettingPage = self.send(Method::GET, &first, true, None).await?;

        for _ in 0..MAX_PAGES {
            settings.append(&mut page.value);
            let Some(next) = page.next_link.take().filter(|l| !l.is_empty()) else {
                debug!(resource_group, count = settings.len(), "listed autoscale settings");
                return Ok(settings);
            };
            // nextLink already carries api-version and the continuation token.
            page = self.send(Method::GET, &next, false, None).await?;
        }

        Err(MonitorError::Decode(format!(
            "autoscale settings listing for {resource_group} exceeded {MAX_PAGES} pages"
        )))
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        params: &AutoscaleSettingParams,
    ) -> MonitorResult<AutoscaleSettingResource> {
        let url = format!("{}/{}", self.collection_url(resource_group), name);
        let body = serde_json::to_value(params.to_request_body())
            .map_err(|e| MonitorError::Decode(format!("encoding request: {e}")))?;

        debug!(resource_group, name, target = %params.target_resource_uri, "putting autoscale setting");
        self.send(Method::PUT, &url, true, Some(&body)).await
    }
}
