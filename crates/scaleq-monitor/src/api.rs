//! The seam between orchestration and the autoscale management API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MonitorResult;
use crate::models::{AutoscaleSettingParams, AutoscaleSettingResource};

/// Autoscale-setting operations the orchestration layer needs.
#[async_trait]
pub trait AutoscaleSettingsApi: Send + Sync {
    /// Every autoscale setting in a resource group, across all pages.
    async fn list_by_resource_group(
        &self,
        resource_group: &str,
    ) -> MonitorResult<Vec<AutoscaleSettingResource>>;

    /// Create the named setting, or replace it if it already exists.
    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        params: &AutoscaleSettingParams,
    ) -> MonitorResult<AutoscaleSettingResource>;
}

#[async_trait]
impl<T: AutoscaleSettingsApi + ?Sized> AutoscaleSettingsApi for Arc<T> {
    async fn list_by_resource_group(
        &self,
        resource_group: &str,
    ) -> MonitorResult<Vec<AutoscaleSettingResource>> {
        (**self).list_by_resource_group(resource_group).await
    }

    async fn create_or_update(
        &self,
        resource_group: &str,
        name: &str,
        params: &AutoscaleSettingParams,
    ) -> MonitorResult<AutoscaleSettingResource> {
        (**self).create_or_update(resource_group, name, params).await
    }
}
