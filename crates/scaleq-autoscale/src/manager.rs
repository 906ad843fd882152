//! Autoscale setup for scale sets.
//!
//! Checks the base resource group for an autoscale setting already
//! targeting a scale set and creates one from the given profile when none
//! exists. Provider failures are folded into the local `Error`.

use tracing::{info, warn};
use uuid::Uuid;

use scaleq_core::{AzureConfig, Error, ErrorCode, Region, ScalesetId};
use scaleq_monitor::{
    AutoscaleProfile, AutoscaleSettingParams, AutoscaleSettingResource, AutoscaleSettingsApi,
    MonitorError,
};

use crate::retry::{RetryPolicy, retry_on_auth_failure};

/// ARM resource URI of a scale set in the given group.
pub fn scaleset_resource_uri(subscription: &str, resource_group: &str, vmss: &ScalesetId) -> String {
    format!(
        "/subscriptions/{subscription}/resourceGroups/{resource_group}/providers/Microsoft.Compute/virtualMachineScaleSets/{vmss}"
    )
}

/// Creates autoscale settings for scale sets in the base resource group.
pub struct AutoscaleManager<A> {
    api: A,
    azure: AzureConfig,
    retry: RetryPolicy,
}

impl<A: AutoscaleSettingsApi> AutoscaleManager<A> {
    pub fn new(api: A, azure: AzureConfig) -> Self {
        Self {
            api,
            azure,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attach an autoscale setting to `vmss` unless it already has one.
    ///
    /// Returns `Ok(())` both when a setting was created and when one was
    /// already present.
    pub async fn add_auto_scale_to_vmss(
        &self,
        vmss: ScalesetId,
        profile: &AutoscaleProfile,
    ) -> Result<(), Error> {
        retry_on_auth_failure(&self.retry, "add_auto_scale_to_vmss", move || {
            self.try_add_auto_scale(vmss, profile)
        })
        .await
    }

    async fn try_add_auto_scale(
        &self,
        vmss: ScalesetId,
        profile: &AutoscaleProfile,
    ) -> Result<(), Error> {
        info!(%vmss, "checking scaleset for existing auto scale resources");

        if let Some(existing) = self.find_auto_scale_setting(vmss).await? {
            warn!(%vmss, setting = %existing.id, "scaleset already has auto scale resource");
            return Ok(());
        }

        let region = self.azure.region.clone();
        self.create_auto_scale_resource_for(vmss, &region, profile)
            .await
            .map(|_| ())
    }

    /// The autoscale setting whose target is `vmss`, if any.
    pub async fn find_auto_scale_setting(
        &self,
        vmss: ScalesetId,
    ) -> Result<Option<AutoscaleSettingResource>, Error> {
        let settings = self
            .api
            .list_by_resource_group(&self.azure.resource_group)
            .await
            .map_err(|e| {
                fold_monitor_error(
                    e,
                    ErrorCode::InvalidConfiguration,
                    format!("Failed to check if scaleset {vmss} already has an autoscale resource"),
                )
            })?;

        let suffix = vmss.to_string();
        Ok(settings
            .into_iter()
            .find(|s| targets_scaleset(s.target_resource_uri(), &suffix)))
    }

    /// Create an enabled autoscale setting for `vmss` in `location`.
    ///
    /// The setting gets a fresh random name; the profile is used as-is.
    pub async fn create_auto_scale_resource_for(
        &self,
        vmss: ScalesetId,
        location: &Region,
        profile: &AutoscaleProfile,
    ) -> Result<AutoscaleSettingResource, Error> {
        info!(%vmss, %location, "creating auto scale resource");

        let params = AutoscaleSettingParams {
            location: location.to_string(),
            profiles: vec![profile.clone()],
            target_resource_uri: scaleset_resource_uri(
                &self.azure.subscription,
                &self.azure.resource_group,
                &vmss,
            ),
            enabled: true,
        };
        let name = Uuid::new_v4().to_string();

        match self
            .api
            .create_or_update(&self.azure.resource_group, &name, &params)
            .await
        {
            Ok(resource) => {
                info!(%vmss, setting = %resource.id, "created auto scale resource");
                Ok(resource)
            }
            Err(e) => Err(fold_monitor_error(
                e,
                ErrorCode::UnableToCreate,
                format!(
                    "unable to create auto scale resource for resource: {vmss} with profile: {profile:?}"
                ),
            )),
        }
    }
}

/// Auth failures keep their own code so the retry wrapper can see them;
/// everything else becomes `code` with `message`.
fn fold_monitor_error(err: MonitorError, code: ErrorCode, message: String) -> Error {
    if err.is_auth_failure() {
        return Error::new(ErrorCode::Unauthorized, err.to_string());
    }
    warn!(error = %err, %code, "autoscale management call failed");
    Error::new(code, message)
}

/// ARM may return resource URIs with different casing than they were
/// created with.
fn targets_scaleset(target: Option<&str>, vmss: &str) -> bool {
    target.is_some_and(|uri| uri.to_ascii_lowercase().ends_with(&vmss.to_ascii_lowercase()))
}
