use std::path::Path;
use std::sync::Arc;

use tracing::info;

use scaleq_autoscale::{AutoscaleManager, RetryPolicy, create_auto_scale_profile};
use scaleq_core::{AzureConfig, ScalesetId};
use scaleq_monitor::{
    AutoscaleProfile, AutoscaleSettingResource, AutoscaleSettingsApi, InMemoryAutoscaleSettings,
};

pub struct EnsureArgs<'a> {
    pub config_path: &'a Path,
    pub scaleset: &'a str,
    pub min: u32,
    pub max: u32,
    pub queue_uri: &'a str,
    pub dry_run: bool,
}

pub async fn ensure(args: EnsureArgs<'_>) -> anyhow::Result<()> {
    super::check_capacity(args.min, args.max)?;
    let vmss: ScalesetId = args
        .scaleset
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid scaleset id {:?}: {e}", args.scaleset))?;
    let profile = create_auto_scale_profile(args.min, args.max, args.queue_uri);

    let (config, client) = super::connect(args.config_path)?;

    if args.dry_run {
        // Read-only: the real group is listed, the create lands in memory.
        let existing = client
            .list_by_resource_group(&config.azure.resource_group)
            .await?;
        match plan(existing, &config.azure, vmss, &profile).await? {
            Some(planned) => println!("{}", serde_json::to_string_pretty(&planned)?),
            None => println!("✓ {vmss} already has an autoscale setting; nothing to create"),
        }
        return Ok(());
    }

    let manager = AutoscaleManager::new(client, config.azure.clone())
        .with_retry_policy(RetryPolicy::from(&config.retry));

    manager.add_auto_scale_to_vmss(vmss, &profile).await?;
    info!(%vmss, "scaleset autoscale ensured");
    println!("✓ {vmss} has an autoscale setting");
    Ok(())
}

/// The setting `add_auto_scale_to_vmss` would create given the group's
/// current settings, or `None` when the scale set is already covered.
async fn plan(
    existing: Vec<AutoscaleSettingResource>,
    azure: &AzureConfig,
    vmss: ScalesetId,
    profile: &AutoscaleProfile,
) -> anyhow::Result<Option<AutoscaleSettingResource>> {
    let api = Arc::new(InMemoryAutoscaleSettings::new(&azure.subscription));
    for setting in existing {
        api.insert(&azure.resource_group, setting);
    }

    let manager = AutoscaleManager::new(api.clone(), azure.clone());
    manager.add_auto_scale_to_vmss(vmss, profile).await?;

    if api.create_calls() == 0 {
        return Ok(None);
    }
    Ok(api.settings(&azure.resource_group).pop())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct/services/queue/queues/pool";

    fn azure() -> AzureConfig {
        AzureConfig::new("sub", "rg", "eastus")
    }

    #[tokio::test]
    async fn plans_creation_for_unconfigured_scaleset() {
        let vmss = ScalesetId::new_v4();
        let profile = create_auto_scale_profile(0, 3, QUEUE);

        let planned = plan(vec![], &azure(), vmss, &profile).await.unwrap().unwrap();
        assert_eq!(
            planned.target_resource_uri(),
            Some(scaleq_autoscale::scaleset_resource_uri("sub", "rg", &vmss).as_str())
        );
        assert_eq!(planned.properties.profiles, vec![profile]);
    }

    #[tokio::test]
    async fn plans_nothing_when_real_group_already_covers_scaleset() {
        let vmss = ScalesetId::new_v4();
        let profile = create_auto_scale_profile(0, 3, QUEUE);

        // What the live group already holds, as the list call returns it.
        let covered = plan(vec![], &azure(), vmss, &profile).await.unwrap().unwrap();
        let planned = plan(vec![covered], &azure(), vmss, &profile).await.unwrap();
        assert!(planned.is_none());
    }
}
