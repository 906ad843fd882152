pub mod ensure;
pub mod init;
pub mod list;
pub mod profile;

use std::path::Path;
use std::sync::Arc;

use scaleq_core::ScaleqConfig;
use scaleq_monitor::{ArmMonitorClient, token_provider_from_config};

/// Load config and build an authenticated management client from it.
pub fn connect(config_path: &Path) -> anyhow::Result<(ScaleqConfig, Arc<ArmMonitorClient>)> {
    let config = ScaleqConfig::from_file(config_path)
        .map_err(|e| anyhow::anyhow!("loading {}: {e}", config_path.display()))?;
    let tokens = token_provider_from_config(&config.auth, &config.azure.management_endpoint)?;
    let client = ArmMonitorClient::new(&config.azure, tokens);
    Ok((config, Arc::new(client)))
}

/// Capacity bounds must be ordered before anything is sent.
pub fn check_capacity(min: u32, max: u32) -> anyhow::Result<()> {
    if min > max {
        anyhow::bail!("--min ({min}) must not exceed --max ({max})");
    }
    Ok(())
}
