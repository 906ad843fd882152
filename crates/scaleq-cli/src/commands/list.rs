use std::path::Path;

use scaleq_monitor::AutoscaleSettingsApi;

pub async fn list(config_path: &Path, format: &str) -> anyhow::Result<()> {
    let (config, client) = super::connect(config_path)?;
    let settings = client
        .list_by_resource_group(&config.azure.resource_group)
        .await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        _ => {
            if settings.is_empty() {
                println!("no autoscale settings in {}", config.azure.resource_group);
            }
            for setting in &settings {
                println!(
                    "{}  {}  {}",
                    setting.name,
                    if setting.properties.enabled { "enabled " } else { "disabled" },
                    setting.target_resource_uri().unwrap_or("-"),
                );
                for profile in &setting.properties.profiles {
                    let cap = &profile.capacity;
                    println!(
                        "    profile {}  min={} max={} default={}",
                        profile.name, cap.minimum, cap.maximum, cap.default
                    );
                    for rule in &profile.rules {
                        let t = &rule.metric_trigger;
                        println!(
                            "      {} {:?} {} → {} {}",
                            t.metric_name,
                            t.operator,
                            t.threshold,
                            rule.scale_action.direction,
                            rule.scale_action.value
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
