use std::path::Path;

use scaleq_core::ScaleqConfig;

pub fn init(subscription: &str, resource_group: &str, region: &str, out: &Path) -> anyhow::Result<()> {
    if out.exists() {
        anyhow::bail!("{} already exists", out.display());
    }

    let config = ScaleqConfig::scaffold(subscription, resource_group, region);
    std::fs::write(out, config.to_toml_string()?)?;
    println!("✓ Generated {}", out.display());
    Ok(())
}
