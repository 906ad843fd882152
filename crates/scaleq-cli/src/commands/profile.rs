use scaleq_autoscale::create_auto_scale_profile;

pub fn profile(min: u32, max: u32, queue_uri: &str) -> anyhow::Result<()> {
    super::check_capacity(min, max)?;
    let profile = create_auto_scale_profile(min, max, queue_uri);
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
