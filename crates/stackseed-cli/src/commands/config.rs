//! Config command implementation.
//!
//! Manages the scaffold parameters.

use anyhow::Result;
use stackseed_ops::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Stackseed Configuration");
    println!("{:-<40}", "");

    println!("Project:          {}", config.project_name);
    println!("Environment:      {}", config.environment);
    println!("Owner:            {}", config.owner);
    println!("Cost Center:      {}", config.cost_center);
    println!("AWS Region:       {}", config.aws_region);
    println!("Repositories:     {}", config.repositories.join(", "));
    println!("Image Retention:  {} images", config.image_retention_count);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    if !Config::keys().contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            Config::keys().join(", ")
        );
    }
    config.set(key, value)?;
    config.save()?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => anyhow::bail!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            Config::keys().join(", ")
        ),
    }
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("✅ Configuration reset to defaults");
    Ok(())
}

/// Show path to config file.
pub fn path() -> Result<()> {
    match Config::config_file_path() {
        Some(path) => println!("{}", path.display()),
        None => println!("(no config file path available)"),
    }
    Ok(())
}
