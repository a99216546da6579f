//! Initialize entitle.toml configuration

use anyhow::Result;
use entitle_core::config::CONFIG_FILENAME;
use entitle_core::EntitleConfig;
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(CONFIG_FILENAME);

    if config_path.exists() {
        println!("⚠️  {} already exists at {:?}", CONFIG_FILENAME, config_path);
        return Ok(());
    }

    let config = starter_config();
    config.save(&config_path)?;

    println!("✅ Created {} at {:?}", CONFIG_FILENAME, config_path);
    println!("\nSet product.slug and product.api_base_url, then run:");
    println!("  entitle activate <KEY>");

    Ok(())
}

/// Defaults with placeholder product settings to edit.
pub fn starter_config() -> EntitleConfig {
    let mut config = EntitleConfig::default();
    config.product.slug = "my-plugin".to_string();
    config.product.api_base_url = "https://example.com/wp-json/license/v1".to_string();
    config.product.version = Some("1.0.0".to_string());
    config
}
