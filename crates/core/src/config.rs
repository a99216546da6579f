//! Configuration file parsing for entitle.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LicenseError, LicenseResult};
use crate::record::ProductType;
use crate::store::StorageShape;

/// Name of the configuration file looked up by [`EntitleConfig::find_and_load`].
pub const CONFIG_FILENAME: &str = "entitle.toml";

/// Main configuration structure for entitle.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitleConfig {
    #[serde(default)]
    pub product: ProductConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Product identifier used in endpoint paths and storage names
    #[serde(default)]
    pub slug: String,

    /// Product type: "plugin" or "theme"
    #[serde(default, rename = "type")]
    pub product_type: ProductType,

    /// Base URL of the license REST API
    #[serde(default)]
    pub api_base_url: String,

    /// Origin of this installation, sent so the server can bind the activation
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Installed version, used for update checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub purchase_url: String,

    #[serde(default)]
    pub support_url: String,

    #[serde(default)]
    pub renew_support_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding license files (default: ~/.config/entitle/)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// "composite" (one record file) or "per_field" (one file per field)
    #[serde(default)]
    pub shape: StorageShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            slug: String::new(),
            product_type: ProductType::default(),
            api_base_url: String::new(),
            site_url: default_site_url(),
            version: None,
            purchase_url: String::new(),
            support_url: String::new(),
            renew_support_url: String::new(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StorageConfig {
    /// Configured directory, or `~/.config/entitle/`.
    pub fn resolve_dir(&self) -> LicenseResult<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|d| d.join("entitle"))
                .ok_or_else(|| {
                    LicenseError::Config("Could not determine config directory".to_string())
                }),
        }
    }
}

impl EntitleConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> LicenseResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LicenseError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents)
            .map_err(|e| LicenseError::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Find and load entitle.toml from the current directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> LicenseResult<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> LicenseResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| LicenseError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Checks the settings every remote operation depends on.
    pub fn validate(&self) -> LicenseResult<()> {
        if self.product.slug.trim().is_empty() {
            return Err(LicenseError::Config(
                "product.slug is required".to_string(),
            ));
        }
        if self.product.api_base_url.trim().is_empty() {
            return Err(LicenseError::Config(
                "product.api_base_url is required".to_string(),
            ));
        }
        if self.client.timeout_secs == 0 {
            return Err(LicenseError::Config(
                "client.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
