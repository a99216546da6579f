//! CLI commands

pub mod activate;
pub mod check;
pub mod deactivate;
pub mod init;
pub mod purchase;
pub mod status;
pub mod updates;

use anyhow::{Context as _, Result};
use entitle_core::{EntitleConfig, FileStore, HttpLicenseClient, LicenseManager, UpdateCache};
use std::path::Path;
use tracing::debug;

use crate::OutputFormat;

/// Manager wired to the real license server and the on-disk store.
pub type CliManager = LicenseManager<HttpLicenseClient, FileStore>;

/// Loaded configuration plus global flags, shared by every command.
pub struct Context {
    pub config: EntitleConfig,
    pub format: OutputFormat,
}

impl Context {
    /// Loads `config_path`, or discovers entitle.toml from the current directory.
    pub fn load(config_path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let config = match config_path {
            Some(path) => EntitleConfig::from_file(path)?,
            None => {
                let cwd = std::env::current_dir().context("cannot read current directory")?;
                EntitleConfig::find_and_load(&cwd)?
            }
        };
        debug!(product = %config.product.slug, "configuration loaded");
        Ok(Self { config, format })
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn store(&self) -> Result<FileStore> {
        Ok(FileStore::from_config(&self.config)?)
    }

    /// Validates the configuration and builds the manager.
    pub fn manager(&self) -> Result<CliManager> {
        let client = HttpLicenseClient::from_config(&self.config)
            .context("entitle.toml is incomplete; run `entitle init` and fill in [product]")?;
        Ok(LicenseManager::new(client, self.store()?).with_update_cache(self.update_cache()?))
    }

    pub fn update_cache(&self) -> Result<UpdateCache> {
        let dir = self.config.storage.resolve_dir()?;
        Ok(UpdateCache::new(&dir, &self.config.product.slug))
    }
}
