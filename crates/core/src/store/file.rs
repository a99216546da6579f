//! File-backed license store (~/.config/entitle/)
//!
//! Layout for product `my-plugin`:
//! - `my-plugin_license_key`: the key, plain text
//! - `my-plugin_license_data.json`: composite record payload
//! - `my-plugin_license_<field>.json`: one file per field (per-field shape)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::EntitleConfig;
use crate::error::LicenseResult;
use crate::record::{LicenseRecord, RECORD_FIELDS};

use super::{LicenseStore, StorageShape};

/// Durable license store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    prefix: String,
    shape: StorageShape,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, product_slug: &str, shape: StorageShape) -> Self {
        Self {
            dir: dir.into(),
            prefix: format!("{product_slug}_license"),
            shape,
        }
    }

    /// Store for the configured product, directory and shape.
    pub fn from_config(config: &EntitleConfig) -> LicenseResult<Self> {
        Ok(Self::new(
            config.storage.resolve_dir()?,
            &config.product.slug,
            config.storage.shape,
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn shape(&self) -> StorageShape {
        self.shape
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join(format!("{}_key", self.prefix))
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(format!("{}_data.json", self.prefix))
    }

    pub fn field_path(&self, field: &str) -> PathBuf {
        self.dir.join(format!("{}_{field}.json", self.prefix))
    }

    fn load_composite(&self) -> LicenseResult<Option<Map<String, Value>>> {
        let Some(content) = read_optional(&self.data_path())? else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) if !map.is_empty() => Ok(Some(map)),
            _ => Ok(None),
        }
    }

    fn load_fields(&self) -> LicenseResult<Option<Map<String, Value>>> {
        let mut map = Map::new();
        for field in RECORD_FIELDS {
            if let Some(content) = read_optional(&self.field_path(field))? {
                map.insert(field.to_string(), serde_json::from_str(&content)?);
            }
        }

        // A record without a confirmed status was never fully written
        if !map.contains_key("status") {
            return Ok(None);
        }
        Ok(Some(map))
    }
}

impl LicenseStore for FileStore {
    fn key(&self) -> LicenseResult<Option<String>> {
        let content = read_optional(&self.key_path())?;
        Ok(content
            .map(|c| c.trim().to_string())
            .filter(|k| !k.is_empty()))
    }

    fn set_key(&self, key: &str) -> LicenseResult<()> {
        write_atomic(&self.key_path(), key.trim())
    }

    fn delete_key(&self) -> LicenseResult<()> {
        remove_optional(&self.key_path())
    }

    fn record(&self) -> LicenseResult<Option<LicenseRecord>> {
        let Some(key) = self.key()? else {
            return Ok(None);
        };

        let payload = match self.shape {
            StorageShape::Composite => self.load_composite()?,
            StorageShape::PerField => self.load_fields()?,
        };

        payload
            .map(|map| LicenseRecord::from_payload(&key, map))
            .transpose()
    }

    fn set_record(&self, record: &LicenseRecord) -> LicenseResult<()> {
        let payload = record.to_payload()?;
        debug!(dir = %self.dir.display(), shape = ?self.shape, "writing license record");

        match self.shape {
            StorageShape::Composite => {
                let json = serde_json::to_string_pretty(&Value::Object(payload))?;
                write_atomic(&self.data_path(), &json)
            }
            StorageShape::PerField => {
                for field in RECORD_FIELDS {
                    let path = self.field_path(field);
                    match payload.get(*field) {
                        Some(value) => write_atomic(&path, &serde_json::to_string(value)?)?,
                        None => remove_optional(&path)?,
                    }
                }
                Ok(())
            }
        }
    }

    fn delete_record(&self) -> LicenseResult<()> {
        // Both layouts, so a shape change leaves nothing stale
        remove_optional(&self.data_path())?;
        for field in RECORD_FIELDS {
            remove_optional(&self.field_path(field))?;
        }
        Ok(())
    }
}

fn read_optional(path: &Path) -> LicenseResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_optional(path: &Path) -> LicenseResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Writes through a sibling temp file so readers never see a half-written entry.
fn write_atomic(path: &Path, contents: &str) -> LicenseResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
