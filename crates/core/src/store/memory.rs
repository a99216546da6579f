//! In-memory license store

use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::error::{LicenseError, LicenseResult};
use crate::record::LicenseRecord;

use super::LicenseStore;

/// In-memory license store holding the key and record payload separately
#[derive(Default)]
pub struct MemoryStore {
    key: RwLock<Option<String>>,
    payload: RwLock<Option<Map<String, Value>>>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `record` and its key
    pub fn with_record(record: &LicenseRecord) -> LicenseResult<Self> {
        let store = Self::new();
        store.set_key(&record.key)?;
        store.set_record(record)?;
        Ok(store)
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> LicenseError {
    LicenseError::Storage(format!("lock poisoned: {e}"))
}

impl LicenseStore for MemoryStore {
    fn key(&self) -> LicenseResult<Option<String>> {
        let key = self.key.read().map_err(poisoned)?;
        Ok(key.clone().filter(|k| !k.trim().is_empty()))
    }

    fn set_key(&self, key: &str) -> LicenseResult<()> {
        let mut slot = self.key.write().map_err(poisoned)?;
        *slot = Some(key.trim().to_string());
        Ok(())
    }

    fn delete_key(&self) -> LicenseResult<()> {
        let mut slot = self.key.write().map_err(poisoned)?;
        *slot = None;
        Ok(())
    }

    fn record(&self) -> LicenseResult<Option<LicenseRecord>> {
        let Some(key) = self.key()? else {
            return Ok(None);
        };
        let payload = self.payload.read().map_err(poisoned)?;
        match payload.as_ref() {
            Some(map) if !map.is_empty() => {
                Ok(Some(LicenseRecord::from_payload(&key, map.clone())?))
            }
            _ => Ok(None),
        }
    }

    fn set_record(&self, record: &LicenseRecord) -> LicenseResult<()> {
        let data = record.to_payload()?;
        let mut payload = self.payload.write().map_err(poisoned)?;
        *payload = Some(data);
        Ok(())
    }

    fn delete_record(&self) -> LicenseResult<()> {
        let mut payload = self.payload.write().map_err(poisoned)?;
        *payload = None;
        Ok(())
    }
}
