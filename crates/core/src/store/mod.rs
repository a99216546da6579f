//! License storage abstraction layer
//!
//! Provides a `LicenseStore` trait that decouples the reconciliation engine from
//! the persistence mechanism. Two implementations:
//! - `FileStore`: durable storage under a config directory, composite or per-field
//! - `MemoryStore`: in-process storage for embedding and tests
//!
//! The key is stored independently of the record payload. A record only exists
//! while a key is stored, so `record()` is `None` whenever `key()` is.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::error::LicenseResult;
use crate::record::LicenseRecord;

/// How a [`FileStore`] lays out the record payload on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageShape {
    /// One composite record file per product.
    #[default]
    Composite,
    /// One file per record field.
    PerField,
}

/// Durable key/value store for one license record per product.
pub trait LicenseStore {
    /// Stored license key, if any.
    fn key(&self) -> LicenseResult<Option<String>>;

    fn set_key(&self, key: &str) -> LicenseResult<()>;

    fn delete_key(&self) -> LicenseResult<()>;

    /// Stored record. Always `None` when no key is stored, even if leftover
    /// payload data exists.
    fn record(&self) -> LicenseResult<Option<LicenseRecord>>;

    /// Persists the record payload. The key inside `record` is never written here.
    fn set_record(&self, record: &LicenseRecord) -> LicenseResult<()>;

    fn delete_record(&self) -> LicenseResult<()>;

    /// Deletes key and record. Both deletions are attempted; the first error wins.
    fn clear(&self) -> LicenseResult<()> {
        let key = self.delete_key();
        let record = self.delete_record();
        key.and(record)
    }
}

impl<T: LicenseStore + ?Sized> LicenseStore for &T {
    fn key(&self) -> LicenseResult<Option<String>> {
        (**self).key()
    }

    fn set_key(&self, key: &str) -> LicenseResult<()> {
        (**self).set_key(key)
    }

    fn delete_key(&self) -> LicenseResult<()> {
        (**self).delete_key()
    }

    fn record(&self) -> LicenseResult<Option<LicenseRecord>> {
        (**self).record()
    }

    fn set_record(&self, record: &LicenseRecord) -> LicenseResult<()> {
        (**self).set_record(record)
    }

    fn delete_record(&self) -> LicenseResult<()> {
        (**self).delete_record()
    }

    fn clear(&self) -> LicenseResult<()> {
        (**self).clear()
    }
}
