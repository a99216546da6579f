//! License state reconciliation
//!
//! [`LicenseManager`] orchestrates a [`LicenseApi`] and a [`LicenseStore`]:
//!
//! 1. `activate` caches only records the server confirms as `valid`
//! 2. `deactivate` always clears local state once a key exists, whatever the server says
//! 3. `check` refreshes the cache, falling back to the last known record when the
//!    server is unreachable
//!
//! No lock wraps the read-modify-write sequences; concurrent callers race and
//! the last store write wins. A stale cache heals on the next `check`.
//!
//! When an [`UpdateCache`] is attached it is dropped whenever the stored
//! license changes, since the update package URL depends on the license.

use tracing::{debug, info, warn};

use crate::client::LicenseApi;
use crate::error::{LicenseError, LicenseResult};
use crate::record::LicenseRecord;
use crate::store::LicenseStore;
use crate::updates::UpdateCache;

/// Outcome of a local deactivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deactivation {
    /// The key that was removed.
    pub key: String,
    /// Why the server-side release failed, if it did.
    pub remote_error: Option<String>,
}

impl Deactivation {
    pub fn released_remotely(&self) -> bool {
        self.remote_error.is_none()
    }
}

pub struct LicenseManager<A, S> {
    api: A,
    store: S,
    update_cache: Option<UpdateCache>,
}

impl<A: LicenseApi, S: LicenseStore> LicenseManager<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            update_cache: None,
        }
    }

    /// Clears `cache` whenever the stored license is written or removed.
    pub fn with_update_cache(mut self, cache: UpdateCache) -> Self {
        self.update_cache = Some(cache);
        self
    }

    pub fn update_cache(&self) -> Option<&UpdateCache> {
        self.update_cache.as_ref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Activates `key` against the server.
    ///
    /// The returned record may be non-valid; only a `valid` record (and its key)
    /// is written to the store, so a failed activation never replaces a working
    /// license. A blank key fails before any network call. If the record cannot
    /// be written the previous key is restored, or the store cleared when there
    /// was none.
    pub fn activate(&self, key: &str) -> LicenseResult<LicenseRecord> {
        let key = key.trim();
        if key.is_empty() {
            return Err(LicenseError::Validation("License key is required".to_string()));
        }
        let record = self.api.activate(key)?;

        if record.is_valid() {
            let previous = self.store.key()?;
            self.store.set_key(key)?;
            if let Err(e) = self.store.set_record(&record) {
                self.rollback_key(previous.as_deref());
                return Err(e);
            }
            self.invalidate_updates();
            info!(status = %record.status, "license activated");
        } else {
            info!(status = %record.status, "activation returned a non-valid license; cache left untouched");
        }

        Ok(record)
    }

    /// Removes the local license, releasing the activation remotely when possible.
    ///
    /// Fails with [`LicenseError::NoLicenseKey`] before any network call when no
    /// key is stored. Once a key exists the local data is always cleared.
    pub fn deactivate(&self) -> LicenseResult<Deactivation> {
        let key = self.store.key()?.ok_or(LicenseError::NoLicenseKey)?;

        let remote_error = match self.api.deactivate(&key) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "remote deactivation failed; clearing local license anyway");
                Some(e.to_string())
            }
        };

        self.store.clear()?;
        self.invalidate_updates();
        info!(released_remotely = remote_error.is_none(), "license deactivated");

        Ok(Deactivation { key, remote_error })
    }

    /// Refreshes the cached record from the server.
    ///
    /// Returns `Ok(None)` without a network call when no key is stored. On a
    /// server error the cached record is returned instead; if there is none the
    /// error propagates. Validation errors always propagate.
    pub fn check(&self) -> LicenseResult<Option<LicenseRecord>> {
        let Some(key) = self.store.key()? else {
            debug!("no license key stored; skipping check");
            return Ok(None);
        };

        match self.api.check(&key) {
            Ok(record) => {
                self.store.set_record(&record)?;
                self.invalidate_updates();
                info!(status = %record.status, "license refreshed");
                Ok(Some(record))
            }
            Err(e) if e.is_transient() => match self.store.record() {
                Ok(Some(cached)) => {
                    warn!(error = %e, "license server unreachable; using cached license");
                    Ok(Some(cached))
                }
                Ok(None) => Err(e),
                Err(read) => {
                    warn!(error = %read, "cached license unreadable; no fallback available");
                    Err(e)
                }
            },
            Err(e) => Err(e),
        }
    }

    /// True iff a record is stored and its status is `valid`. Local only.
    pub fn is_valid(&self) -> bool {
        matches!(self.store.record(), Ok(Some(record)) if record.is_valid())
    }

    /// The cached record, without contacting the server.
    pub fn status(&self) -> LicenseResult<Option<LicenseRecord>> {
        self.store.record()
    }

    fn rollback_key(&self, previous: Option<&str>) {
        let restored = match previous {
            Some(key) => self.store.set_key(key),
            None => self.store.clear(),
        };
        match restored {
            Ok(()) => warn!("could not store activated license; previous key restored"),
            Err(e) => warn!(error = %e, "could not restore previous license key"),
        }
    }

    fn invalidate_updates(&self) {
        if let Some(cache) = &self.update_cache {
            if let Err(e) = cache.clear() {
                warn!(error = %e, "could not clear update cache");
            }
        }
    }
}
