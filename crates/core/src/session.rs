//! Presentation-facing license session
//!
//! Holds the state a license panel renders (`license`, `is_loading`, `error`)
//! and exposes activate/deactivate/refresh actions that keep it current.

use crate::client::LicenseApi;
use crate::error::{LicenseError, LicenseResult};
use crate::manager::LicenseManager;
use crate::record::LicenseRecord;
use crate::store::LicenseStore;

pub struct LicenseSession<A, S> {
    manager: LicenseManager<A, S>,
    license: Option<LicenseRecord>,
    is_loading: bool,
    error: Option<String>,
}

impl<A: LicenseApi, S: LicenseStore> LicenseSession<A, S> {
    /// Starts a session seeded with the cached record.
    pub fn new(manager: LicenseManager<A, S>) -> Self {
        let license = manager.status().ok().flatten();
        Self {
            manager,
            license,
            is_loading: false,
            error: None,
        }
    }

    pub fn license(&self) -> Option<&LicenseRecord> {
        self.license.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the held license is `valid`.
    pub fn is_activated(&self) -> bool {
        self.license.as_ref().is_some_and(LicenseRecord::is_valid)
    }

    pub fn manager(&self) -> &LicenseManager<A, S> {
        &self.manager
    }

    /// Activates `key`. The held license becomes the server's answer, valid or not.
    pub fn activate_license(&mut self, key: &str) -> LicenseResult<()> {
        self.begin();
        let result = self.manager.activate(key);
        self.finish(result, "Activation failed")
            .map(|record| self.license = Some(record))
    }

    pub fn deactivate_license(&mut self) -> LicenseResult<()> {
        self.begin();
        let result = self.manager.deactivate();
        self.finish(result, "Deactivation failed")
            .map(|_| self.license = None)
    }

    pub fn refresh_license(&mut self) -> LicenseResult<()> {
        self.begin();
        let result = self.manager.check();
        self.finish(result, "Failed to refresh license")
            .map(|record| self.license = record)
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: LicenseResult<T>, fallback: &str) -> LicenseResult<T> {
        self.is_loading = false;
        result.inspect_err(|e| self.error = Some(error_message(e, fallback)))
    }
}

fn error_message(e: &LicenseError, fallback: &str) -> String {
    let message = e.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
