//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use entitle_core::{
    normalize_response, Expiry, LicenseApi, LicenseError, LicenseRecord, LicenseResult,
    LicenseStatus, UpdateInfo,
};
use serde_json::Value;

enum Reply {
    Body(Value),
    Down,
}

/// Scripted license server that records every call it receives.
///
/// Actions without a scripted reply behave like an unreachable server.
#[derive(Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<&'static str, Reply>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `action` ("activate", "deactivate", "check", "update") with `body`.
    pub fn reply(self, action: &'static str, body: Value) -> Self {
        self.replies.lock().unwrap().insert(action, Reply::Body(body));
        self
    }

    pub fn down(self, action: &'static str) -> Self {
        self.replies.lock().unwrap().insert(action, Reply::Down);
        self
    }

    /// Calls received so far, formatted `action:key`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, action: &str, key: &str) -> LicenseResult<Value> {
        self.calls.lock().unwrap().push(format!("{action}:{key}"));
        match self.replies.lock().unwrap().get(action) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Down) | None => {
                Err(LicenseError::Server("connection refused".to_string()))
            }
        }
    }
}

impl LicenseApi for FakeApi {
    fn activate(&self, key: &str) -> LicenseResult<LicenseRecord> {
        normalize_response(self.respond("activate", key)?, key)
    }

    fn deactivate(&self, key: &str) -> LicenseResult<()> {
        normalize_response(self.respond("deactivate", key)?, key).map(|_| ())
    }

    fn check(&self, key: &str) -> LicenseResult<LicenseRecord> {
        normalize_response(self.respond("check", key)?, key)
    }

    fn fetch_update_info(&self, key: Option<&str>) -> LicenseResult<UpdateInfo> {
        let body = self.respond("update", key.unwrap_or_default())?;
        serde_json::from_value(body).map_err(|e| LicenseError::Server(e.to_string()))
    }
}

/// A valid lifetime license for `key`.
pub fn valid_record(key: &str) -> LicenseRecord {
    LicenseRecord {
        expires: Some(Expiry::Lifetime),
        ..LicenseRecord::new(key, LicenseStatus::Valid)
    }
}
