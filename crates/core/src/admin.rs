//! Admin request handling for a web license panel
//!
//! Transport-neutral: a front end maps its request into an [`AdminRequest`]
//! and writes the returned status code and JSON body back. Each request is
//! checked in order: anti-forgery token (403), privilege (403), required
//! input (400), then the operation itself (500 on failure).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::LicenseApi;
use crate::error::LicenseError;
use crate::installation::NonceGuard;
use crate::manager::LicenseManager;
use crate::store::LicenseStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminAction {
    Activate,
    Deactivate,
    Check,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Activate => "activate",
            AdminAction::Deactivate => "deactivate",
            AdminAction::Check => "check",
        }
    }

    /// Route name for this action, e.g. `my-plugin_license_activate`.
    pub fn hook_name(&self, product_slug: &str) -> String {
        format!("{product_slug}_license_{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRequest {
    pub action: AdminAction,
    /// Anti-forgery token submitted with the request
    #[serde(default, rename = "_wpnonce")]
    pub nonce: Option<String>,
    /// Whether the caller holds the license-management privilege
    #[serde(default)]
    pub can_manage: bool,
    #[serde(default)]
    pub license_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminResponse {
    pub status: u16,
    pub body: Value,
}

impl AdminResponse {
    fn success(data: Value) -> Self {
        Self {
            status: 200,
            body: json!({ "success": true, "data": data }),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "success": false, "data": { "message": message.into() } }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool) == Some(true)
    }

    /// Error message carried by a failed response.
    pub fn message(&self) -> Option<&str> {
        self.body
            .get("data")
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
    }
}

pub struct AdminHandler<'a, A, S> {
    manager: &'a LicenseManager<A, S>,
    guard: NonceGuard,
}

impl<'a, A: LicenseApi, S: LicenseStore> AdminHandler<'a, A, S> {
    pub fn new(manager: &'a LicenseManager<A, S>, guard: NonceGuard) -> Self {
        Self { manager, guard }
    }

    pub fn handle(&self, request: &AdminRequest) -> AdminResponse {
        let token_ok = request
            .nonce
            .as_deref()
            .is_some_and(|n| self.guard.verify(n));
        if !token_ok {
            return AdminResponse::error(403, "Invalid security token");
        }

        if !request.can_manage {
            return AdminResponse::error(403, "Unauthorized");
        }

        match request.action {
            AdminAction::Activate => self.activate(request.license_key.as_deref()),
            AdminAction::Deactivate => self.deactivate(),
            AdminAction::Check => self.check(),
        }
    }

    fn activate(&self, license_key: Option<&str>) -> AdminResponse {
        let key = license_key.map(str::trim).unwrap_or_default();
        if key.is_empty() {
            return AdminResponse::error(400, "License key is required");
        }

        let result = self
            .manager
            .activate(key)
            .and_then(|r| serde_json::to_value(r).map_err(LicenseError::from));
        match result {
            Ok(data) => AdminResponse::success(data),
            Err(e) => AdminResponse::error(500, e.to_string()),
        }
    }

    fn deactivate(&self) -> AdminResponse {
        match self.manager.deactivate() {
            Ok(_) => AdminResponse::success(json!([])),
            Err(e) => AdminResponse::error(500, e.to_string()),
        }
    }

    fn check(&self) -> AdminResponse {
        match self.manager.check() {
            Ok(Some(record)) => match serde_json::to_value(record) {
                Ok(data) => AdminResponse::success(data),
                Err(e) => AdminResponse::error(500, e.to_string()),
            },
            Ok(None) => AdminResponse::error(200, "No license found"),
            Err(e) => AdminResponse::error(500, e.to_string()),
        }
    }
}
