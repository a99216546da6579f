//! HTTP client for the remote license server
//!
//! Every operation is a body-less `POST {base}/{action}/{slug}/{type}?key=..&url=..`
//! answered with JSON. Responses are normalized into a [`LicenseRecord`] or a
//! typed [`LicenseError`]; the client never touches the local cache.

use reqwest::header::ACCEPT;
use reqwest::Url;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{ClientConfig, EntitleConfig, ProductConfig};
use crate::error::{LicenseError, LicenseResult};
use crate::record::{LicenseRecord, ProductType, KEY_FIELD};
use crate::updates::UpdateInfo;

const DEFAULT_FAILURE_MESSAGE: &str = "License activation failed";
const INVALID_RESPONSE: &str = "Invalid API response";
const INVALID_UPDATE_RESPONSE: &str = "Invalid update server response";

/// Remote operations against the license server.
///
/// The key is always passed in by the caller; implementations must not
/// read or write local license state.
pub trait LicenseApi {
    /// Binds `key` to this installation.
    fn activate(&self, key: &str) -> LicenseResult<LicenseRecord>;

    /// Releases the activation of `key` for this installation.
    fn deactivate(&self, key: &str) -> LicenseResult<()>;

    /// Fetches the current server-side state of `key`.
    fn check(&self, key: &str) -> LicenseResult<LicenseRecord>;

    /// Fetches version and package metadata for the update pipeline.
    fn fetch_update_info(&self, key: Option<&str>) -> LicenseResult<UpdateInfo>;
}

impl<T: LicenseApi + ?Sized> LicenseApi for &T {
    fn activate(&self, key: &str) -> LicenseResult<LicenseRecord> {
        (**self).activate(key)
    }

    fn deactivate(&self, key: &str) -> LicenseResult<()> {
        (**self).deactivate(key)
    }

    fn check(&self, key: &str) -> LicenseResult<LicenseRecord> {
        (**self).check(key)
    }

    fn fetch_update_info(&self, key: Option<&str>) -> LicenseResult<UpdateInfo> {
        (**self).fetch_update_info(key)
    }
}

/// Blocking `reqwest` implementation of [`LicenseApi`].
pub struct HttpLicenseClient {
    http: reqwest::blocking::Client,
    base_url: String,
    product_slug: String,
    product_type: ProductType,
    site_url: String,
}

impl HttpLicenseClient {
    pub fn new(product: &ProductConfig, client: &ClientConfig) -> LicenseResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(client.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: product.api_base_url.trim_end_matches('/').to_string(),
            product_slug: product.slug.clone(),
            product_type: product.product_type,
            site_url: product.site_url.clone(),
        })
    }

    /// Validates the configuration and builds a client from it.
    pub fn from_config(config: &EntitleConfig) -> LicenseResult<Self> {
        config.validate()?;
        Self::new(&config.product, &config.client)
    }

    /// Full endpoint URL for `action` with key and origin query parameters.
    pub fn endpoint(&self, action: &str, key: &str) -> LicenseResult<Url> {
        let base = format!(
            "{}/{}/{}/{}",
            self.base_url, action, self.product_slug, self.product_type
        );
        Url::parse_with_params(&base, &[("key", key), ("url", self.site_url.as_str())])
            .map_err(|e| LicenseError::Config(format!("invalid api_base_url: {e}")))
    }

    /// Sends the request and returns the raw body of a 2xx response.
    fn post(&self, action: &str, key: &str) -> LicenseResult<String> {
        let url = self.endpoint(action, key)?;
        debug!(action, product = %self.product_slug, "license server request");

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = resp.status();
        let body = resp.text()?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from));
            return Err(LicenseError::Server(match detail {
                Some(msg) => format!("HTTP {status}: {msg}"),
                None => format!("HTTP {status}"),
            }));
        }

        Ok(body)
    }

    fn call(&self, action: &str, key: &str) -> LicenseResult<Value> {
        let body = self.post(action, key)?;
        serde_json::from_str(&body).map_err(|_| LicenseError::Server(INVALID_RESPONSE.to_string()))
    }
}

impl LicenseApi for HttpLicenseClient {
    fn activate(&self, key: &str) -> LicenseResult<LicenseRecord> {
        normalize_response(self.call("activate", key)?, key)
    }

    fn deactivate(&self, key: &str) -> LicenseResult<()> {
        match self.call("deactivate", key)? {
            Value::Object(map) => ensure_success(&map),
            _ => Err(LicenseError::Server(INVALID_RESPONSE.to_string())),
        }
    }

    fn check(&self, key: &str) -> LicenseResult<LicenseRecord> {
        normalize_response(self.call("check", key)?, key)
    }

    fn fetch_update_info(&self, key: Option<&str>) -> LicenseResult<UpdateInfo> {
        let body = self.post("update", key.unwrap_or_default())?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value)
                .map_err(|_| LicenseError::Server(INVALID_UPDATE_RESPONSE.to_string())),
            _ => Err(LicenseError::Server(INVALID_UPDATE_RESPONSE.to_string())),
        }
    }
}

/// Translates a license server response body into a record for `key`.
///
/// - a non-object body is a server error
/// - a falsy `success` is a validation error carrying `message`
/// - the legacy `license` field is renamed to `status`
/// - a response without any status is presumed `valid`
pub fn normalize_response(body: Value, key: &str) -> LicenseResult<LicenseRecord> {
    let Value::Object(mut map) = body else {
        return Err(LicenseError::Server(INVALID_RESPONSE.to_string()));
    };

    ensure_success(&map)?;

    match map.remove("license") {
        Some(legacy) if !legacy.is_null() => {
            map.insert("status".to_string(), legacy);
        }
        _ => {
            if map.get("status").map_or(true, Value::is_null) {
                map.insert("status".to_string(), Value::String("valid".to_string()));
            }
        }
    }

    map.insert(KEY_FIELD.to_string(), Value::String(key.to_string()));

    serde_json::from_value(Value::Object(map))
        .map_err(|e| LicenseError::Server(format!("{INVALID_RESPONSE}: {e}")))
}

/// Maps `success: false` (or any falsy value) to a validation error.
fn ensure_success(map: &Map<String, Value>) -> LicenseResult<()> {
    let failed = match map.get("success") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(_) => false,
    };

    if !failed {
        return Ok(());
    }

    let message = map
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(DEFAULT_FAILURE_MESSAGE);
    Err(LicenseError::Validation(message.to_string()))
}
