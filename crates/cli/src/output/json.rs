//! JSON output formatting

use anyhow::Result;
use entitle_core::{LicenseRecord, UpdateStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonLicense<'a> {
    pub command: &'a str,
    pub valid: bool,
    pub license: Option<&'a LicenseRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<'a> JsonLicense<'a> {
    pub fn new(command: &'a str, license: Option<&'a LicenseRecord>) -> Self {
        Self {
            command,
            valid: license.is_some_and(LicenseRecord::is_valid),
            license,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct JsonUpdate {
    pub current: String,
    pub latest: Option<String>,
    pub available: bool,
    /// `None` when the server withheld the package (no valid license).
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_url: Option<String>,
}

impl JsonUpdate {
    pub fn from_status(status: &UpdateStatus, purchase_url: &str) -> Self {
        match status {
            UpdateStatus::Available { current, info } => {
                let download_url = info.package().map(String::from);
                Self {
                    current: current.clone(),
                    latest: info.version.clone(),
                    available: true,
                    purchase_url: (download_url.is_none() && !purchase_url.is_empty())
                        .then(|| purchase_url.to_string()),
                    download_url,
                }
            }
            UpdateStatus::UpToDate { current, latest } => Self {
                current: current.clone(),
                latest: latest.clone(),
                available: false,
                download_url: None,
                purchase_url: None,
            },
        }
    }
}

/// Pretty-prints `value` to stdout.
pub fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
