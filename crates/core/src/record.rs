//! Core types for the license record

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::LicenseResult;

/// Wire/storage name of the license key inside a record payload.
pub const KEY_FIELD: &str = "license_key";

/// The fixed set of record fields stored alongside the key.
pub const RECORD_FIELDS: &[&str] = &[
    "status",
    "expires",
    "site_count",
    "license_limit",
    "activations_left",
    "is_support_provided",
    "date_purchased",
    "date_supported_until",
    "date_updates_provided_until",
    "is_local",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Plugin,
    Theme,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Plugin => "plugin",
            ProductType::Theme => "theme",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-reported license state. Only `Valid` grants access.
///
/// Unknown strings are kept verbatim in `Other` so a newer server never
/// fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LicenseStatus {
    Valid,
    Invalid,
    Expired,
    Disabled,
    Revoked,
    Inactive,
    SiteInactive,
    NoActivationsLeft,
    KeyMismatch,
    ItemNameMismatch,
    Missing,
    Other(String),
}

impl LicenseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LicenseStatus::Valid => "valid",
            LicenseStatus::Invalid => "invalid",
            LicenseStatus::Expired => "expired",
            LicenseStatus::Disabled => "disabled",
            LicenseStatus::Revoked => "revoked",
            LicenseStatus::Inactive => "inactive",
            LicenseStatus::SiteInactive => "site_inactive",
            LicenseStatus::NoActivationsLeft => "no_activations_left",
            LicenseStatus::KeyMismatch => "key_mismatch",
            LicenseStatus::ItemNameMismatch => "item_name_mismatch",
            LicenseStatus::Missing => "missing",
            LicenseStatus::Other(s) => s,
        }
    }

    pub fn is_valid(&self) -> bool {
        *self == LicenseStatus::Valid
    }
}

impl From<&str> for LicenseStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "valid" => LicenseStatus::Valid,
            "invalid" => LicenseStatus::Invalid,
            "expired" => LicenseStatus::Expired,
            "disabled" => LicenseStatus::Disabled,
            "revoked" => LicenseStatus::Revoked,
            "inactive" => LicenseStatus::Inactive,
            "site_inactive" => LicenseStatus::SiteInactive,
            "no_activations_left" => LicenseStatus::NoActivationsLeft,
            "key_mismatch" => LicenseStatus::KeyMismatch,
            "item_name_mismatch" => LicenseStatus::ItemNameMismatch,
            "missing" => LicenseStatus::Missing,
            _ => LicenseStatus::Other(s.to_string()),
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LicenseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LicenseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Some servers send the legacy field as a boolean
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(LicenseStatus::from(s.as_str())),
            Value::Bool(true) => Ok(LicenseStatus::Valid),
            Value::Bool(false) => Ok(LicenseStatus::Invalid),
            other => Err(serde::de::Error::custom(format!(
                "expected license status string, got {other}"
            ))),
        }
    }
}

/// An expiry-like date that may be `"lifetime"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiry {
    Lifetime,
    On(String),
}

impl Expiry {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("lifetime") {
            Expiry::Lifetime
        } else {
            Expiry::On(s.trim().to_string())
        }
    }

    pub fn is_lifetime(&self) -> bool {
        matches!(self, Expiry::Lifetime)
    }

    /// Calendar date part of the value (`"2026-12-31 23:59:59"` -> 2026-12-31).
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Expiry::Lifetime => None,
            Expiry::On(s) => {
                let day = s.split_whitespace().next().unwrap_or(s);
                NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
            }
        }
    }

    /// True when the date is strictly before `today`. Lifetime and
    /// unparseable values never lapse.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date().is_some_and(|d| d < today)
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiry::Lifetime => f.write_str("lifetime"),
            Expiry::On(s) => f.write_str(s),
        }
    }
}

impl Serialize for Expiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A seat count where the server may answer `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seats {
    Unlimited,
    Count(u32),
}

impl Serialize for Seats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Seats::Unlimited => serializer.serialize_str("unlimited"),
            Seats::Count(n) => serializer.serialize_u32(*n),
        }
    }
}

impl fmt::Display for Seats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seats::Unlimited => f.write_str("unlimited"),
            Seats::Count(n) => write!(f, "{n}"),
        }
    }
}

/// The canonical entitlement snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    #[serde(rename = "license_key")]
    pub key: String,

    pub status: LicenseStatus,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_expiry"
    )]
    pub expires: Option<Expiry>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_u32"
    )]
    pub site_count: Option<u32>,

    /// `Count(0)` and `Unlimited` both mean no cap.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_seats"
    )]
    pub license_limit: Option<Seats>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_seats"
    )]
    pub activations_left: Option<Seats>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_string"
    )]
    pub date_purchased: Option<String>,

    #[serde(
        rename = "date_supported_until",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_expiry"
    )]
    pub support_until: Option<Expiry>,

    #[serde(
        rename = "date_updates_provided_until",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_expiry"
    )]
    pub updates_until: Option<Expiry>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_bool"
    )]
    pub is_support_provided: Option<bool>,

    /// Activated against a non-production domain. Display only.
    #[serde(rename = "is_local", default, deserialize_with = "de_bool")]
    pub is_local_environment: bool,
}

impl LicenseRecord {
    pub fn new(key: impl Into<String>, status: LicenseStatus) -> Self {
        Self {
            key: key.into(),
            status,
            expires: None,
            site_count: None,
            license_limit: None,
            activations_left: None,
            date_purchased: None,
            support_until: None,
            updates_until: None,
            is_support_provided: None,
            is_local_environment: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// Maximum number of activations, or `None` when uncapped.
    pub fn activation_cap(&self) -> Option<u32> {
        match self.license_limit {
            Some(Seats::Count(0)) | Some(Seats::Unlimited) | None => None,
            Some(Seats::Count(n)) => Some(n),
        }
    }

    pub fn has_unlimited_activations(&self) -> bool {
        self.activation_cap().is_none() || self.activations_left == Some(Seats::Unlimited)
    }

    /// Splits the record into its payload, leaving the key out.
    pub fn to_payload(&self) -> LicenseResult<Map<String, Value>> {
        let mut payload = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        payload.remove(KEY_FIELD);
        Ok(payload)
    }

    /// Rebuilds a record from a stored payload and its separately stored key.
    pub fn from_payload(key: &str, mut payload: Map<String, Value>) -> LicenseResult<Self> {
        payload.insert(KEY_FIELD.to_string(), Value::String(key.to_string()));
        Ok(serde_json::from_value(Value::Object(payload))?)
    }
}

// ── Lenient field parsing ────────────────────────────────────────
//
// License servers are loose with JSON types: counts arrive as strings,
// booleans as "1"/0, empty strings stand in for absent values.

fn de_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(lenient_u32(&Value::deserialize(d)?))
}

fn de_opt_seats<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Seats>, D::Error> {
    let value = Value::deserialize(d)?;
    if let Value::String(s) = &value {
        if s.trim().eq_ignore_ascii_case("unlimited") {
            return Ok(Some(Seats::Unlimited));
        }
    }
    Ok(lenient_u32(&value).map(Seats::Count))
}

pub(crate) fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn de_opt_expiry<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Expiry>, D::Error> {
    Ok(de_opt_string(d)?.map(|s| Expiry::parse(&s)))
}

fn de_opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(lenient_bool(&Value::deserialize(d)?))
}

fn de_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(lenient_bool(&Value::deserialize(d)?).unwrap_or(false))
}

fn lenient_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
