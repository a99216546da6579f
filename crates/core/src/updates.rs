//! Update metadata from the license server
//!
//! The update endpoint answers with version and package details for the
//! installed product. Responses are cached for 24 hours and the cache is
//! dropped whenever the license changes, since the package URL depends on it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::client::LicenseApi;
use crate::error::LicenseResult;
use crate::manager::LicenseManager;
use crate::record::de_opt_string;
use crate::store::LicenseStore;

const UPDATE_CACHE_TTL_SECS: u64 = 24 * 60 * 60; // 24 hours

/// Version/package metadata returned by the update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_opt_string"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tested: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_php: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub sections: Map<String, Value>,
}

impl UpdateInfo {
    /// Download URL, when the server granted one (it withholds it without a valid license).
    pub fn package(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// True when the advertised version is strictly newer than `current`.
    pub fn is_newer_than(&self, current: &str) -> bool {
        self.version
            .as_deref()
            .is_some_and(|v| compare_versions(v, current) == Ordering::Greater)
    }
}

/// Compares dotted version strings component by component.
///
/// Numeric components compare as numbers, others lexically; a missing
/// component counts as `0`. Numeric components outrank textual ones, so
/// `1.0.0-beta` sorts before `1.0.0`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let split = |v: &str| -> Vec<String> {
        v.trim()
            .trim_start_matches(['v', 'V'])
            .split(['.', '-', '_', '+'])
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    };
    let left = split(a);
    let right = split(b);

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).map(String::as_str).unwrap_or("0");
        let r = right.get(i).map(String::as_str).unwrap_or("0");
        let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => l.cmp(r),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[derive(Serialize, Deserialize)]
struct CachedUpdate {
    cached_at: u64,
    info: UpdateInfo,
}

/// On-disk cache of the last update response.
#[derive(Debug, Clone)]
pub struct UpdateCache {
    path: PathBuf,
}

impl UpdateCache {
    pub fn new(dir: &Path, product_slug: &str) -> Self {
        Self {
            path: dir.join(format!("{product_slug}-update-response.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached response if present and within TTL (24h).
    pub fn load(&self) -> Option<UpdateInfo> {
        self.load_at(now_epoch())
    }

    /// Cached response if it was fresh at `now` (seconds since the epoch).
    pub fn load_at(&self, now: u64) -> Option<UpdateInfo> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let cached: CachedUpdate = serde_json::from_str(&content).ok()?;
        if now.saturating_sub(cached.cached_at) <= UPDATE_CACHE_TTL_SECS {
            Some(cached.info)
        } else {
            None
        }
    }

    pub fn save(&self, info: &UpdateInfo) -> LicenseResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let cached = CachedUpdate {
            cached_at: now_epoch(),
            info: info.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&cached)?)?;
        Ok(())
    }

    pub fn clear(&self) -> LicenseResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Result of comparing the installed version with the server's.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStatus {
    Available { current: String, info: UpdateInfo },
    UpToDate { current: String, latest: Option<String> },
}

impl UpdateStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, UpdateStatus::Available { .. })
    }
}

/// Looks up update metadata (cache first) and compares it with `current`.
///
/// The stored license key is sent when present; without one the server
/// still answers but omits the package URL.
pub fn check_for_update<A: LicenseApi, S: LicenseStore>(
    manager: &LicenseManager<A, S>,
    cache: Option<&UpdateCache>,
    current: &str,
) -> LicenseResult<UpdateStatus> {
    let info = match cache.and_then(UpdateCache::load) {
        Some(info) => info,
        None => {
            let key = manager.store().key()?;
            let info = manager.api().fetch_update_info(key.as_deref())?;
            if let Some(cache) = cache {
                if let Err(e) = cache.save(&info) {
                    warn!(error = %e, "could not cache update response");
                }
            }
            info
        }
    };

    if info.is_newer_than(current) {
        Ok(UpdateStatus::Available {
            current: current.to_string(),
            info,
        })
    } else {
        Ok(UpdateStatus::UpToDate {
            current: current.to_string(),
            latest: info.version,
        })
    }
}

pub fn now_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
