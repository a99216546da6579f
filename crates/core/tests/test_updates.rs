//! Tests for update metadata, caching and version comparison

mod common;

use common::{valid_record, FakeApi};
use entitle_core::updates::now_epoch;
use entitle_core::{
    check_for_update, compare_versions, LicenseManager, MemoryStore, UpdateCache, UpdateInfo,
    UpdateStatus,
};
use serde_json::json;
use std::cmp::Ordering;

fn info(version: &str, download_url: &str) -> UpdateInfo {
    UpdateInfo {
        name: Some("My Plugin".to_string()),
        version: Some(version.to_string()),
        download_url: Some(download_url.to_string()),
        ..Default::default()
    }
}

// ── versions ────────────────────────────────────────────────────

#[test]
fn compare_versions_orders_components_numerically() {
    assert_eq!(compare_versions("1.2.10", "1.2.9"), Ordering::Greater);
    assert_eq!(compare_versions("1.2.0", "1.2"), Ordering::Equal);
    assert_eq!(compare_versions("0.9", "1.0"), Ordering::Less);
}

#[test]
fn is_newer_than_requires_a_version() {
    assert!(info("2.0.0", "").is_newer_than("1.9.3"));
    assert!(!info("1.9.3", "").is_newer_than("1.9.3"));
    assert!(!UpdateInfo::default().is_newer_than("0.0.1"));
}

#[test]
fn package_ignores_blank_download_url() {
    assert_eq!(info("2.0.0", "  ").package(), None);
    assert_eq!(
        info("2.0.0", "https://example.com/p.zip").package(),
        Some("https://example.com/p.zip")
    );
}

#[test]
fn update_info_tolerates_loose_payloads() {
    let info: UpdateInfo = serde_json::from_value(json!({
        "name": "My Plugin",
        "version": 2.1,
        "sections": {"changelog": "<p>Fixes</p>"},
        "banners": {"low": "https://example.com/b.png"}
    }))
    .unwrap();

    assert_eq!(info.version.as_deref(), Some("2.1"));
    assert_eq!(info.sections["changelog"], json!("<p>Fixes</p>"));
    assert_eq!(info.download_url, None);
}

// ── UpdateCache ─────────────────────────────────────────────────

#[test]
fn cache_roundtrip_and_clear() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = UpdateCache::new(tmp.path(), "my-plugin");
    assert!(cache.path().ends_with("my-plugin-update-response.json"));
    assert_eq!(cache.load(), None);

    cache.save(&info("2.0.0", "https://example.com/p.zip")).unwrap();
    assert_eq!(cache.load().unwrap().version.as_deref(), Some("2.0.0"));

    cache.clear().unwrap();
    assert_eq!(cache.load(), None);
    cache.clear().unwrap();
}

#[test]
fn cache_expires_after_a_day() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = UpdateCache::new(tmp.path(), "my-plugin");
    cache.save(&info("2.0.0", "")).unwrap();

    let now = now_epoch();
    assert!(cache.load_at(now + 23 * 60 * 60).is_some());
    assert!(cache.load_at(now + 25 * 60 * 60).is_none());
}

#[test]
fn corrupt_cache_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = UpdateCache::new(tmp.path(), "my-plugin");
    std::fs::write(cache.path(), "not json").unwrap();

    assert_eq!(cache.load(), None);
}

// ── check_for_update ────────────────────────────────────────────

#[test]
fn reports_available_update_with_stored_key() {
    let api = FakeApi::new().reply(
        "update",
        json!({"version": "2.0.0", "download_url": "https://example.com/p.zip"}),
    );
    let store = MemoryStore::with_record(&valid_record("KEY-1")).unwrap();
    let manager = LicenseManager::new(api, store);

    let status = check_for_update(&manager, None, "1.4.2").unwrap();

    assert!(status.is_available());
    match status {
        UpdateStatus::Available { current, info } => {
            assert_eq!(current, "1.4.2");
            assert_eq!(info.package(), Some("https://example.com/p.zip"));
        }
        other => panic!("expected update, got {other:?}"),
    }
    assert_eq!(manager.api().calls(), vec!["update:KEY-1"]);
}

#[test]
fn reports_up_to_date_without_license() {
    let api = FakeApi::new().reply("update", json!({"version": "1.4.2"}));
    let manager = LicenseManager::new(api, MemoryStore::new());

    let status = check_for_update(&manager, None, "1.4.2").unwrap();

    assert_eq!(
        status,
        UpdateStatus::UpToDate {
            current: "1.4.2".to_string(),
            latest: Some("1.4.2".to_string()),
        }
    );
    assert_eq!(manager.api().calls(), vec!["update:"]);
}

#[test]
fn cached_response_skips_the_server() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = UpdateCache::new(tmp.path(), "my-plugin");
    let api = FakeApi::new().reply("update", json!({"version": "2.0.0"}));
    let manager = LicenseManager::new(api, MemoryStore::new());

    check_for_update(&manager, Some(&cache), "1.0.0").unwrap();
    let second = check_for_update(&manager, Some(&cache), "1.0.0").unwrap();

    assert!(second.is_available());
    assert_eq!(manager.api().calls().len(), 1);
}

#[test]
fn server_error_propagates() {
    let manager = LicenseManager::new(FakeApi::new().down("update"), MemoryStore::new());

    let err = check_for_update(&manager, None, "1.0.0").unwrap_err();

    assert!(err.is_transient());
}
