//! Tests for admin request handling

mod common;

use common::{valid_record, FakeApi};
use entitle_core::{
    AdminAction, AdminHandler, AdminRequest, LicenseManager, LicenseStore, MemoryStore,
    NonceGuard, UpdateCache, UpdateInfo,
};
use serde_json::json;

const SECRET: &str = "install-secret";

fn guard() -> NonceGuard {
    NonceGuard::new("my-plugin", SECRET)
}

fn request(action: AdminAction, license_key: Option<&str>) -> AdminRequest {
    AdminRequest {
        action,
        nonce: Some(guard().token().to_string()),
        can_manage: true,
        license_key: license_key.map(String::from),
    }
}

// ── gatekeeping ─────────────────────────────────────────────────

#[test]
fn missing_or_wrong_token_is_forbidden() {
    let manager = LicenseManager::new(FakeApi::new(), MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    let mut req = request(AdminAction::Check, None);
    req.nonce = None;
    let resp = handler.handle(&req);
    assert_eq!(resp.status, 403);
    assert_eq!(resp.message(), Some("Invalid security token"));

    req.nonce = Some(NonceGuard::new("other-plugin", SECRET).token().to_string());
    assert_eq!(handler.handle(&req).status, 403);
    assert!(manager.api().calls().is_empty());
}

#[test]
fn installation_guard_accepts_only_its_own_token() {
    let api = FakeApi::new().reply("check", json!({"license": "valid"}));
    let store = MemoryStore::with_record(&valid_record("KEY-1")).unwrap();
    let manager = LicenseManager::new(api, store);
    let installed = NonceGuard::for_installation("my-plugin");
    let handler = AdminHandler::new(&manager, installed.clone());

    let mut req = request(AdminAction::Check, None);
    let resp = handler.handle(&req);
    assert_eq!(resp.status, 403);

    req.nonce = Some(installed.token().to_string());
    let resp = handler.handle(&req);
    assert_eq!(resp.status, 200);
    assert_eq!(manager.api().calls(), vec!["check:KEY-1"]);
}

#[test]
fn token_is_checked_before_privilege() {
    let manager = LicenseManager::new(FakeApi::new(), MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    let mut req = request(AdminAction::Activate, Some("KEY-1"));
    req.nonce = Some("forged".to_string());
    req.can_manage = false;

    assert_eq!(handler.handle(&req).message(), Some("Invalid security token"));
}

#[test]
fn caller_without_privilege_is_unauthorized() {
    let manager = LicenseManager::new(FakeApi::new(), MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    let mut req = request(AdminAction::Deactivate, None);
    req.can_manage = false;
    let resp = handler.handle(&req);

    assert_eq!(resp.status, 403);
    assert_eq!(resp.message(), Some("Unauthorized"));
    assert!(manager.api().calls().is_empty());
}

// ── activate ────────────────────────────────────────────────────

#[test]
fn activate_requires_key() {
    let manager = LicenseManager::new(FakeApi::new(), MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    for key in [None, Some(""), Some("   ")] {
        let resp = handler.handle(&request(AdminAction::Activate, key));
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message(), Some("License key is required"));
    }
    assert!(manager.api().calls().is_empty());
}

#[test]
fn activate_returns_record() {
    let api = FakeApi::new().reply(
        "activate",
        json!({"success": true, "license": "valid", "expires": "lifetime"}),
    );
    let manager = LicenseManager::new(api, MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    let resp = handler.handle(&request(AdminAction::Activate, Some(" KEY-1 ")));

    assert_eq!(resp.status, 200);
    assert!(resp.is_success());
    assert_eq!(resp.body["data"]["status"], json!("valid"));
    assert_eq!(resp.body["data"]["license_key"], json!("KEY-1"));
    assert_eq!(resp.body["data"]["expires"], json!("lifetime"));
    assert!(manager.is_valid());
}

#[test]
fn activate_failure_is_server_error_response() {
    let api = FakeApi::new().reply(
        "activate",
        json!({"success": false, "message": "Key expired"}),
    );
    let manager = LicenseManager::new(api, MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    let resp = handler.handle(&request(AdminAction::Activate, Some("KEY-1")));

    assert_eq!(resp.status, 500);
    assert!(!resp.is_success());
    assert_eq!(resp.message(), Some("Key expired"));
}

// ── deactivate ──────────────────────────────────────────────────

#[test]
fn deactivate_returns_empty_list() {
    let api = FakeApi::new().down("deactivate");
    let store = MemoryStore::with_record(&valid_record("KEY-1")).unwrap();
    let manager = LicenseManager::new(api, store);
    let handler = AdminHandler::new(&manager, guard());

    let resp = handler.handle(&request(AdminAction::Deactivate, None));

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, json!({"success": true, "data": []}));
    assert_eq!(manager.store().key().unwrap(), None);
}

#[test]
fn deactivate_drops_cached_update_response() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = UpdateCache::new(tmp.path(), "my-plugin");
    cache.save(&UpdateInfo::default()).unwrap();
    let api = FakeApi::new().reply("deactivate", json!({"success": true}));
    let store = MemoryStore::with_record(&valid_record("KEY-1")).unwrap();
    let manager = LicenseManager::new(api, store).with_update_cache(cache);
    let handler = AdminHandler::new(&manager, guard());

    let resp = handler.handle(&request(AdminAction::Deactivate, None));

    assert_eq!(resp.status, 200);
    assert!(!manager.update_cache().unwrap().path().exists());
}

#[test]
fn deactivate_without_license_fails() {
    let manager = LicenseManager::new(FakeApi::new(), MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    let resp = handler.handle(&request(AdminAction::Deactivate, None));

    assert_eq!(resp.status, 500);
    assert_eq!(resp.message(), Some("No license key found"));
}

// ── check ───────────────────────────────────────────────────────

#[test]
fn check_without_license_reports_not_found() {
    let manager = LicenseManager::new(FakeApi::new(), MemoryStore::new());
    let handler = AdminHandler::new(&manager, guard());

    let resp = handler.handle(&request(AdminAction::Check, None));

    assert_eq!(resp.status, 200);
    assert!(!resp.is_success());
    assert_eq!(resp.message(), Some("No license found"));
}

#[test]
fn check_returns_refreshed_record() {
    let api = FakeApi::new().reply("check", json!({"license": "valid", "site_count": 4}));
    let store = MemoryStore::with_record(&valid_record("KEY-1")).unwrap();
    let manager = LicenseManager::new(api, store);
    let handler = AdminHandler::new(&manager, guard());

    let resp = handler.handle(&request(AdminAction::Check, None));

    assert!(resp.is_success());
    assert_eq!(resp.body["data"]["site_count"], json!(4));
}

// ── wire format ─────────────────────────────────────────────────

#[test]
fn request_deserializes_from_form_json() {
    let req: AdminRequest = serde_json::from_value(json!({
        "action": "activate",
        "_wpnonce": "abc",
        "license_key": "KEY-1"
    }))
    .unwrap();

    assert_eq!(req.action, AdminAction::Activate);
    assert_eq!(req.nonce.as_deref(), Some("abc"));
    assert!(!req.can_manage);
}

#[test]
fn action_hook_names() {
    assert_eq!(
        AdminAction::Activate.hook_name("my-plugin"),
        "my-plugin_license_activate"
    );
    assert_eq!(AdminAction::Check.hook_name("x"), "x_license_check");
}
