//! Entitle Core - License State Reconciliation
//!
//! This crate mediates between a remote license server and a local license cache:
//! - Remote activation, deactivation and status checks against a versioned endpoint
//! - Durable per-product license storage (composite or per-field)
//! - Reconciliation rules: valid-only caching, unconditional local revocation,
//!   last-known-good fallback when the server is unreachable
//! - A presentation session and an admin request handler for UI front ends

pub mod admin;
pub mod client;
pub mod config;
pub mod error;
pub mod installation;
pub mod manager;
pub mod record;
pub mod session;
pub mod store;
pub mod updates;

pub use admin::{AdminAction, AdminHandler, AdminRequest, AdminResponse};
pub use client::{normalize_response, HttpLicenseClient, LicenseApi};
pub use config::{ClientConfig, EntitleConfig, ProductConfig, StorageConfig};
pub use error::{LicenseError, LicenseResult};
pub use installation::{installation_id, NonceGuard};
pub use manager::{Deactivation, LicenseManager};
pub use record::{Expiry, LicenseRecord, LicenseStatus, ProductType, Seats};
pub use session::LicenseSession;
pub use store::{FileStore, LicenseStore, MemoryStore, StorageShape};
pub use updates::{check_for_update, compare_versions, UpdateCache, UpdateInfo, UpdateStatus};

/// Entitle version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
