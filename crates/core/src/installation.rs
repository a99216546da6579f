//! Installation identity and anti-forgery tokens
//!
//! Admin requests must carry a token that only this installation can issue.
//! The token is bound to the product slug and a secret, by default the
//! anonymous [`installation_id`].

use sha2::{Digest, Sha256};

const NONCE_DOMAIN: &[u8] = b"_license_nonce|";

/// Anonymous id of this installation: 16 hex chars of SHA-256 over `user@host`.
pub fn installation_id() -> String {
    let digest = Sha256::digest(identity_seed().as_bytes());
    to_hex(&digest[..8])
}

// The config directory stands in when neither user nor host is known.
fn identity_seed() -> String {
    let user = ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .unwrap_or_default();
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default();

    if user.is_empty() && host.is_empty() {
        return dirs::config_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "entitle".to_string());
    }
    format!("{user}@{host}")
}

/// Issues and verifies the per-installation token admin requests must carry.
#[derive(Debug, Clone)]
pub struct NonceGuard {
    token: String,
}

impl NonceGuard {
    /// Token for `product_slug` bound to `secret`.
    pub fn new(product_slug: &str, secret: &str) -> Self {
        let digest = Sha256::new()
            .chain_update(product_slug.as_bytes())
            .chain_update(NONCE_DOMAIN)
            .chain_update(secret.as_bytes())
            .finalize();
        Self {
            token: to_hex(&digest[..16]),
        }
    }

    /// Guard bound to this machine's [`installation_id`].
    pub fn for_installation(product_slug: &str) -> Self {
        Self::new(product_slug, &installation_id())
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Constant-time comparison against the issued token.
    pub fn verify(&self, candidate: &str) -> bool {
        let expected = self.token.as_bytes();
        let given = candidate.trim().as_bytes();
        expected.len() == given.len()
            && expected
                .iter()
                .zip(given)
                .fold(0u8, |diff, (a, b)| diff | (a ^ b))
                == 0
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
