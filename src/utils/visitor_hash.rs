//! Keyed hashing of visitor IP addresses.
//!
//! Raw IPs are never persisted. Events carry an HMAC-SHA256 digest instead,
//! which is stable per secret so unique-visitor counts still work.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hashes visitor addresses with a server-side secret.
#[derive(Clone)]
pub struct VisitorHasher {
    secret: String,
}

impl VisitorHasher {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Returns a 64-character lowercase hex digest of the trimmed address,
    /// or `None` for an empty input.
    pub fn hash(&self, ip: &str) -> Option<String> {
        let ip = ip.trim();
        if ip.is_empty() {
            return None;
        }

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(ip.as_bytes());
        Some(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for VisitorHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_hex() {
        let hasher = VisitorHasher::new("secret");
        let a = hasher.hash("203.0.113.7").unwrap();
        let b = hasher.hash(" 203.0.113.7 ").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_depends_on_secret() {
        let a = VisitorHasher::new("one").hash("10.0.0.1").unwrap();
        let b = VisitorHasher::new("two").hash("10.0.0.1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_ip_has_no_hash() {
        assert!(VisitorHasher::new("secret").hash("  ").is_none());
    }
}
