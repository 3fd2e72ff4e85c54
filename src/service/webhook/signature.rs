//! LINE webhook signature checks.
//!
//! LINE signs every delivery with `base64(HMAC-SHA256(channel_secret, body))`
//! and sends the result in the `x-line-signature` header.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{error, warn};

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

/// Computes the signature LINE would send for `body`.
pub fn compute_signature(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verifies `signature` against `body` in constant time.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = BASE64.decode(signature.trim()) else {
        warn!("Signature is not valid base64.");
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };

    mac.update(body);

    mac.verify_slice(&expected).is_ok()
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "channel-secret";
    const BODY: &[u8] = br#"{"destination":"U1","events":[]}"#;

    #[test]
    fn computed_signature_verifies() {
        let signature = compute_signature(SECRET, BODY);
        assert!(verify_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn tampered_body_fails() {
        let signature = compute_signature(SECRET, BODY);
        assert!(!verify_signature(SECRET, br#"{"destination":"U2","events":[]}"#, &signature));
    }

    #[test]
    fn wrong_secret_fails() {
        let signature = compute_signature("other-secret", BODY);
        assert!(!verify_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn garbage_signature_fails() {
        assert!(!verify_signature(SECRET, BODY, "not base64!"));
        assert!(!verify_signature(SECRET, BODY, ""));
    }
}
