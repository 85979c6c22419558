//! Webhook signature verification.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

fn mac_for(channel_secret: &str, body: &[u8]) -> Option<HmacSha256> {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).ok()?;
    mac.update(body);
    Some(mac)
}

/// Computes the signature LINE sends for `body`: base64(HMAC-SHA256(channel_secret, body)).
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    mac_for(channel_secret, body)
        .map(|mac| STANDARD.encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Verifies the `X-Line-Signature` header value against the raw request body.
///
/// The header is base64-decoded and compared in constant time by [`Mac::verify_slice`].
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    if signature.is_empty() {
        warn!("missing webhook signature");
        return false;
    }
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        warn!("webhook signature is not base64");
        return false;
    };
    match mac_for(channel_secret, body) {
        Some(mac) => mac.verify_slice(&expected).is_ok(),
        None => false,
    }
}
