use crate::error::SignatureError;
use axum::http::HeaderMap;
use chrono::Utc;
use hmac::{ Hmac, Mac };
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// Requests signed longer ago than this are treated as replays.
const MAX_SKEW_SECS: u64 = 5 * 60;

/// Checks the Slack `v0` signature of a raw request body.
pub fn verify_request(secret: &str, headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
    let timestamp = header(headers, TIMESTAMP_HEADER)?;
    let signature = header(headers, SIGNATURE_HEADER)?;
    verify(secret, timestamp, signature, body, Utc::now().timestamp())
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(SignatureError::MissingHeader(name))
}

pub fn verify(
    secret: &str,
    timestamp: &str,
    signature: &str,
    body: &[u8],
    now: i64
) -> Result<(), SignatureError> {
    let ts: i64 = timestamp.trim().parse().map_err(|_| SignatureError::InvalidTimestamp)?;
    if now.abs_diff(ts) > MAX_SKEW_SECS {
        return Err(SignatureError::StaleTimestamp);
    }

    let provided = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or(SignatureError::Mismatch)?;

    let mac = signing_mac(secret, timestamp, body);
    mac.verify_slice(&provided).map_err(|_| SignatureError::Mismatch)
}

/// Produces the `X-Slack-Signature` value Slack would send for `body`.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mac = signing_mac(secret, timestamp, body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

fn signing_mac(secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac
}
