//! Slack request signing.
//!
//! A request carries `X-Slack-Request-Timestamp` and
//! `X-Slack-Signature: v0=<hex>`, where the hex digest is
//! HMAC-SHA256(signing secret, `v0:{timestamp}:{raw body}`).

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Requests further than this from the local clock are replays.
pub const MAX_SKEW_SECS: i64 = 300;

const VERSION: &str = "v0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing header {0}")]
    MissingHeader(&'static str),

    #[error("timestamp is not an integer")]
    BadTimestamp,

    #[error("timestamp is {skew}s away from now")]
    StaleTimestamp { skew: i64 },

    #[error("signature is not of the form v0=<hex>")]
    Malformed,

    #[error("signature does not match")]
    Mismatch,

    #[error("signing secret is not configured")]
    EmptySecret,
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(SignatureError::MissingHeader(name))
}

fn mac(secret: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::EmptySecret)?;
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Ok(mac)
}

/// Check a request against `secret`. `now` is epoch seconds.
///
/// Runs before anything else looks at the body.
pub fn verify(
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptySecret);
    }

    let timestamp = header(headers, TIMESTAMP_HEADER)?;
    let signature = header(headers, SIGNATURE_HEADER)?;

    let sent_at: i64 = timestamp.parse().map_err(|_| SignatureError::BadTimestamp)?;
    let skew = (now - sent_at).abs();
    if skew > MAX_SKEW_SECS {
        return Err(SignatureError::StaleTimestamp { skew });
    }

    let digest = signature
        .strip_prefix(VERSION)
        .and_then(|s| s.strip_prefix('='))
        .ok_or(SignatureError::Malformed)?;
    let expected = hex::decode(digest).map_err(|_| SignatureError::Malformed)?;

    mac(secret, timestamp, body)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Produce the `X-Slack-Signature` value for a request.
pub fn sign(secret: &str, timestamp: i64, body: &[u8]) -> Result<String, SignatureError> {
    let digest = mac(secret, &timestamp.to_string(), body)?
        .finalize()
        .into_bytes();
    Ok(format!("{VERSION}={}", hex::encode(digest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_531_420_618;
    const BODY: &[u8] = b"token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&user_id=U2CERLKJA&text=--dry-run";

    fn headers(timestamp: &str, signature: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TIMESTAMP_HEADER, timestamp.parse().unwrap());
        headers.insert(SIGNATURE_HEADER, signature.parse().unwrap());
        headers
    }

    fn signed(timestamp: i64) -> HeaderMap {
        headers(&timestamp.to_string(), &sign(SECRET, timestamp, BODY).unwrap())
    }

    #[test]
    fn test_valid_signature() {
        assert_eq!(verify(&signed(NOW), BODY, SECRET, NOW), Ok(()));
    }

    #[test]
    fn test_known_digest() {
        // HMAC-SHA256("key", "v0:1:")
        let sig = sign("key", 1, b"").unwrap();
        assert_eq!(
            sig,
            "v0=7904eddf3ac9d609570d2821f1e24b4d623d8da8f6db18dfe64f1fa0ed84fcbb"
        );
        assert_eq!(verify(&headers("1", &sig), b"", "key", 1), Ok(()));
    }

    #[test]
    fn test_tampered_body() {
        let err = verify(&signed(NOW), b"user_id=U0&text=", SECRET, NOW).unwrap_err();
        assert_eq!(err, SignatureError::Mismatch);
    }

    #[test]
    fn test_wrong_secret() {
        let err = verify(&signed(NOW), BODY, "other-secret", NOW).unwrap_err();
        assert_eq!(err, SignatureError::Mismatch);
    }

    #[test]
    fn test_missing_headers() {
        let err = verify(&HeaderMap::new(), BODY, SECRET, NOW).unwrap_err();
        assert_eq!(err, SignatureError::MissingHeader(TIMESTAMP_HEADER));

        let mut only_ts = HeaderMap::new();
        only_ts.insert(TIMESTAMP_HEADER, NOW.to_string().parse().unwrap());
        let err = verify(&only_ts, BODY, SECRET, NOW).unwrap_err();
        assert_eq!(err, SignatureError::MissingHeader(SIGNATURE_HEADER));
    }

    #[test]
    fn test_replayed_request() {
        let err = verify(&signed(NOW - 301), BODY, SECRET, NOW).unwrap_err();
        assert_eq!(err, SignatureError::StaleTimestamp { skew: 301 });
        assert!(verify(&signed(NOW - 300), BODY, SECRET, NOW).is_ok());
        assert!(verify(&signed(NOW + 301), BODY, SECRET, NOW).is_err());
    }

    #[test]
    fn test_bad_timestamp() {
        let err = verify(&headers("yesterday", "v0=00"), BODY, SECRET, NOW).unwrap_err();
        assert_eq!(err, SignatureError::BadTimestamp);
    }

    #[test]
    fn test_malformed_signature() {
        let ts = NOW.to_string();
        for bad in ["v1=abcd", "abcd", "v0=not-hex", "v0abcd"] {
            let err = verify(&headers(&ts, bad), BODY, SECRET, NOW).unwrap_err();
            assert_eq!(err, SignatureError::Malformed, "{bad}");
        }
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        let err = verify(&signed(NOW), BODY, "", NOW).unwrap_err();
        assert_eq!(err, SignatureError::EmptySecret);
    }
}
