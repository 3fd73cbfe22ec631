//! Discord interaction signature verification.
//!
//! Discord signs every interaction with Ed25519. The signed message is the
//! `X-Signature-Timestamp` header value followed by the raw request body bytes.
//! Reference: https://discord.com/developers/docs/interactions/receiving-and-responding#security-and-authorization

use axum::http::HeaderMap;
use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};
use tracing::warn;

use crate::error::ConfigError;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the timestamp that prefixes the signed message.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Verifies inbound requests against the application's public key.
#[derive(Debug, Clone)]
pub struct Verifier {
    public_key: VerifyingKey,
}

impl Verifier {
    /// Parse a 64 character hex public key.
    pub fn from_hex(public_key: &str) -> Result<Self, ConfigError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(public_key.trim(), &mut bytes)
            .map_err(|e| ConfigError::InvalidPublicKey(e.to_string()))?;

        Self::from_bytes(&bytes)
    }

    /// Build from raw key bytes.
    pub fn from_bytes(public_key: &[u8; 32]) -> Result<Self, ConfigError> {
        let public_key = VerifyingKey::from_bytes(public_key)
            .map_err(|e| ConfigError::InvalidPublicKey(e.to_string()))?;

        Ok(Self { public_key })
    }

    /// Verify a hex signature over `timestamp || body`.
    ///
    /// Returns `false` for malformed hex as well as for a mismatch.
    pub fn verify(&self, signature: &str, timestamp: &str, body: &[u8]) -> bool {
        let mut signature_bytes = [0u8; 64];
        if hex::decode_to_slice(signature, &mut signature_bytes).is_err() {
            warn!(signature_length = signature.len(), "signature_malformed");
            return false;
        }
        let signature = Signature::from_bytes(&signature_bytes);

        let message = [timestamp.as_bytes(), body].concat();

        let valid = self.public_key.verify(&message, &signature).is_ok();
        if !valid {
            warn!(body_length = body.len(), "signature_mismatch");
        }
        valid
    }

    /// Verify using the signature and timestamp headers of a request.
    ///
    /// Header names are matched case-insensitively.
    pub fn verify_headers(&self, headers: &HeaderMap, body: &[u8]) -> bool {
        let signature = match header_str(headers, SIGNATURE_HEADER) {
            Some(s) => s,
            None => {
                warn!("signature_header_missing");
                return false;
            }
        };

        let timestamp = match header_str(headers, TIMESTAMP_HEADER) {
            Some(t) => t,
            None => {
                warn!("timestamp_header_missing");
                return false;
            }
        };

        self.verify(signature, timestamp, body)
    }
}

/// Verify a request given the public key as hex.
///
/// A malformed key fails closed, the same as a bad signature.
pub fn verify_signature(public_key: &str, body: &[u8], headers: &HeaderMap) -> bool {
    match Verifier::from_hex(public_key) {
        Ok(verifier) => verifier.verify_headers(headers, body),
        Err(e) => {
            warn!(error = %e, "signature_public_key_invalid");
            false
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}


#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;
    use axum::http::HeaderValue;
    use ed25519_dalek::SigningKey;

    fn verifier() -> Verifier {
        Verifier::from_hex(&public_key_hex()).unwrap()
    }

    #[test]
    fn test_verify_valid_signature() {
        let body = br#"{"type":1}"#;
        assert!(verifier().verify(&sign(TIMESTAMP, body), TIMESTAMP, body));
    }

    #[test]
    fn test_verify_wrong_key() {
        let body = br#"{"type":1}"#;
        let other = SigningKey::from_bytes(&[9u8; 32]);
        let other_verifier = Verifier::from_bytes(&other.verifying_key().to_bytes()).unwrap();

        assert!(!other_verifier.verify(&sign(TIMESTAMP, body), TIMESTAMP, body));
    }

    #[test]
    fn test_any_flipped_signature_bit_fails() {
        let body = br#"{"type":2,"data":{"name":"test"}}"#;
        let signature = hex::decode(sign(TIMESTAMP, body)).unwrap();
        let verifier = verifier();

        for bit in 0..signature.len() * 8 {
            let mut tampered = signature.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            assert!(
                !verifier.verify(&hex::encode(&tampered), TIMESTAMP, body),
                "bit {bit} flip accepted"
            );
        }
    }

    #[test]
    fn test_message_is_timestamp_then_raw_body() {
        let body = br#"{"type":1}"#;
        let signature = sign(TIMESTAMP, body);
        let verifier = verifier();

        assert!(!verifier.verify(&signature, "1700000001", body));
        // Re-serialised JSON with different whitespace is a different message.
        assert!(!verifier.verify(&signature, TIMESTAMP, br#"{ "type": 1 }"#));
    }

    #[test]
    fn test_empty_body() {
        assert!(verifier().verify(&sign(TIMESTAMP, b""), TIMESTAMP, b""));
    }

    #[test]
    fn test_non_ascii_body_verified_as_bytes() {
        let body = "{\"content\":\"h\u{e9}llo \u{1f44b}\"}".as_bytes();
        assert!(verifier().verify(&sign(TIMESTAMP, body), TIMESTAMP, body));

        // Invalid UTF-8 still verifies at the byte level.
        let raw = [0xff, 0xfe, b'{', b'}'];
        assert!(verifier().verify(&sign(TIMESTAMP, &raw), TIMESTAMP, &raw));
    }

    #[test]
    fn test_malformed_signature_hex() {
        let verifier = verifier();
        assert!(!verifier.verify("zz", TIMESTAMP, b""));
        assert!(!verifier.verify("abcd", TIMESTAMP, b""));
        assert!(!verifier.verify("", TIMESTAMP, b""));
    }

    #[test]
    fn test_verify_headers_case_insensitive() {
        let body = br#"{"type":1}"#;
        let signature = sign(TIMESTAMP, body);

        let mut lower = HeaderMap::new();
        lower.insert("x-signature-ed25519", HeaderValue::from_str(&signature).unwrap());
        lower.insert("x-signature-timestamp", HeaderValue::from_static(TIMESTAMP));
        assert!(verifier().verify_headers(&lower, body));

        assert!(verifier().verify_headers(&signed_headers(body), body));
    }

    #[test]
    fn test_verify_headers_missing() {
        let body = br#"{"type":1}"#;
        let mut headers = signed_headers(body);
        headers.remove(TIMESTAMP_HEADER);
        assert!(!verifier().verify_headers(&headers, body));

        let mut headers = signed_headers(body);
        headers.remove(SIGNATURE_HEADER);
        assert!(!verifier().verify_headers(&headers, body));
    }

    #[test]
    fn test_verify_signature_bad_public_key_fails_closed() {
        let body = br#"{"type":1}"#;
        let headers = signed_headers(body);

        assert!(verify_signature(&public_key_hex(), body, &headers));
        assert!(!verify_signature("not-hex", body, &headers));
        assert!(!verify_signature("abcd", body, &headers));
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        let key = public_key_hex();
        assert!(Verifier::from_hex(&key[..8]).is_err());
        assert!(Verifier::from_hex(&format!("{key}00")).is_err());
        assert!(Verifier::from_hex(&key).is_ok());
    }
}
