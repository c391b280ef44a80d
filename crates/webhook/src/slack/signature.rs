//! Slack request signature verification.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::{debug, instrument};

use super::error::SignatureError;

/// Maximum request age in seconds before a signed request is treated as a replay.
pub const REPLAY_WINDOW_SECS: i64 = 300;

/// Signature scheme version prefix.
const SIGNATURE_VERSION: &str = "v0";

/// Verifies (and, for tooling, produces) Slack request signatures.
#[derive(Clone)]
pub struct SignatureVerifier {
    /// Signing secret shared with Slack.
    signing_secret: SecretString,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("signing_secret", &"[REDACTED]")
            .finish()
    }
}

impl SignatureVerifier {
    /// Create a verifier for a signing secret.
    #[must_use]
    pub const fn new(signing_secret: SecretString) -> Self {
        Self { signing_secret }
    }

    /// Compute the `v0=<hex>` signature for a timestamp and raw body.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::Key`] if the HMAC cannot be keyed.
    pub fn sign(&self, timestamp: &str, body: &str) -> Result<String, SignatureError> {
        let sig_basestring = format!("{SIGNATURE_VERSION}:{timestamp}:{body}");

        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.signing_secret.expose_secret().as_bytes())
                .map_err(|e| SignatureError::Key(e.to_string()))?;

        mac.update(sig_basestring.as_bytes());

        Ok(format!(
            "{SIGNATURE_VERSION}={}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    /// Verify a Slack request signature.
    ///
    /// # Arguments
    ///
    /// * `timestamp` - The `X-Slack-Request-Timestamp` header value
    /// * `body` - The raw request body
    /// * `signature` - The `X-Slack-Signature` header value
    /// * `now` - Current time in seconds since the Unix epoch
    ///
    /// # Errors
    ///
    /// Returns error if the timestamp is unparseable, older than
    /// [`REPLAY_WINDOW_SECS`], or the signature does not match.
    #[instrument(skip(self, body, signature))]
    pub fn verify(
        &self,
        timestamp: &str,
        body: &str,
        signature: &str,
        now: i64,
    ) -> Result<(), SignatureError> {
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp(timestamp.to_string()))?;

        // Only staleness is checked; a timestamp ahead of our clock is accepted.
        let age_secs = now.saturating_sub(ts);
        if age_secs > REPLAY_WINDOW_SECS {
            return Err(SignatureError::Expired { age_secs });
        }

        let expected = self.sign(timestamp, body)?;

        if !constant_time_compare(&expected, signature) {
            return Err(SignatureError::Mismatch);
        }

        debug!("Slack signature verified");

        Ok(())
    }
}

/// Check a request signature against a raw secret.
///
/// Boolean form of [`SignatureVerifier::verify`]: any rejection is `false`.
#[must_use]
pub fn verify(secret: &str, timestamp: &str, signature: &str, body: &str, now: i64) -> bool {
    SignatureVerifier::new(SecretString::from(secret.to_owned()))
        .verify(timestamp, body, signature, now)
        .is_ok()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
    const NOW: i64 = 1_531_420_618;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(SecretString::from(SECRET.to_string()))
    }

    fn sign(timestamp: &str, body: &str) -> String {
        verifier().sign(timestamp, body).expect("sign")
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
        assert!(!constant_time_compare("hello", "helloo"));
    }

    #[test]
    fn test_sign_matches_slack_documentation_example() {
        // Example from Slack's "Verifying requests from Slack" guide.
        let body = "token=xyzz0WbapA4vBCDEFasx0q6G&team_id=T1DC2JH3J&team_domain=testteamnow&channel_id=G8PSS9T3V&channel_name=foobar&user_id=U2CERLKJA&user_name=roadrunner&command=%2Fwebhook-collect&text=&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2FT1DC2JH3J%2F397700885554%2F96rGlfmibIGlgcZRskXaIFfN&trigger_id=398738663015.47445629121.803a0bc887a14d10d2c447fce8b6703c";
        assert_eq!(
            sign("1531420618", body),
            "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503"
        );
    }

    #[test]
    fn test_signature_verification_valid() {
        let body = "test=body";
        let signature = sign("1531420618", body);
        assert!(
            verifier()
                .verify("1531420618", body, &signature, NOW)
                .is_ok()
        );
    }

    #[test]
    fn test_signature_verification_at_window_edge() {
        let body = "test=body";
        let signature = sign("1531420618", body);

        assert!(
            verifier()
                .verify("1531420618", body, &signature, NOW + REPLAY_WINDOW_SECS)
                .is_ok()
        );
        assert_eq!(
            verifier().verify("1531420618", body, &signature, NOW + REPLAY_WINDOW_SECS + 1),
            Err(SignatureError::Expired { age_secs: 301 })
        );
    }

    #[test]
    fn test_signature_verification_future_timestamp_accepted() {
        let body = "test=body";
        let signature = sign("1531421618", body);
        assert!(
            verifier()
                .verify("1531421618", body, &signature, NOW)
                .is_ok()
        );
    }

    #[test]
    fn test_signature_verification_invalid_signature() {
        let result = verifier().verify("1531420618", "test=body", "v0=invalid_signature_hash", NOW);
        assert_eq!(result, Err(SignatureError::Mismatch));
    }

    #[test]
    fn test_signature_verification_single_character_change() {
        let body = "test=body";
        let signature = sign("1531420618", body);

        for (i, c) in signature.char_indices() {
            let replacement = if c == '0' { '1' } else { '0' };
            let mut forged = signature.clone();
            forged.replace_range(i..=i, &replacement.to_string());
            assert!(
                verifier().verify("1531420618", body, &forged, NOW).is_err(),
                "forged signature at index {i} accepted"
            );
        }
    }

    #[test]
    fn test_signature_verification_invalid_timestamp() {
        assert!(matches!(
            verifier().verify("not-a-number", "body", "v0=sig", NOW),
            Err(SignatureError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            verifier().verify("", "body", "v0=sig", NOW),
            Err(SignatureError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_signature_verification_extreme_timestamp_does_not_overflow() {
        let result = verifier().verify(&i64::MIN.to_string(), "body", "v0=sig", NOW);
        assert!(matches!(result, Err(SignatureError::Expired { .. })));
    }

    #[test]
    fn test_signature_verification_tampered_body() {
        let signature = sign("1531420618", "original=body");
        let result = verifier().verify("1531420618", "tampered=body", &signature, NOW);
        assert_eq!(result, Err(SignatureError::Mismatch));
    }

    #[test]
    fn test_stale_request_rejected_even_when_correctly_signed() {
        let signature = sign("1531420618", "a=1");
        assert!(!verify(SECRET, "1531420618", &signature, "a=1", NOW + 600));
        assert!(verify(SECRET, "1531420618", &signature, "a=1", NOW + 60));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature = sign("1531420618", "a=1");
        assert!(!verify("another-secret", "1531420618", &signature, "a=1", NOW));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug_output = format!("{:?}", verifier());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(SECRET));
    }
}
