//! Bearer credential issuing and verification.
//!
//! Credentials are compact signed tokens: a base64url JSON claims payload
//! followed by a keyed SHA-256 tag over that payload, joined with `.`.
//! Verification recomputes the tag and compares it in constant time before
//! the claims are even parsed, then checks expiry. The signing secret never
//! leaves the process.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Credential verification failures.
///
/// All variants map to Forbidden at the HTTP boundary; only a *missing*
/// credential is Unauthenticated, and that is decided before this module is
/// reached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token is structurally malformed.
    #[error("malformed token")]
    Malformed,
    /// Signature does not match the payload.
    #[error("invalid token signature")]
    BadSignature,
    /// Token was valid once but its expiry has passed.
    #[error("token has expired")]
    Expired,
}

/// Claims embedded in a credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Claimed identity (email).
    pub email: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies bearer credentials with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer from the configured secret and time-to-live.
    #[must_use]
    pub const fn new(secret: String, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Issue a credential embedding the given email claim.
    ///
    /// # Panics
    ///
    /// Never panics: claims serialization of a plain struct cannot fail.
    #[must_use]
    pub fn issue(&self, email: &str) -> String {
        let claims = Claims {
            email: email.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        // Claims is a plain struct of String and i64, serialization is
        // infallible in practice.
        let payload = serde_json::to_vec(&claims).unwrap_or_default();
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        let tag = self.tag(encoded.as_bytes());
        format!("{encoded}.{tag}")
    }

    /// Verify a credential and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] when the token does not split into
    /// payload and tag or the payload is not valid claims JSON,
    /// [`TokenError::BadSignature`] when the tag does not match, and
    /// [`TokenError::Expired`] when the expiry has passed.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let (encoded, tag) = token.split_once('.').ok_or(TokenError::Malformed)?;

        let expected = self.tag(encoded.as_bytes());
        if !constant_time_eq(tag.as_bytes(), expected.as_bytes()) {
            return Err(TokenError::BadSignature);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Keyed SHA-256 tag over the encoded payload.
    fn tag(&self, payload: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(payload);
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret stays out of logs.
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret".to_string(), Duration::days(30))
    }

    #[test]
    fn issued_token_verifies_and_carries_email() {
        let token = signer().issue("a@x.com");
        let claims = signer().verify(&token).expect("valid token");
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = TokenSigner::new("other-secret".to_string(), Duration::days(30));
        let token = other.issue("a@x.com");
        assert_eq!(signer().verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = signer().issue("a@x.com");
        let (payload, tag) = token.split_once('.').expect("two parts");
        let mut forged = payload.to_string();
        forged.push('A');
        assert_eq!(
            signer().verify(&format!("{forged}.{tag}")),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = TokenSigner::new("test-secret".to_string(), Duration::days(-1));
        let token = expired.issue("a@x.com");
        assert_eq!(signer().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(signer().verify("not-a-token"), Err(TokenError::Malformed));
    }
}
