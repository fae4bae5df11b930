//! Session Codec: signed, expiring tokens carrying a [`Principal`].
//!
//! Purely cryptographic. The codec never consults a store and has no idea
//! whether the subject it signs or verifies actually exists.

use jwt_simple::JWTError;
use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Principal;

/// Name of the HTTP-only cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Smallest signing secret the HMAC layer accepts (96 bits). Shorter
/// secrets make every sign and verify fail, so startup rejects them.
pub const MIN_SECRET_BYTES: usize = 12;

/// Custom claims beyond the registered sub/iss/iat/exp set.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Organization id this session is scoped to.
    #[serde(rename = "org", default)]
    organization: String,
}

/// Internal classification of a token failure. All variants collapse to the
/// same external outcome; they exist for diagnostics and tests only.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token has expired")]
    Expired,
    #[error("session token signature is invalid")]
    InvalidSignature,
    #[error("session token is malformed")]
    Malformed,
    #[error("failed to sign session token")]
    Signing,
}

/// Signs and verifies session tokens with a process-wide HS256 secret.
pub struct SessionCodec {
    key: HS256Key,
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            key: HS256Key::from_bytes(secret.as_bytes()),
        }
    }

    /// Serialize and sign `principal` into a compact token.
    pub fn create(&self, principal: &Principal) -> Result<String, SessionError> {
        let issued_at = Duration::from_secs(principal.issued_at.max(0) as u64);
        let claims = JWTClaims {
            issued_at: Some(issued_at),
            expires_at: Some(Duration::from_secs(principal.expires_at.max(0) as u64)),
            invalid_before: Some(issued_at),
            issuer: Some(principal.issuer.clone()),
            subject: Some(principal.subject.clone()),
            audiences: None,
            jwt_id: None,
            nonce: None,
            custom: SessionClaims {
                organization: principal.organization.clone(),
            },
        };
        self.key.authenticate(claims).map_err(|_| SessionError::Signing)
    }

    /// Verify signature, expiry, and claim structure, yielding the embedded
    /// principal.
    pub fn verify(&self, token: &str) -> Result<Principal, SessionError> {
        // Expiry is exact: a token one second past `exp` is already stale.
        let options = VerificationOptions {
            time_tolerance: Some(Duration::from_secs(0)),
            ..Default::default()
        };
        let claims = self
            .key
            .verify_token::<SessionClaims>(token, Some(options))
            .map_err(classify)?;

        let subject = claims.subject.filter(|s| !s.is_empty());
        let issuer = claims.issuer.filter(|s| !s.is_empty());
        match (subject, issuer, claims.issued_at, claims.expires_at) {
            (Some(subject), Some(issuer), Some(issued_at), Some(expires_at)) => Principal::new(
                subject,
                issuer,
                claims.custom.organization,
                issued_at.as_secs() as i64,
                expires_at.as_secs() as i64,
            )
            .map_err(|_| SessionError::Malformed),
            _ => Err(SessionError::Malformed),
        }
    }
}

fn classify(err: jwt_simple::Error) -> SessionError {
    match err.downcast_ref::<JWTError>() {
        Some(JWTError::TokenHasExpired) => SessionError::Expired,
        Some(JWTError::InvalidAuthenticationTag) => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &str = "unit-test-token-secret";

    fn principal(issued_at: i64, expires_at: i64) -> Principal {
        Principal::new("billibob", "github", "0", issued_at, expires_at).unwrap()
    }

    #[test]
    fn create_then_verify_round_trips_the_principal() {
        let codec = SessionCodec::new(SECRET);
        let now = Utc::now().timestamp();
        let principal = principal(now, now + 600);
        let token = codec.create(&principal).unwrap();
        let verified = codec.verify(&token).unwrap();
        assert_eq!(verified, principal);
    }

    #[test]
    fn expired_tokens_are_rejected_regardless_of_claims() {
        let codec = SessionCodec::new(SECRET);
        let now = Utc::now().timestamp();
        let token = codec.create(&principal(now - 600, now - 60)).unwrap();
        assert!(matches!(codec.verify(&token), Err(SessionError::Expired)));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let ours = SessionCodec::new(SECRET);
        let theirs = SessionCodec::new("a-different-token-secret");
        let now = Utc::now().timestamp();
        let token = theirs.create(&principal(now, now + 600)).unwrap();
        assert!(matches!(
            ours.verify(&token),
            Err(SessionError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = SessionCodec::new(SECRET);
        assert!(matches!(
            codec.verify("not.a.token"),
            Err(SessionError::Malformed)
        ));
        assert!(matches!(codec.verify(""), Err(SessionError::Malformed)));
    }

    #[test]
    fn secrets_below_the_hmac_minimum_cannot_sign() {
        let codec = SessionCodec::new("short");
        let now = Utc::now().timestamp();
        assert!(matches!(
            codec.create(&principal(now, now + 600)),
            Err(SessionError::Signing)
        ));
    }
}
