use serde::{Deserialize, Serialize};

/// The identity claims carried by one session token: who the auth provider
/// says the caller is, and which organization this session is scoped to.
///
/// A principal is minted once per login, re-embedded in every request's
/// signed token, and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identity from the auth provider.
    pub subject: String,
    /// Provider name, e.g. "github".
    pub issuer: String,
    /// Organization id claimed for this session.
    pub organization: String,
    /// Epoch seconds.
    pub issued_at: i64,
    /// Epoch seconds. Always after `issued_at`.
    pub expires_at: i64,
}

impl Principal {
    /// Build a principal, enforcing `issued_at < expires_at`.
    pub fn new(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        organization: impl Into<String>,
        issued_at: i64,
        expires_at: i64,
    ) -> Result<Self, InvalidPrincipal> {
        if issued_at >= expires_at {
            return Err(InvalidPrincipal::Lifetime {
                issued_at,
                expires_at,
            });
        }
        let subject = subject.into();
        let issuer = issuer.into();
        if subject.is_empty() || issuer.is_empty() {
            return Err(InvalidPrincipal::MissingIdentity);
        }
        Ok(Self {
            subject,
            issuer,
            organization: organization.into(),
            issued_at,
            expires_at,
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidPrincipal {
    #[error("principal issued_at {issued_at} is not before expires_at {expires_at}")]
    Lifetime { issued_at: i64, expires_at: i64 },
    #[error("principal subject and issuer must be non-empty")]
    MissingIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_must_be_forward() {
        assert!(Principal::new("billibob", "github", "0", 100, 100).is_err());
        assert!(Principal::new("billibob", "github", "0", 101, 100).is_err());
        assert!(Principal::new("billibob", "github", "0", 100, 101).is_ok());
    }

    #[test]
    fn identity_fields_must_be_present() {
        assert!(Principal::new("", "github", "0", 0, 1).is_err());
        assert!(Principal::new("billibob", "", "0", 0, 1).is_err());
    }
}
