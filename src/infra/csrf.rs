//! Stateless CSRF tokens signed with the site secret.
//!
//! A token is `"{issued_at}.{digest}"` where `digest` is the hex SHA-256 of the
//! secret, a separator and the issue timestamp in unix seconds.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;

/// Tokens older than this are rejected.
pub const CSRF_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsrfError {
    #[error("The CSRF token is missing.")]
    Missing,
    #[error("The CSRF token is invalid.")]
    Invalid,
    #[error("The CSRF token has expired.")]
    Expired,
}

#[derive(Clone)]
pub struct CsrfGuard {
    secret: Vec<u8>,
}

impl CsrfGuard {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    pub fn issue(&self) -> String {
        self.issue_at(OffsetDateTime::now_utc().unix_timestamp())
    }

    pub fn issue_at(&self, issued_at: i64) -> String {
        format!("{issued_at}.{}", self.digest(issued_at))
    }

    pub fn verify(&self, token: Option<&str>) -> Result<(), CsrfError> {
        self.verify_at(token, OffsetDateTime::now_utc().unix_timestamp())
    }

    pub fn verify_at(&self, token: Option<&str>, now: i64) -> Result<(), CsrfError> {
        let token = token.map(str::trim).filter(|value| !value.is_empty());
        let Some(token) = token else {
            return Err(CsrfError::Missing);
        };

        let (issued_at, digest) = token.split_once('.').ok_or(CsrfError::Invalid)?;
        let issued_at: i64 = issued_at.parse().map_err(|_| CsrfError::Invalid)?;

        let expected = self.digest(issued_at);
        if !bool::from(expected.as_bytes().ct_eq(digest.as_bytes())) {
            return Err(CsrfError::Invalid);
        }

        if issued_at > now || now - issued_at > CSRF_TOKEN_TTL_SECS {
            return Err(CsrfError::Expired);
        }

        Ok(())
    }

    fn digest(&self, issued_at: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(b":");
        hasher.update(issued_at.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_800_000_000;

    #[test]
    fn freshly_issued_token_verifies() {
        let guard = CsrfGuard::new("secret");
        let token = guard.issue_at(NOW);
        assert_eq!(guard.verify_at(Some(&token), NOW + 10), Ok(()));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let token = CsrfGuard::new("other").issue_at(NOW);
        let guard = CsrfGuard::new("secret");
        assert_eq!(guard.verify_at(Some(&token), NOW), Err(CsrfError::Invalid));
    }

    #[test]
    fn stale_and_future_tokens_expire() {
        let guard = CsrfGuard::new("secret");
        let token = guard.issue_at(NOW);
        assert_eq!(
            guard.verify_at(Some(&token), NOW + CSRF_TOKEN_TTL_SECS + 1),
            Err(CsrfError::Expired)
        );
        assert_eq!(
            guard.verify_at(Some(&token), NOW - 5),
            Err(CsrfError::Expired)
        );
    }

    #[test]
    fn missing_and_malformed_tokens_are_rejected() {
        let guard = CsrfGuard::new("secret");
        assert_eq!(guard.verify_at(None, NOW), Err(CsrfError::Missing));
        assert_eq!(guard.verify_at(Some("  "), NOW), Err(CsrfError::Missing));
        assert_eq!(guard.verify_at(Some("nodot"), NOW), Err(CsrfError::Invalid));
        assert_eq!(guard.verify_at(Some("abc.def"), NOW), Err(CsrfError::Invalid));
    }
}
