//! Single-use join tokens for bootstrapping trust domain participation.

use chrono::{DateTime, Utc};
use concord_identity::TrustDomainName;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when presenting a join token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinTokenError {
    /// The token was presented after its expiration timestamp.
    #[error("join token expired at {0}")]
    Expired(DateTime<Utc>),

    /// The token has already been consumed.
    #[error("join token has already been used")]
    AlreadyUsed,
}

/// A single-use, time-limited credential owned by a trust domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinToken {
    /// Persistence identifier; `None` until the record is stored.
    pub id: Option<Uuid>,
    /// The unique token string.
    pub token: String,
    /// Whether the token has been consumed.
    pub used: bool,
    pub trust_domain_id: Uuid,
    /// Cached name of the owning domain, populated by callers that have
    /// resolved it.
    pub trust_domain_name: Option<TrustDomainName>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JoinToken {
    /// Creates a new, unused token for the given trust domain.
    pub fn new(
        token: String,
        trust_domain_id: Uuid,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            token,
            used: false,
            trust_domain_id,
            trust_domain_name: None,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once `now` has passed the expiration timestamp.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Consumes the token, flipping `used` from false to true exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`JoinTokenError::Expired`] for tokens past their
    /// expiration and [`JoinTokenError::AlreadyUsed`] for tokens already
    /// consumed. The record is left unchanged on rejection.
    pub fn consume(&mut self, now: DateTime<Utc>) -> Result<(), JoinTokenError> {
        if self.is_expired(now) {
            return Err(JoinTokenError::Expired(self.expires_at));
        }
        if self.used {
            return Err(JoinTokenError::AlreadyUsed);
        }
        self.used = true;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(now: DateTime<Utc>) -> JoinToken {
        JoinToken::new(
            "tok-1234".to_string(),
            Uuid::new_v4(),
            now + Duration::minutes(10),
            now,
        )
    }

    #[test]
    fn consume_succeeds_exactly_once() {
        let now = Utc::now();
        let mut tok = token(now);
        assert!(tok.consume(now).is_ok());
        assert!(tok.used);
        assert_eq!(tok.consume(now), Err(JoinTokenError::AlreadyUsed));
    }

    #[test]
    fn expired_token_is_rejected_unchanged() {
        let now = Utc::now();
        let mut tok = token(now);
        let late = now + Duration::minutes(11);
        assert!(tok.is_expired(late));
        assert!(matches!(tok.consume(late), Err(JoinTokenError::Expired(_))));
        assert!(!tok.used);
    }

    #[test]
    fn token_is_valid_up_to_expiration() {
        let now = Utc::now();
        let mut tok = token(now);
        let at_expiry = tok.expires_at;
        assert!(!tok.is_expired(at_expiry));
        assert!(tok.consume(at_expiry).is_ok());
    }
}
