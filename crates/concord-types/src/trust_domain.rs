//! The trust domain record.

use chrono::{DateTime, Utc};
use concord_identity::{SpiffeId, TrustDomainName};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An administrative security domain participating in federation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustDomain {
    /// Persistence identifier; `None` until the record is stored.
    pub id: Option<Uuid>,
    /// Globally unique, validated trust domain name.
    pub name: TrustDomainName,
    /// Free-text description.
    pub description: String,
    /// Identity authorized to upload and harvest this domain's bundle.
    pub harvester_id: Option<SpiffeId>,
    /// Opaque onboarding bundle payload.
    pub onboarding_bundle: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrustDomain {
    /// Creates a new, not-yet-persisted trust domain record.
    pub fn new(name: TrustDomainName, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name,
            description: String::new(),
            harvester_id: None,
            onboarding_bundle: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_no_identifier() {
        let name = TrustDomainName::parse("example.org").unwrap();
        let domain = TrustDomain::new(name, Utc::now());
        assert!(domain.id.is_none());
        assert!(domain.description.is_empty());
        assert!(domain.onboarding_bundle.is_empty());
        assert_eq!(domain.created_at, domain.updated_at);
    }
}
