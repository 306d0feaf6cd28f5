//! Signed trust bundle snapshots.

use chrono::{DateTime, Utc};
use concord_identity::TrustDomainName;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A signed snapshot of a trust domain's trust material.
///
/// A bundle carries its own provenance: the signature over the payload and
/// the certificate that produced it. Bundles are logically immutable once
/// signed; a new signing event produces a new [`Bundle::revision`] rather
/// than mutating fields in place. Signature verification against the
/// embedded certificate is the consumer's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Persistence identifier; `None` until the record is stored.
    pub id: Option<Uuid>,
    /// Raw bundle payload bytes.
    pub data: Vec<u8>,
    /// Signature over `data`.
    pub signature: Vec<u8>,
    /// Identifier of the algorithm that produced `signature`.
    pub signature_algorithm: String,
    /// DER bytes of the certificate that produced `signature`.
    pub signing_certificate: Vec<u8>,
    pub trust_domain_id: Uuid,
    /// Cached name of the owning domain, populated by callers that have
    /// resolved it.
    pub trust_domain_name: Option<TrustDomainName>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bundle {
    /// Creates a new, not-yet-persisted bundle record.
    pub fn new(
        data: Vec<u8>,
        signature: Vec<u8>,
        signature_algorithm: String,
        signing_certificate: Vec<u8>,
        trust_domain_id: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            data,
            signature,
            signature_algorithm,
            signing_certificate,
            trust_domain_id,
            trust_domain_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Produces the successor revision of this bundle after a new signing
    /// event.
    ///
    /// The revision keeps the owning domain but gets a fresh (absent)
    /// identifier and fresh timestamps; the current record is not mutated.
    pub fn revision(
        &self,
        data: Vec<u8>,
        signature: Vec<u8>,
        signature_algorithm: String,
        signing_certificate: Vec<u8>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            data,
            signature,
            signature_algorithm,
            signing_certificate,
            trust_domain_id: self.trust_domain_id,
            trust_domain_name: self.trust_domain_name.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// SHA-256 digest of the payload bytes.
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(&self.data).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> Bundle {
        Bundle::new(
            b"trust material".to_vec(),
            b"sig".to_vec(),
            "ecdsa-with-SHA256".to_string(),
            b"cert".to_vec(),
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    #[test]
    fn digest_is_stable_over_payload() {
        let a = bundle();
        let mut b = a.clone();
        b.signature = b"other-sig".to_vec();
        // The digest covers the payload only, not the provenance fields.
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn digest_changes_with_payload() {
        let a = bundle();
        let mut b = a.clone();
        b.data.push(0);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn revision_keeps_owner_and_resets_identity() {
        let original = bundle();
        let later = original.created_at + chrono::Duration::hours(1);
        let next = original.revision(
            b"new material".to_vec(),
            b"new-sig".to_vec(),
            "ecdsa-with-SHA256".to_string(),
            b"new-cert".to_vec(),
            later,
        );

        assert_eq!(next.trust_domain_id, original.trust_domain_id);
        assert!(next.id.is_none());
        assert_eq!(next.created_at, later);
        // The original record is untouched.
        assert_eq!(original.data, b"trust material".to_vec());
    }
}
