//! Bilateral federation relationships and their consent state machine.

use chrono::{DateTime, Utc};
use concord_identity::TrustDomainName;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of a relationship a consent operation applies to.
///
/// The two sides are ordered but the order implies no hierarchy; side A is
/// simply the domain that proposed the relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentSide {
    /// The proposing domain.
    A,
    /// The domain the proposal was addressed to.
    B,
}

/// Lifecycle state of a relationship, derived from the consent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipStatus {
    /// At most one side has consented.
    Proposed,
    /// Both sides have consented; federation is active.
    Established,
}

/// A bilateral federation link between two trust domains.
///
/// A relationship is *established* only while both consent flags are true.
/// Either side may grant or withdraw consent independently at any time;
/// withdrawal after establishment demotes the relationship back to
/// [`RelationshipStatus::Proposed`]. A relationship is never implicitly
/// deleted: withdrawal is a flag transition, not removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Persistence identifier; `None` until the record is stored.
    pub id: Option<Uuid>,
    pub trust_domain_a_id: Uuid,
    pub trust_domain_b_id: Uuid,
    /// Cached name of side A, populated by callers that have resolved it.
    pub trust_domain_a_name: Option<TrustDomainName>,
    /// Cached name of side B, populated by callers that have resolved it.
    pub trust_domain_b_name: Option<TrustDomainName>,
    pub trust_domain_a_consent: bool,
    pub trust_domain_b_consent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    /// Creates a relationship proposal from domain A towards domain B.
    ///
    /// The proposer's consent flag is set; the other side's is unset.
    pub fn propose(trust_domain_a_id: Uuid, trust_domain_b_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            trust_domain_a_id,
            trust_domain_b_id,
            trust_domain_a_name: None,
            trust_domain_b_name: None,
            trust_domain_a_consent: true,
            trust_domain_b_consent: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records consent from one side.
    pub fn grant_consent(&mut self, side: ConsentSide, now: DateTime<Utc>) {
        self.set_consent(side, true, now);
    }

    /// Withdraws consent from one side.
    ///
    /// Reachable from any state, including after establishment.
    pub fn withdraw_consent(&mut self, side: ConsentSide, now: DateTime<Utc>) {
        self.set_consent(side, false, now);
    }

    fn set_consent(&mut self, side: ConsentSide, consent: bool, now: DateTime<Utc>) {
        match side {
            ConsentSide::A => self.trust_domain_a_consent = consent,
            ConsentSide::B => self.trust_domain_b_consent = consent,
        }
        self.updated_at = now;
    }

    /// True while both sides hold consent.
    pub fn is_established(&self) -> bool {
        self.trust_domain_a_consent && self.trust_domain_b_consent
    }

    /// Returns the lifecycle status derived from the consent flags.
    pub fn status(&self) -> RelationshipStatus {
        if self.is_established() {
            RelationshipStatus::Established
        } else {
            RelationshipStatus::Proposed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Relationship {
        Relationship::propose(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn proposal_sets_only_the_proposer_consent() {
        let rel = proposal();
        assert!(rel.trust_domain_a_consent);
        assert!(!rel.trust_domain_b_consent);
        assert_eq!(rel.status(), RelationshipStatus::Proposed);
        assert!(!rel.is_established());
    }

    #[test]
    fn mutual_consent_establishes_the_relationship() {
        let mut rel = proposal();
        rel.grant_consent(ConsentSide::B, Utc::now());
        assert!(rel.is_established());
        assert_eq!(rel.status(), RelationshipStatus::Established);
    }

    #[test]
    fn one_sided_consent_is_not_established() {
        let mut rel = proposal();
        rel.withdraw_consent(ConsentSide::A, Utc::now());
        rel.grant_consent(ConsentSide::B, Utc::now());
        assert!(!rel.is_established());
    }

    #[test]
    fn withdrawal_after_establishment_demotes_to_proposed() {
        let mut rel = proposal();
        rel.grant_consent(ConsentSide::B, Utc::now());
        assert!(rel.is_established());

        rel.withdraw_consent(ConsentSide::A, Utc::now());
        assert_eq!(rel.status(), RelationshipStatus::Proposed);
        // The record still exists; withdrawal is a flag transition.
        assert!(rel.trust_domain_b_consent);
    }

    #[test]
    fn consent_transitions_bump_updated_at() {
        let mut rel = proposal();
        let later = rel.updated_at + chrono::Duration::seconds(5);
        rel.grant_consent(ConsentSide::B, later);
        assert_eq!(rel.updated_at, later);
    }
}
