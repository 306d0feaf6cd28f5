//! Relationship wire records and their entity mapping.

use chrono::{DateTime, Utc};
use concord_types::Relationship;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire-format relationship record.
///
/// Both trust domain identifiers are assumed already validated by the time
/// a relationship exists, so mapping in either direction is a
/// field-for-field pass-through with no parsing or validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub id: Uuid,
    pub trust_domain_a_id: Uuid,
    pub trust_domain_b_id: Uuid,
    pub trust_domain_a_consent: bool,
    pub trust_domain_b_consent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RelationshipRecord {
    /// Converts the wire record into an entity. Never fails.
    pub fn to_entity(&self) -> Relationship {
        Relationship {
            id: Some(self.id),
            trust_domain_a_id: self.trust_domain_a_id,
            trust_domain_b_id: self.trust_domain_b_id,
            trust_domain_a_name: None,
            trust_domain_b_name: None,
            trust_domain_a_consent: self.trust_domain_a_consent,
            trust_domain_b_consent: self.trust_domain_b_consent,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Renders an entity back to wire form. Never fails.
    pub fn from_entity(entity: &Relationship) -> Self {
        Self {
            id: entity.id.unwrap_or_default(),
            trust_domain_a_id: entity.trust_domain_a_id,
            trust_domain_b_id: entity.trust_domain_b_id,
            trust_domain_a_consent: entity.trust_domain_a_consent,
            trust_domain_b_consent: entity.trust_domain_b_consent,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_types::{ConsentSide, RelationshipStatus};

    fn record() -> RelationshipRecord {
        RelationshipRecord {
            id: Uuid::new_v4(),
            trust_domain_a_id: Uuid::new_v4(),
            trust_domain_b_id: Uuid::new_v4(),
            trust_domain_a_consent: true,
            trust_domain_b_consent: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn round_trip_is_a_pass_through() {
        let record = record();
        let back = RelationshipRecord::from_entity(&record.to_entity());
        assert_eq!(back, record);
    }

    #[test]
    fn consent_state_survives_mapping() {
        let mut entity = record().to_entity();
        assert_eq!(entity.status(), RelationshipStatus::Proposed);

        entity.grant_consent(ConsentSide::B, Utc::now());
        let wire = RelationshipRecord::from_entity(&entity);
        assert!(wire.trust_domain_a_consent);
        assert!(wire.trust_domain_b_consent);
        assert!(wire.to_entity().is_established());
    }
}
