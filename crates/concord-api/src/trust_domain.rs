//! Trust domain wire records and their entity mapping.

use chrono::{DateTime, Utc};
use concord_identity::{SpiffeId, TrustDomainName};
use concord_types::TrustDomain;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MappingError;

/// Wire-format trust domain record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustDomainRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvester_spiffe_id: Option<String>,
    /// Opaque onboarding bundle payload, carried as text on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_bundle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrustDomainRecord {
    /// Converts the wire record into a validated entity.
    ///
    /// The name and the harvester identity (when present) pass through the
    /// identity validators; absent description and onboarding bundle are
    /// normalized to their empty defaults; the wire identifier is carried
    /// verbatim as a present identifier. No field is silently dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::MalformedTrustDomain`] or
    /// [`MappingError::MalformedSpiffeId`] with the parse failure attached
    /// as the underlying cause. No entity is produced on failure.
    pub fn to_entity(&self) -> Result<TrustDomain, MappingError> {
        // Harvester identity is checked before the name, so when both are
        // malformed the identity error wins.
        let harvester_id = self
            .harvester_spiffe_id
            .as_deref()
            .map(SpiffeId::parse)
            .transpose()
            .map_err(MappingError::MalformedSpiffeId)?;

        let name =
            TrustDomainName::parse(&self.name).map_err(MappingError::MalformedTrustDomain)?;

        let description = self.description.clone().unwrap_or_default();
        let onboarding_bundle = self
            .onboarding_bundle
            .as_ref()
            .map(|bundle| bundle.as_bytes().to_vec())
            .unwrap_or_default();

        Ok(TrustDomain {
            id: Some(self.id),
            name,
            description,
            harvester_id,
            onboarding_bundle,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Renders an entity back to wire form. Pure formatting; never fails.
    ///
    /// Description and onboarding bundle become present wire fields even
    /// when empty, because the entity model does not distinguish "empty"
    /// from "never set" for them.
    pub fn from_entity(entity: &TrustDomain) -> Self {
        Self {
            id: entity.id.unwrap_or_default(),
            name: entity.name.to_string(),
            description: Some(entity.description.clone()),
            harvester_spiffe_id: entity.harvester_id.as_ref().map(SpiffeId::to_string),
            onboarding_bundle: Some(
                String::from_utf8_lossy(&entity.onboarding_bundle).into_owned(),
            ),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TrustDomainRecord {
        TrustDomainRecord {
            id: Uuid::new_v4(),
            name: "example.org".to_string(),
            description: Some("an example domain".to_string()),
            harvester_spiffe_id: Some("spiffe://example.org/harvester".to_string()),
            onboarding_bundle: Some("bundle-payload".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn inbound_produces_validated_entity() {
        let record = record();
        let entity = record.to_entity().unwrap();

        assert_eq!(entity.id, Some(record.id));
        assert_eq!(entity.name.as_str(), "example.org");
        assert_eq!(entity.description, "an example domain");
        assert_eq!(
            entity.harvester_id.as_ref().unwrap().to_string(),
            "spiffe://example.org/harvester"
        );
        assert_eq!(entity.onboarding_bundle, b"bundle-payload".to_vec());
        assert_eq!(entity.created_at, record.created_at);
    }

    #[test]
    fn inbound_defaults_absent_optionals() {
        let mut record = record();
        record.description = None;
        record.onboarding_bundle = None;
        record.harvester_spiffe_id = None;

        let entity = record.to_entity().unwrap();
        assert_eq!(entity.description, "");
        assert!(entity.onboarding_bundle.is_empty());
        assert!(entity.harvester_id.is_none());
    }

    #[test]
    fn inbound_rejects_malformed_trust_domain_name() {
        let mut record = record();
        record.name = "Not A Domain".to_string();

        let err = record.to_entity().unwrap_err();
        assert!(matches!(err, MappingError::MalformedTrustDomain(_)));
        // The parse failure is preserved as the underlying cause.
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn inbound_rejects_malformed_harvester_identity() {
        let mut record = record();
        record.harvester_spiffe_id = Some("not-a-spiffe-id".to_string());

        let err = record.to_entity().unwrap_err();
        assert!(matches!(err, MappingError::MalformedSpiffeId(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn harvester_identity_is_checked_before_the_name() {
        let mut record = record();
        record.name = "Not A Domain".to_string();
        record.harvester_spiffe_id = Some("not-a-spiffe-id".to_string());

        let err = record.to_entity().unwrap_err();
        assert!(matches!(err, MappingError::MalformedSpiffeId(_)));
    }

    #[test]
    fn round_trip_preserves_wire_fields() {
        let record = record();
        let entity = record.to_entity().unwrap();
        let back = TrustDomainRecord::from_entity(&entity);

        assert_eq!(back, record);
    }

    #[test]
    fn outbound_populates_empty_fields_as_present() {
        let mut record = record();
        record.description = None;
        record.onboarding_bundle = None;

        let entity = record.to_entity().unwrap();
        let back = TrustDomainRecord::from_entity(&entity);

        assert_eq!(back.description, Some(String::new()));
        assert_eq!(back.onboarding_bundle, Some(String::new()));
    }

    #[test]
    fn wire_record_omits_absent_fields_in_json() {
        let mut record = record();
        record.description = None;
        record.harvester_spiffe_id = None;
        record.onboarding_bundle = None;

        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("harvester_spiffe_id"));
        assert!(!object.contains_key("onboarding_bundle"));
    }
}
