//! Wire↔entity mapping for the Concord trust plane boundary.
//!
//! Wire records are what external callers exchange with the control
//! plane: serde structs with explicitly optional fields. Inbound mapping
//! validates every identity-bearing field through `concord-identity` and
//! normalizes absent optionals to concrete defaults before an entity ever
//! exists; outbound mapping is pure formatting and never fails.
//!
//! The entity model does not track "was never set" for description and
//! onboarding bundle, so outbound mapping always populates those wire
//! fields, even when empty. Callers needing absence semantics must
//! special-case empty values themselves.

pub mod error;
pub mod relationship;
pub mod trust_domain;

pub use error::MappingError;
pub use relationship::RelationshipRecord;
pub use trust_domain::TrustDomainRecord;
