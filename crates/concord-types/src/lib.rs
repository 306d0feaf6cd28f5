//! Entity model for the Concord trust plane.
//!
//! This crate defines the four domain records the federation control plane
//! operates on: [`TrustDomain`], [`Relationship`], [`JoinToken`] and
//! [`Bundle`]. The records are owned by the control plane's persistence
//! layer; this crate only constructs, validates and transforms them in
//! memory and performs no storage.
//!
//! Identifiers are `Option<Uuid>`: `None` means "not yet persisted" and is
//! distinct from any assigned value, so no sentinel UUID is ever needed.
//! Name and identity fields use the validated types from
//! `concord-identity`, which makes the syntactic invariants hold by
//! construction.

mod bundle;
mod join_token;
mod relationship;
mod trust_domain;

pub use bundle::Bundle;
pub use join_token::{JoinToken, JoinTokenError};
pub use relationship::{ConsentSide, Relationship, RelationshipStatus};
pub use trust_domain::TrustDomain;
