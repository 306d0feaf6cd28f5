//! Error types for inbound wire mapping.

use concord_identity::IdentityError;
use thiserror::Error;

/// Errors produced when converting a wire record into an entity.
///
/// The original parse failure is preserved as the underlying cause; it is
/// never discarded. Mapping errors indicate malformed input, not transient
/// failure, so they are surfaced to the caller without retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The harvester SPIFFE ID on the wire record is malformed.
    #[error("malformed harvester SPIFFE ID")]
    MalformedSpiffeId(#[source] IdentityError),

    /// The trust domain name on the wire record is malformed.
    #[error("malformed trust domain name")]
    MalformedTrustDomain(#[source] IdentityError),
}
