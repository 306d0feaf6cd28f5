//! SPIFFE-style identity validation for the Concord trust plane.
//!
//! This crate provides the two validated identity types used across the
//! workspace: [`TrustDomainName`], the globally unique name of a trust
//! domain, and [`SpiffeId`], an identity string scoped to a trust domain.
//!
//! Both parsers are pure functions: the same input always yields the same
//! outcome and there are no side effects. The only way to obtain either
//! type is through its parser, so holding a value is proof that the string
//! form is well-formed. Malformed input is rejected with an
//! [`IdentityError`] describing the violation.

use thiserror::Error;

mod spiffe;
mod trust_domain;

pub use spiffe::SpiffeId;
pub use trust_domain::TrustDomainName;

/// Errors produced by identity parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The candidate trust domain name is malformed.
    #[error("invalid trust domain name {name:?}: {reason}")]
    InvalidTrustDomain {
        /// The rejected input.
        name: String,
        /// Which constraint the input violated.
        reason: &'static str,
    },

    /// The candidate SPIFFE ID is malformed.
    #[error("invalid SPIFFE ID {id:?}: {reason}")]
    InvalidSpiffeId {
        /// The rejected input.
        id: String,
        /// Which constraint the input violated.
        reason: &'static str,
    },
}
