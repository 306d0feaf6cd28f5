//! Certificate authority engine for the Concord trust plane.
//!
//! Anchored to a long-lived root key pair, the engine issues two kinds of
//! short-lived artifacts: X.509 mutual-TLS leaf certificates and signed
//! JWTs with registered claims. All time-derived fields of one artifact
//! are computed from a single captured clock reading, and the clock itself
//! is an injected capability so issuance is deterministic under test.
//!
//! The engine is stateless apart from its immutable root key material and
//! the clock, so concurrent calls from multiple request handlers are
//! independent and safe. Signing failures are never retried internally and
//! no partial artifact is ever returned.

pub mod ca;
pub mod clock;
pub mod error;
pub mod keys;

pub use ca::{
    Ca, CaConfig, Claims, JwtParams, SubjectName, X509CertificateParams, NOT_BEFORE_TOLERANCE,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CaError;
pub use keys::SubjectPublicKey;
