//! Error types for the CA engine.

use thiserror::Error;

/// Errors produced by CA construction and signing operations.
#[derive(Debug, Error)]
pub enum CaError {
    /// Root key material is structurally invalid or the root certificate's
    /// public key does not correspond to the root private key. Raised at
    /// construction time only.
    #[error("invalid CA configuration: {0}")]
    Config(String),

    /// A signing call was made with a non-positive TTL, or one so large
    /// the expiry is not representable.
    #[error("TTL must be positive and yield a representable expiry")]
    InvalidTtl,

    /// The supplied public key uses an algorithm the engine cannot sign
    /// for.
    #[error("unsupported public key type")]
    UnsupportedKeyType,

    /// The supplied subject public key could not be parsed.
    #[error("malformed subject public key: {0}")]
    MalformedPublicKey(String),

    /// The X.509 signing backend failed.
    #[error("certificate signing failed: {0}")]
    X509(#[from] rcgen::Error),

    /// The JWT signing backend failed.
    #[error("token signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
