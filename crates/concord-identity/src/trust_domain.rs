//! Validated trust domain names.

use crate::IdentityError;
use serde::{Deserialize, Serialize};

/// Maximum length of a trust domain name in bytes.
const MAX_LEN: usize = 255;

/// A validated trust domain name.
///
/// Trust domain names are lowercase DNS-like labels: letters, digits,
/// dots, dashes and underscores, at most 255 bytes, with no scheme prefix
/// and no path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrustDomainName(String);

impl TrustDomainName {
    /// Parses and validates a candidate trust domain name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidTrustDomain`] when the input is
    /// empty, too long, carries a scheme or path, or contains characters
    /// outside `a-z`, `0-9`, `.`, `-`, `_`.
    pub fn parse(name: &str) -> Result<Self, IdentityError> {
        let reject = |reason| IdentityError::InvalidTrustDomain {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(reject("name is empty"));
        }
        if name.len() > MAX_LEN {
            return Err(reject("name exceeds 255 bytes"));
        }
        if name.contains("://") {
            return Err(reject("name must not include a scheme"));
        }
        if name.contains('/') {
            return Err(reject("name must not include a path"));
        }
        if !name.bytes().all(is_name_byte) {
            return Err(reject(
                "name may only contain lowercase letters, digits, '.', '-' and '_'",
            ));
        }

        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'_'
}

impl std::fmt::Display for TrustDomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TrustDomainName {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TrustDomainName {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TrustDomainName> for String {
    fn from(name: TrustDomainName) -> Self {
        name.0
    }
}
