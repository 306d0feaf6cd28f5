//! Validated SPIFFE-style identities.

use crate::{IdentityError, TrustDomainName};
use serde::{Deserialize, Serialize};

const SCHEME: &str = "spiffe://";

/// Maximum length of a full SPIFFE ID in bytes.
const MAX_LEN: usize = 2048;

/// A validated SPIFFE-style identity.
///
/// An identity has the form `spiffe://<trust-domain>[/<path>]`. The trust
/// domain component obeys [`TrustDomainName`] rules; each path segment is
/// non-empty, is not a relative modifier (`.` or `..`), and is limited to
/// letters, digits, `.`, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpiffeId {
    trust_domain: TrustDomainName,
    path: String,
}

impl SpiffeId {
    /// Parses and validates a candidate SPIFFE ID string.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidSpiffeId`] when the scheme is
    /// missing, the trust domain component is malformed, or any path
    /// segment violates the segment rules.
    pub fn parse(id: &str) -> Result<Self, IdentityError> {
        let reject = |reason| IdentityError::InvalidSpiffeId {
            id: id.to_string(),
            reason,
        };

        if id.len() > MAX_LEN {
            return Err(reject("identity exceeds 2048 bytes"));
        }
        let rest = id.strip_prefix(SCHEME).ok_or_else(|| {
            reject("identity must start with the spiffe:// scheme")
        })?;

        let (domain, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };

        let trust_domain =
            TrustDomainName::parse(domain).map_err(|_| reject("malformed trust domain component"))?;

        if !path.is_empty() {
            if path.ends_with('/') {
                return Err(reject("path must not end with a separator"));
            }
            for segment in path[1..].split('/') {
                if segment.is_empty() {
                    return Err(reject("path contains an empty segment"));
                }
                if segment == "." || segment == ".." {
                    return Err(reject("path contains a relative modifier segment"));
                }
                if !segment.bytes().all(is_segment_byte) {
                    return Err(reject(
                        "path segments may only contain letters, digits, '.', '-' and '_'",
                    ));
                }
            }
        }

        Ok(Self {
            trust_domain,
            path: path.to_string(),
        })
    }

    /// Returns the trust domain this identity is scoped to.
    pub fn trust_domain(&self) -> &TrustDomainName {
        &self.trust_domain
    }

    /// Returns the path component, starting with `/`, or the empty string
    /// when the identity names the trust domain itself.
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_segment_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_'
}

impl std::fmt::Display for SpiffeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME}{}{}", self.trust_domain, self.path)
    }
}

impl std::str::FromStr for SpiffeId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SpiffeId {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SpiffeId> for String {
    fn from(id: SpiffeId) -> Self {
        id.to_string()
    }
}
