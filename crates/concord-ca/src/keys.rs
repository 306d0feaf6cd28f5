//! Subject public key handling for certificate issuance.

use crate::error::CaError;
use rcgen::{PublicKeyData, SignatureAlgorithm};
use x509_parser::oid_registry::asn1_rs::oid;
use x509_parser::prelude::FromDer;
use x509_parser::x509::{AlgorithmIdentifier, SubjectPublicKeyInfo};

/// A subject public key extracted from a DER-encoded
/// SubjectPublicKeyInfo.
///
/// Holding one is proof that the key's algorithm is one the engine can
/// sign certificates for. Implements rcgen's [`PublicKeyData`], which lets
/// the engine issue a certificate without ever seeing the subject's
/// private key.
pub struct SubjectPublicKey {
    raw: Vec<u8>,
    algorithm: &'static SignatureAlgorithm,
}

impl SubjectPublicKey {
    /// Parses a DER-encoded SubjectPublicKeyInfo.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::MalformedPublicKey`] when the DER structure is
    /// invalid and [`CaError::UnsupportedKeyType`] when the key algorithm
    /// is not one of RSA, ECDSA P-256, ECDSA P-384 or Ed25519.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, CaError> {
        let (_, spki) = SubjectPublicKeyInfo::from_der(der)
            .map_err(|e| CaError::MalformedPublicKey(e.to_string()))?;

        let algorithm = detect_algorithm(&spki.algorithm).ok_or(CaError::UnsupportedKeyType)?;

        Ok(Self {
            raw: spki.subject_public_key.data.to_vec(),
            algorithm,
        })
    }
}

impl PublicKeyData for SubjectPublicKey {
    fn der_bytes(&self) -> &[u8] {
        &self.raw
    }

    fn algorithm(&self) -> &'static SignatureAlgorithm {
        self.algorithm
    }
}

impl std::fmt::Debug for SubjectPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectPublicKey")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Maps an X.509 algorithm identifier to the rcgen signature algorithm
/// used when issuing for that key.
fn detect_algorithm(alg: &AlgorithmIdentifier<'_>) -> Option<&'static SignatureAlgorithm> {
    let rsa_oid = oid!(1.2.840.113549.1.1.1); // rsaEncryption
    let ec_oid = oid!(1.2.840.10045.2.1); // id-ecPublicKey
    let ed25519_oid = oid!(1.3.101.112); // Ed25519
    let secp256r1_oid = oid!(1.2.840.10045.3.1.7);
    let secp384r1_oid = oid!(1.3.132.0.34);

    if alg.algorithm == ed25519_oid {
        return Some(&rcgen::PKCS_ED25519);
    }
    if alg.algorithm == rsa_oid {
        return Some(&rcgen::PKCS_RSA_SHA256);
    }
    if alg.algorithm == ec_oid {
        // The curve lives in the algorithm parameters.
        if let Some(params) = &alg.parameters {
            if let Ok(curve_oid) = params.as_oid() {
                if curve_oid == secp256r1_oid {
                    return Some(&rcgen::PKCS_ECDSA_P256_SHA256);
                }
                if curve_oid == secp384r1_oid {
                    return Some(&rcgen::PKCS_ECDSA_P384_SHA384);
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::KeyPair;

    #[test]
    fn accepts_ecdsa_p256_spki() {
        let key = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256).unwrap();
        let spki = key.subject_public_key_info();
        let subject = SubjectPublicKey::from_spki_der(&spki).unwrap();
        assert_eq!(subject.der_bytes(), key.der_bytes());
    }

    #[test]
    fn accepts_ed25519_spki() {
        let key = KeyPair::generate_for(&rcgen::PKCS_ED25519).unwrap();
        let spki = key.subject_public_key_info();
        assert!(SubjectPublicKey::from_spki_der(&spki).is_ok());
    }

    #[test]
    fn rejects_garbage_der() {
        let result = SubjectPublicKey::from_spki_der(b"not a key");
        assert!(matches!(result, Err(CaError::MalformedPublicKey(_))));
    }
}
