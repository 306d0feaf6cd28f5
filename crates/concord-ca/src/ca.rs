//! The certificate authority engine.

use std::ptr;
use std::sync::Arc;

use concord_identity::TrustDomainName;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use rand::rngs::OsRng;
use rand::RngCore;
use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, Issuer, KeyPair,
    KeyUsagePurpose, PublicKeyData, SerialNumber, SignatureAlgorithm,
};
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::{debug, info};
use x509_parser::pem::parse_x509_pem;

use crate::clock::Clock;
use crate::error::CaError;
use crate::keys::SubjectPublicKey;

/// How far NotBefore is backdated from the captured issuance instant, to
/// absorb clock skew between this issuer and relying parties.
pub const NOT_BEFORE_TOLERANCE: Duration = Duration::minutes(2);

/// Serial numbers are 160 bits of CSPRNG output, comfortably above the
/// 128-bit collision floor.
const SERIAL_NUMBER_BYTES: usize = 20;

/// Configuration for constructing a [`Ca`].
pub struct CaConfig {
    /// PEM-encoded root certificate.
    pub root_cert_pem: String,
    /// PEM-encoded root private key. Its public component must match the
    /// root certificate.
    pub root_key_pem: String,
    /// Time source used for every time-derived artifact field.
    pub clock: Arc<dyn Clock>,
}

/// Subject distinguished-name fields for an issued leaf certificate.
#[derive(Debug, Clone)]
pub struct SubjectName {
    pub organization: String,
    pub common_name: String,
    /// Optional organizational unit.
    pub organizational_unit: Option<String>,
    /// Optional two-letter country code.
    pub country: Option<String>,
}

impl SubjectName {
    /// Creates a subject with just the two mandatory fields.
    pub fn new(organization: impl Into<String>, common_name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            common_name: common_name.into(),
            organizational_unit: None,
            country: None,
        }
    }
}

/// Parameters for [`Ca::sign_x509_certificate`].
pub struct X509CertificateParams {
    /// The subject's public key.
    pub public_key: SubjectPublicKey,
    /// Requested certificate lifetime; must be positive.
    pub ttl: Duration,
    /// Subject distinguished-name fields.
    pub subject: SubjectName,
}

/// Parameters for [`Ca::sign_jwt`].
pub struct JwtParams {
    pub issuer: String,
    /// The trust domain the token is issued to; becomes the `sub` claim.
    pub subject: TrustDomainName,
    pub audience: Vec<String>,
    /// Requested token lifetime; must be positive.
    pub ttl: Duration,
}

/// Registered claims carried by tokens the engine signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// The certificate authority engine.
///
/// Holds only immutable root key material and a clock capability, so a
/// single instance may be shared across concurrently-running request
/// handlers without external locking.
pub struct Ca {
    issuer: Issuer<'static, KeyPair>,
    clock: Arc<dyn Clock>,
    jwt_algorithm: Algorithm,
    jwt_signing_key: EncodingKey,
    public_key_der: Vec<u8>,
    public_key_pem: String,
}

impl Ca {
    /// Constructs the engine from root key material and a clock.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::Config`] when the key or certificate cannot be
    /// parsed, or when the certificate's public key does not correspond to
    /// the private key. The mismatch is checked explicitly here so a
    /// misconfigured root fails loudly at startup rather than producing
    /// unverifiable artifacts later.
    pub fn new(config: CaConfig) -> Result<Self, CaError> {
        let key_pair = KeyPair::from_pem(&config.root_key_pem)
            .map_err(|e| CaError::Config(format!("failed to parse root private key: {e}")))?;

        let (_, root_pem) = parse_x509_pem(config.root_cert_pem.as_bytes())
            .map_err(|e| CaError::Config(format!("failed to parse root certificate PEM: {e}")))?;
        let root_cert = root_pem
            .parse_x509()
            .map_err(|e| CaError::Config(format!("failed to parse root certificate: {e}")))?;

        let cert_key_bits = root_cert.public_key().subject_public_key.data.as_ref();
        if cert_key_bits != key_pair.der_bytes() {
            return Err(CaError::Config(
                "root certificate public key does not match the root private key".to_string(),
            ));
        }

        let jwt_algorithm = jwt_algorithm_for(key_pair.algorithm())?;
        let jwt_signing_key = jwt_signing_key(jwt_algorithm, config.root_key_pem.as_bytes())?;
        let public_key_der = key_pair.subject_public_key_info();
        let public_key_pem = key_pair.public_key_pem();

        let issuer = Issuer::from_ca_cert_pem(&config.root_cert_pem, key_pair)
            .map_err(|e| CaError::Config(format!("failed to load root certificate: {e}")))?;

        info!(algorithm = ?jwt_algorithm, "certificate authority initialized");

        Ok(Self {
            issuer,
            clock: config.clock,
            jwt_algorithm,
            jwt_signing_key,
            public_key_der,
            public_key_pem,
        })
    }

    /// DER-encoded SubjectPublicKeyInfo of the root key, for external
    /// verification of issued artifacts.
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    /// PEM-encoded root public key.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// Issues a short-lived mutual-TLS leaf certificate, returned as DER.
    ///
    /// Every time-derived field comes from one captured clock reading:
    /// NotBefore is that instant minus [`NOT_BEFORE_TOLERANCE`], NotAfter
    /// is that instant plus the TTL. The subject common name is also
    /// placed in the DNS SAN list; consumers must not rely on the
    /// deprecated common-name-as-identity convention. The result always
    /// chains to the configured root certificate.
    ///
    /// # Errors
    ///
    /// Returns [`CaError::InvalidTtl`] for a TTL that is non-positive or
    /// yields an unrepresentable expiry, and [`CaError::X509`] when the
    /// signing backend fails. No partial certificate is returned.
    pub fn sign_x509_certificate(&self, params: X509CertificateParams) -> Result<Vec<u8>, CaError> {
        if params.ttl <= Duration::ZERO {
            return Err(CaError::InvalidTtl);
        }

        let now = self.clock.now();
        let not_after = now.checked_add(params.ttl).ok_or(CaError::InvalidTtl)?;

        // The common name doubles as the sole DNS SAN entry.
        let mut cert_params = CertificateParams::new(vec![params.subject.common_name.clone()])?;

        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, params.subject.organization.clone());
        if let Some(ou) = &params.subject.organizational_unit {
            dn.push(DnType::OrganizationalUnitName, ou.clone());
        }
        if let Some(country) = &params.subject.country {
            dn.push(DnType::CountryName, country.clone());
        }
        dn.push(DnType::CommonName, params.subject.common_name.clone());
        cert_params.distinguished_name = dn;

        cert_params.not_before = now - NOT_BEFORE_TOLERANCE;
        cert_params.not_after = not_after;
        cert_params.serial_number = Some(random_serial_number());

        // Always a dual-role mutual-TLS leaf, never a CA certificate.
        cert_params.is_ca = IsCa::ExplicitNoCa;
        cert_params.key_usages = vec![
            KeyUsagePurpose::KeyEncipherment,
            KeyUsagePurpose::KeyAgreement,
            KeyUsagePurpose::DigitalSignature,
        ];
        cert_params.extended_key_usages = vec![
            ExtendedKeyUsagePurpose::ServerAuth,
            ExtendedKeyUsagePurpose::ClientAuth,
        ];

        let cert = cert_params.signed_by(&params.public_key, &self.issuer)?;

        debug!(
            common_name = %params.subject.common_name,
            ttl_seconds = params.ttl.whole_seconds(),
            "issued leaf certificate"
        );

        Ok(cert.der().to_vec())
    }

    /// Issues a compact signed JWT with registered claims.
    ///
    /// From one captured clock reading: `iat` is that instant, `exp` is
    /// that instant plus the TTL, both at second precision. The signing
    /// algorithm follows the root key's type, and the token verifies
    /// against [`Ca::public_key_pem`].
    ///
    /// # Errors
    ///
    /// Returns [`CaError::InvalidTtl`] for a TTL that is non-positive or
    /// yields an unrepresentable expiry, and [`CaError::Jwt`] when the
    /// signing backend fails. No partial token is returned.
    pub fn sign_jwt(&self, params: JwtParams) -> Result<String, CaError> {
        if params.ttl <= Duration::ZERO {
            return Err(CaError::InvalidTtl);
        }

        let now = self.clock.now();
        let expires_at = now.checked_add(params.ttl).ok_or(CaError::InvalidTtl)?;
        let claims = Claims {
            iss: params.issuer,
            sub: params.subject.to_string(),
            aud: params.audience,
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(self.jwt_algorithm),
            &claims,
            &self.jwt_signing_key,
        )?;

        debug!(subject = %claims.sub, "issued federation token");

        Ok(token)
    }
}

fn random_serial_number() -> SerialNumber {
    let mut bytes = [0u8; SERIAL_NUMBER_BYTES];
    OsRng.fill_bytes(&mut bytes);
    // Keep the DER integer positive.
    bytes[0] &= 0x7f;
    SerialNumber::from(bytes.to_vec())
}

fn jwt_algorithm_for(algorithm: &'static SignatureAlgorithm) -> Result<Algorithm, CaError> {
    if ptr::eq(algorithm, &rcgen::PKCS_ECDSA_P256_SHA256) {
        Ok(Algorithm::ES256)
    } else if ptr::eq(algorithm, &rcgen::PKCS_ECDSA_P384_SHA384) {
        Ok(Algorithm::ES384)
    } else if ptr::eq(algorithm, &rcgen::PKCS_ED25519) {
        Ok(Algorithm::EdDSA)
    } else if ptr::eq(algorithm, &rcgen::PKCS_RSA_SHA256) {
        Ok(Algorithm::RS256)
    } else {
        Err(CaError::UnsupportedKeyType)
    }
}

fn jwt_signing_key(algorithm: Algorithm, key_pem: &[u8]) -> Result<EncodingKey, CaError> {
    let key = match algorithm {
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(key_pem),
        Algorithm::EdDSA => EncodingKey::from_ed_pem(key_pem),
        Algorithm::RS256 => EncodingKey::from_rsa_pem(key_pem),
        _ => return Err(CaError::UnsupportedKeyType),
    };
    key.map_err(|e| CaError::Config(format!("failed to load root key for token signing: {e}")))
}
