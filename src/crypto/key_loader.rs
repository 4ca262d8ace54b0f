//! Public key loading from X.509 certificates
//!
//! The receiving service publishes its encryption key as a certificate.
//! Only the embedded RSA public key is extracted; the certificate chain is
//! not validated.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use tracing::{debug, info};
use x509_parser::oid_registry::OID_PKCS1_RSAENCRYPTION;
use x509_parser::pem::parse_x509_pem;
use x509_parser::x509::SubjectPublicKeyInfo;

use crate::error::{BanksapiError, BanksapiResult};

/// Output size of SHA-1, the OAEP digest fixed by the receiving service
pub const SHA1_DIGEST_LEN: usize = 20;

const PEM_CERTIFICATE_LABELS: [&str; 2] = ["CERTIFICATE", "X509 CERTIFICATE"];

/// An RSA public key ready for encryption
///
/// Immutable once loaded. Cloning is cheap enough for start-up wiring.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKeyHandle {
    key: RsaPublicKey,
}

impl PublicKeyHandle {
    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.key
    }

    /// Modulus size in bytes (k)
    pub fn modulus_len(&self) -> usize {
        self.key.size()
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.key.n().bits()
    }

    /// Largest plaintext a single OAEP-SHA1 block can carry: `k - 2*h - 2`
    pub fn max_plaintext_len(&self) -> usize {
        self.modulus_len().saturating_sub(2 * SHA1_DIGEST_LEN + 2)
    }
}

impl From<RsaPublicKey> for PublicKeyHandle {
    fn from(key: RsaPublicKey) -> Self {
        Self { key }
    }
}

impl fmt::Debug for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyHandle")
            .field("algorithm", &"RSA")
            .field("bits", &self.bits())
            .finish()
    }
}

/// Load the public key of a single X.509 certificate read from `reader`
///
/// PEM is the expected form; a bare DER certificate is accepted as well.
pub fn load_from_certificate<R: Read>(mut reader: R) -> BanksapiResult<PublicKeyHandle> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| BanksapiError::key_material_caused_by("Failed to read certificate", e))?;

    let der = certificate_der(&bytes)?;
    let handle = public_key_from_certificate_der(&der)?;
    info!(bits = handle.bits(), "Loaded RSA public key from certificate");
    Ok(handle)
}

/// Load the public key of the certificate stored at `path`
pub fn load_from_certificate_file(path: impl AsRef<Path>) -> BanksapiResult<PublicKeyHandle> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Opening certificate");

    let file = File::open(path).map_err(|e| {
        BanksapiError::key_material_caused_by(
            format!("Failed to open certificate {}", path.display()),
            e,
        )
    })?;

    load_from_certificate(BufReader::new(file))
}

/// Unwrap PEM armour if present, otherwise treat the input as DER
fn certificate_der(bytes: &[u8]) -> BanksapiResult<Vec<u8>> {
    let trimmed = bytes.trim_ascii_start();
    if !trimmed.starts_with(b"-----BEGIN") {
        if trimmed.is_empty() {
            return Err(BanksapiError::key_material("Certificate is empty"));
        }
        return Ok(bytes.to_vec());
    }

    let (_, pem) = parse_x509_pem(trimmed).map_err(|e| {
        BanksapiError::key_material_caused_by("Malformed PEM certificate", e.to_string())
    })?;

    if !PEM_CERTIFICATE_LABELS.contains(&pem.label.as_str()) {
        return Err(BanksapiError::key_material(format!(
            "Expected a PEM certificate, found '{}'",
            pem.label
        )));
    }

    Ok(pem.contents)
}

/// Parse a DER certificate and extract its RSA public key
pub(crate) fn public_key_from_certificate_der(der: &[u8]) -> BanksapiResult<PublicKeyHandle> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).map_err(|e| {
        BanksapiError::key_material_caused_by("Malformed X.509 certificate", e.to_string())
    })?;

    debug!(subject = %cert.subject(), "Parsed certificate");
    public_key_from_spki(cert.public_key())
}

fn public_key_from_spki(spki: &SubjectPublicKeyInfo<'_>) -> BanksapiResult<PublicKeyHandle> {
    if spki.algorithm.algorithm != OID_PKCS1_RSAENCRYPTION {
        return Err(BanksapiError::unsupported_algorithm(format!(
            "Certificate key algorithm {} is not RSA",
            spki.algorithm.algorithm.to_id_string()
        )));
    }

    let key = RsaPublicKey::from_public_key_der(spki.raw).map_err(|e| {
        BanksapiError::key_material_caused_by(
            "Invalid RSA public key in certificate",
            e.to_string(),
        )
    })?;

    Ok(PublicKeyHandle::from(key))
}
