//! Public key loading from PKCS#12 key stores
//!
//! PKCS#12 is the default key store type of current Java platforms, which is
//! how the aggregation service distributes its certificate to some clients.
//! Certificates are public, so stores are opened with the empty password
//! unless one is configured explicitly.

use std::fmt;
use std::path::{Path, PathBuf};

use der::asn1::{AnyRef, ObjectIdentifier, OctetStringRef};
use der::{Decode, Sequence};
use p12_keystore::{KeyStore, KeyStoreEntry};
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::key_loader::{public_key_from_certificate_der, PublicKeyHandle};
use crate::error::{BanksapiError, BanksapiResult};

const OID_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");
const OID_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");

/// Digests accepted for the store's integrity MAC
const SUPPORTED_MAC_DIGESTS: [(ObjectIdentifier, &str); 2] =
    [(OID_SHA1, "SHA-1"), (OID_SHA256, "SHA-256")];

/// Location of a certificate inside a key store
#[derive(Clone)]
pub struct KeyStoreSource {
    pub path: PathBuf,
    pub alias: String,
    password: Zeroizing<String>,
}

impl KeyStoreSource {
    /// Source opened with the empty password
    pub fn new(path: impl Into<PathBuf>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: alias.into(),
            password: Zeroizing::new(String::new()),
        }
    }

    /// Use an explicit store password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(password.into());
        self
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for KeyStoreSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStoreSource")
            .field("path", &self.path)
            .field("alias", &self.alias)
            .field("password", &if self.password.is_empty() { "<empty>" } else { "<set>" })
            .finish()
    }
}

/// Load the public key of the certificate stored under `alias`
pub fn load_from_keystore(path: impl AsRef<Path>, alias: &str) -> BanksapiResult<PublicKeyHandle> {
    load_from_keystore_with_password(&KeyStoreSource::new(path.as_ref(), alias))
}

/// Load the public key described by `source`
///
/// Entries are looked up by their friendly name. A trusted certificate
/// stored without one can only be found by its subject DN, e.g.
/// `CN=banksapi-crypto test`.
pub fn load_from_keystore_with_password(
    source: &KeyStoreSource,
) -> BanksapiResult<PublicKeyHandle> {
    debug!(path = %source.path.display(), alias = %source.alias, "Opening key store");

    let data = std::fs::read(&source.path).map_err(|e| {
        BanksapiError::key_material_caused_by(
            format!("Failed to read key store {}", source.path.display()),
            e,
        )
    })?;

    check_integrity_algorithm(&data)?;

    let store = KeyStore::from_pkcs12(&data, source.password())
        .map_err(|e| open_error(&source.path, e))?;

    let der = match store.entry(&source.alias) {
        Some(KeyStoreEntry::Certificate(cert)) => cert.as_der(),
        Some(KeyStoreEntry::PrivateKeyChain(chain)) => chain
            .chain()
            .first()
            .map(|cert| cert.as_der())
            .ok_or_else(|| {
                BanksapiError::key_material(format!(
                    "Key store entry '{}' has no certificate",
                    source.alias
                ))
            })?,
        None => {
            return Err(BanksapiError::key_material(format!(
                "Alias '{}' not found in key store {}",
                source.alias,
                source.path.display()
            )))
        }
    };

    let handle = public_key_from_certificate_der(der)?;
    info!(alias = %source.alias, bits = handle.bits(), "Loaded RSA public key from key store");
    Ok(handle)
}

/// Ciphers and MACs the reader cannot handle are algorithm problems; anything
/// else (bad password, corrupt data) is a problem with the store itself
fn open_error(path: &Path, err: p12_keystore::error::Error) -> BanksapiError {
    use p12_keystore::error::Error;

    match err {
        Error::UnsupportedEncryptionScheme | Error::UnsupportedMacAlgorithm => {
            BanksapiError::unsupported_algorithm_caused_by(
                format!("Key store {} uses an unsupported algorithm", path.display()),
                err,
            )
        }
        err => BanksapiError::key_material_caused_by(
            format!("Failed to open key store {}", path.display()),
            err,
        ),
    }
}

// Just enough of RFC 7292 PFX to read the MAC digest algorithm.

#[derive(Sequence)]
#[allow(dead_code)]
struct PfxView<'a> {
    version: u8,
    auth_safe: AnyRef<'a>,
    #[asn1(optional = "true")]
    mac_data: Option<MacDataView<'a>>,
}

#[derive(Sequence)]
#[allow(dead_code)]
struct MacDataView<'a> {
    mac: DigestInfoView<'a>,
    mac_salt: OctetStringRef<'a>,
    #[asn1(optional = "true")]
    iterations: Option<u32>,
}

#[derive(Sequence)]
#[allow(dead_code)]
struct DigestInfoView<'a> {
    algorithm: AlgorithmView<'a>,
    digest: OctetStringRef<'a>,
}

#[derive(Sequence)]
#[allow(dead_code)]
struct AlgorithmView<'a> {
    oid: ObjectIdentifier,
    #[asn1(optional = "true")]
    parameters: Option<AnyRef<'a>>,
}

/// Reject stores whose integrity MAC uses a digest we cannot compute
///
/// Input that does not parse as DER is left to the PKCS#12 reader, which
/// also handles BER-encoded stores.
fn check_integrity_algorithm(data: &[u8]) -> BanksapiResult<()> {
    let pfx = match PfxView::from_der(data) {
        Ok(pfx) => pfx,
        Err(e) => {
            debug!(error = %e, "Key store is not plain DER, skipping MAC algorithm check");
            return Ok(());
        }
    };

    let Some(mac_data) = pfx.mac_data else {
        return Ok(());
    };

    let oid = mac_data.mac.algorithm.oid;
    match SUPPORTED_MAC_DIGESTS.iter().find(|(supported, _)| *supported == oid) {
        Some((_, name)) => {
            debug!(digest = *name, "Key store integrity MAC");
            Ok(())
        }
        None => Err(BanksapiError::unsupported_algorithm(format!(
            "Key store integrity MAC uses unsupported digest {}",
            oid
        ))),
    }
}
