//! RSA-OAEP credential encryption
//!
//! The cipher configuration is dictated by the receiving service and must
//! match it bit for bit:
//!
//! - Algorithm: RSA, no block mode
//! - Padding: OAEP with SHA-1 and MGF1-SHA-1, empty label
//! - Output: standard padded Base64 of the raw ciphertext
//!
//! Every call draws fresh padding randomness from the OS, so encrypting the
//! same value twice never yields the same ciphertext.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rsa::Oaep;
use sha1::Sha1;
use tracing::debug;

use super::key_loader::{load_from_certificate_file, PublicKeyHandle};
use super::keystore::load_from_keystore;
use crate::error::{BanksapiError, BanksapiResult};
use crate::models::{CredentialSet, LoginCredentials, LoginCredentialsMap};

/// Encrypts credential values with one fixed public key
///
/// Holds no per-call state and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct CredentialEncryptor {
    key: PublicKeyHandle,
}

impl CredentialEncryptor {
    /// Create an encryptor for a loaded key
    pub fn new(key: PublicKeyHandle) -> Self {
        Self { key }
    }

    /// Create an encryptor from a PEM certificate file
    pub fn from_certificate_file(path: impl AsRef<Path>) -> BanksapiResult<Self> {
        load_from_certificate_file(path).map(Self::new)
    }

    /// Create an encryptor from a certificate in a key store
    pub fn from_keystore(path: impl AsRef<Path>, alias: &str) -> BanksapiResult<Self> {
        load_from_keystore(path, alias).map(Self::new)
    }

    pub fn public_key(&self) -> &PublicKeyHandle {
        &self.key
    }

    /// Longest UTF-8 plaintext, in bytes, that fits one OAEP block
    pub fn max_plaintext_len(&self) -> usize {
        self.key.max_plaintext_len()
    }

    /// Encrypt a single value and return its Base64 ciphertext
    ///
    /// Values that do not fit one block are rejected; they are never split
    /// or truncated.
    pub fn encrypt_string(&self, plaintext: &str) -> BanksapiResult<String> {
        let bytes = plaintext.as_bytes();
        let limit = self.max_plaintext_len();
        if bytes.len() > limit {
            return Err(BanksapiError::encryption(format!(
                "Plaintext is {} bytes but a {}-bit key allows at most {}",
                bytes.len(),
                self.key.bits(),
                limit
            )));
        }

        let ciphertext = self
            .key
            .rsa()
            .encrypt(&mut OsRng, Oaep::new::<Sha1>(), bytes)
            .map_err(|e| BanksapiError::encryption_caused_by("RSA-OAEP encryption failed", e))?;

        Ok(STANDARD.encode(ciphertext))
    }

    /// Encrypt every value of a credential set, keeping the field names
    pub fn encrypt_credentials(
        &self,
        credentials: &CredentialSet,
    ) -> BanksapiResult<CredentialSet> {
        credentials.try_map(|value| self.encrypt_string(value))
    }

    /// Encrypt the credential set of one login, keeping provider id and sync flag
    pub fn encrypt_login_credentials(
        &self,
        login: &LoginCredentials,
    ) -> BanksapiResult<LoginCredentials> {
        login.try_map_credentials(|value| self.encrypt_string(value))
    }

    /// Encrypt every login in the map, keeping the access ids
    ///
    /// Either every value is encrypted or an error is returned.
    pub fn encrypt_login_credentials_map(
        &self,
        logins: &LoginCredentialsMap,
    ) -> BanksapiResult<LoginCredentialsMap> {
        let encrypted = logins.try_map(|login| self.encrypt_login_credentials(login))?;
        debug!(accesses = encrypted.len(), "Encrypted login credentials");
        Ok(encrypted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_loader::tests::fixture;
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::RsaPrivateKey;

    fn test_encryptor() -> CredentialEncryptor {
        CredentialEncryptor::from_certificate_file(fixture("test-cert.pem")).unwrap()
    }

    fn decrypt(ciphertext: &str) -> String {
        let pem = std::fs::read_to_string(fixture("test-key.pem")).unwrap();
        let key = RsaPrivateKey::from_pkcs8_pem(&pem).unwrap();
        let raw = STANDARD.decode(ciphertext).unwrap();
        let plain = key.decrypt(Oaep::new::<Sha1>(), &raw).unwrap();
        String::from_utf8(plain).unwrap()
    }

    fn sample_set() -> CredentialSet {
        [("user", "alice"), ("pin", "1234")].into_iter().collect()
    }

    #[test]
    fn test_encrypt_decrypt_string() {
        let encryptor = test_encryptor();
        let ciphertext = encryptor.encrypt_string("Hunter2!").unwrap();

        assert_eq!(decrypt(&ciphertext), "Hunter2!");
    }

    #[test]
    fn test_ciphertext_is_one_block_of_base64() {
        let encryptor = test_encryptor();
        let ciphertext = encryptor.encrypt_string("1234").unwrap();

        let raw = STANDARD.decode(&ciphertext).unwrap();
        assert_eq!(raw.len(), encryptor.public_key().modulus_len());
    }

    #[test]
    fn test_same_plaintext_different_ciphertext() {
        let encryptor = test_encryptor();
        let first = encryptor.encrypt_string("1234").unwrap();
        let second = encryptor.encrypt_string("1234").unwrap();

        assert_ne!(first, second);
        assert_eq!(decrypt(&first), "1234");
        assert_eq!(decrypt(&second), "1234");
    }

    #[test]
    fn test_unicode_plaintext_uses_utf8() {
        let encryptor = test_encryptor();
        let ciphertext = encryptor.encrypt_string("Grüße €").unwrap();
        assert_eq!(decrypt(&ciphertext), "Grüße €");
    }

    #[test]
    fn test_empty_plaintext() {
        let encryptor = test_encryptor();
        let ciphertext = encryptor.encrypt_string("").unwrap();
        assert_eq!(decrypt(&ciphertext), "");
    }

    #[test]
    fn test_size_limit() {
        let encryptor = test_encryptor();
        let limit = encryptor.max_plaintext_len();
        assert_eq!(limit, 256 - 2 * 20 - 2);

        let at_limit = "a".repeat(limit);
        let below_limit = "a".repeat(limit - 1);
        let over_limit = "a".repeat(limit + 1);

        assert_eq!(decrypt(&encryptor.encrypt_string(&at_limit).unwrap()), at_limit);
        assert!(encryptor.encrypt_string(&below_limit).is_ok());

        let err = encryptor.encrypt_string(&over_limit).unwrap_err();
        assert!(err.is_encryption());
        assert!(err.to_string().contains("215 bytes"), "unexpected error: {}", err);
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_size_limit_counts_bytes_not_chars() {
        let encryptor = test_encryptor();
        // 'ü' is two bytes in UTF-8
        let text = "ü".repeat(encryptor.max_plaintext_len() / 2 + 1);
        assert!(encryptor.encrypt_string(&text).unwrap_err().is_encryption());
    }

    #[test]
    fn test_encrypt_credentials_keeps_fields() {
        let encryptor = test_encryptor();
        let plain = sample_set();
        let encrypted = encryptor.encrypt_credentials(&plain).unwrap();

        assert_eq!(
            encrypted.fields().collect::<Vec<_>>(),
            plain.fields().collect::<Vec<_>>()
        );
        for (field, value) in plain.iter() {
            let ciphertext = encrypted.get(field).unwrap();
            assert_ne!(ciphertext, value);
            assert_eq!(decrypt(ciphertext), value);
        }
    }

    #[test]
    fn test_encrypt_credentials_fails_as_a_whole() {
        let encryptor = test_encryptor();
        let mut plain = sample_set();
        plain.insert("token", "x".repeat(encryptor.max_plaintext_len() + 1));

        let err = encryptor.encrypt_credentials(&plain).unwrap_err();
        assert!(err.is_encryption());
    }

    #[test]
    fn test_encrypt_login_credentials_map() {
        let encryptor = test_encryptor();
        let mut logins = LoginCredentialsMap::new();
        logins.insert("acc-1", LoginCredentials::new("bankX", sample_set(), true));
        logins.insert("acc-2", LoginCredentials::new("bankY", CredentialSet::new(), false));

        let encrypted = encryptor.encrypt_login_credentials_map(&logins).unwrap();

        assert_eq!(
            encrypted.access_ids().collect::<Vec<_>>(),
            vec!["acc-1", "acc-2"]
        );

        let first = encrypted.get("acc-1").unwrap();
        assert_eq!(first.provider_id, "bankX");
        assert!(first.sync);
        assert_eq!(decrypt(first.credentials.get("user").unwrap()), "alice");
        assert_eq!(decrypt(first.credentials.get("pin").unwrap()), "1234");

        let second = encrypted.get("acc-2").unwrap();
        assert_eq!(second.provider_id, "bankY");
        assert!(!second.sync);
        assert!(second.credentials.is_empty());
    }

    #[test]
    fn test_failed_map_encryption_returns_no_partial_result() {
        let encryptor = test_encryptor();
        let too_long = "x".repeat(encryptor.max_plaintext_len() + 1);

        let mut logins = LoginCredentialsMap::new();
        logins.insert("acc-1", LoginCredentials::new("bankX", sample_set(), true));
        logins.insert(
            "acc-2",
            LoginCredentials::new("bankY", [("password", too_long)].into_iter().collect(), false),
        );

        assert!(encryptor
            .encrypt_login_credentials_map(&logins)
            .unwrap_err()
            .is_encryption());
    }

    #[test]
    fn test_encryptor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CredentialEncryptor>();

        let encryptor = std::sync::Arc::new(test_encryptor());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let encryptor = encryptor.clone();
                std::thread::spawn(move || encryptor.encrypt_string(&format!("pin-{}", i)).unwrap())
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(decrypt(&handle.join().unwrap()), format!("pin-{}", i));
        }
    }
}
