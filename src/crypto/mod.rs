//! Credential encryption for the banking API
//!
//! Loads the service's RSA public key from a certificate or a PKCS#12 key
//! store and encrypts credential values with RSA-OAEP (SHA-1, MGF1) before
//! they are handed to the HTTP layer.

pub mod encryptor;
pub mod key_loader;
pub mod keystore;

pub use encryptor::CredentialEncryptor;
pub use key_loader::{
    load_from_certificate, load_from_certificate_file, PublicKeyHandle, SHA1_DIGEST_LEN,
};
pub use keystore::{load_from_keystore, load_from_keystore_with_password, KeyStoreSource};
