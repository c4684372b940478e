// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encrypted storage: passphrase-based age encryption for ID photos and
// signed consent forms kept on the device.

use std::io::{Read, Write};

use age::secrecy::SecretString;
use inkform_core::error::InkformError;
use tracing::{debug, instrument};

/// Passphrase-based encryption of whole blobs using `age` (scrypt recipient).
///
/// Each call is stateless; the passphrase lives only as long as this value.
pub struct EncryptedStorage {
    passphrase: SecretString,
}

impl EncryptedStorage {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: SecretString::from(passphrase.into()),
        }
    }

    /// Encrypt `plaintext` into a complete age file.
    #[instrument(skip_all, fields(plaintext_len = plaintext.len()))]
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, InkformError> {
        let encryptor = age::Encryptor::with_user_passphrase(self.passphrase.clone());
        let mut ciphertext = Vec::new();

        let mut writer = encryptor
            .wrap_output(&mut ciphertext)
            .map_err(|e| InkformError::Encryption(e.to_string()))?;
        writer
            .write_all(plaintext)
            .map_err(|e| InkformError::Encryption(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| InkformError::Encryption(e.to_string()))?;

        debug!(ciphertext_len = ciphertext.len(), "blob encrypted");
        Ok(ciphertext)
    }

    /// Decrypt an age file produced by [`encrypt`](Self::encrypt).
    #[instrument(skip_all, fields(ciphertext_len = ciphertext.len()))]
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, InkformError> {
        let decryptor = age::Decryptor::new(ciphertext)
            .map_err(|e| InkformError::Decryption(e.to_string()))?;
        let identity = age::scrypt::Identity::new(self.passphrase.clone());

        let mut reader = decryptor
            .decrypt(std::iter::once(&identity as &dyn age::Identity))
            .map_err(|e| InkformError::Decryption(e.to_string()))?;

        let mut plaintext = Vec::new();
        reader
            .read_to_end(&mut plaintext)
            .map_err(|e| InkformError::Decryption(e.to_string()))?;

        debug!(plaintext_len = plaintext.len(), "blob decrypted");
        Ok(plaintext)
    }
}

/// Whether `data` starts with the age v1 header, i.e. was written encrypted.
pub fn is_age_encrypted(data: &[u8]) -> bool {
    data.starts_with(b"age-encryption.org/v1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_photo_round_trip() {
        let storage = EncryptedStorage::new("studio-front-desk");
        let photo = b"\xFF\xD8\xFF\xE0 fake jpeg bytes";

        let sealed = storage.encrypt(photo).expect("encrypt");
        assert!(is_age_encrypted(&sealed));
        assert_ne!(&sealed[..], photo);
        assert_eq!(storage.decrypt(&sealed).expect("decrypt"), photo);
    }

    #[test]
    fn wrong_passphrase_fails() {
        let sealed = EncryptedStorage::new("alpha").encrypt(b"consent").unwrap();
        assert!(matches!(
            EncryptedStorage::new("beta").decrypt(&sealed),
            Err(InkformError::Decryption(_))
        ));
    }

    #[test]
    fn plain_bytes_are_not_mistaken_for_age() {
        assert!(!is_age_encrypted(b"%PDF-1.7"));
    }
}
