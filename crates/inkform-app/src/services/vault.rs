// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-addressed document vault for ID photos and signed consent PDFs.
//
// Blobs are keyed by the SHA-256 of their plaintext. With a passphrase the
// bytes on disk are age-encrypted; the digest is checked again on every load.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use inkform_core::error::{InkformError, Result};
use inkform_security::integrity::is_hex_digest;
use inkform_security::storage::is_age_encrypted;
use inkform_security::{EncryptedStorage, hash_bytes, verify_hash};
use tracing::{debug, instrument, warn};

#[derive(Clone)]
enum Backend {
    Dir(PathBuf),
    Memory(Arc<Mutex<HashMap<String, Vec<u8>>>>),
}

#[derive(Clone)]
pub struct DocumentVault {
    backend: Backend,
    cipher: Option<Arc<EncryptedStorage>>,
}

impl DocumentVault {
    /// A vault rooted at `dir`, created if needed.
    pub fn on_disk(dir: impl Into<PathBuf>, cipher: Option<EncryptedStorage>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            backend: Backend::Dir(dir),
            cipher: cipher.map(Arc::new),
        })
    }

    pub fn in_memory(cipher: Option<EncryptedStorage>) -> Self {
        Self {
            backend: Backend::Memory(Arc::default()),
            cipher: cipher.map(Arc::new),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// Store `data` and return its digest. Storing the same bytes twice is a
    /// no-op.
    #[instrument(skip_all, fields(len = data.len(), encrypted = self.is_encrypted()))]
    pub fn store(&self, data: &[u8]) -> Result<String> {
        let hash = hash_bytes(data);
        if self.contains(&hash) {
            debug!(%hash, "document already in vault");
            return Ok(hash);
        }

        let payload = match &self.cipher {
            Some(cipher) => cipher.encrypt(data)?,
            None => data.to_vec(),
        };

        match &self.backend {
            Backend::Dir(dir) => std::fs::write(dir.join(&hash), payload)?,
            Backend::Memory(map) => {
                map.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(hash.clone(), payload);
            }
        }
        debug!(%hash, "document stored");
        Ok(hash)
    }

    /// Load and verify a document by digest.
    #[instrument(skip(self))]
    pub fn load(&self, hash: &str) -> Result<Vec<u8>> {
        if !is_hex_digest(hash) {
            return Err(InkformError::NotFound(format!("document {hash}")));
        }

        let raw = match &self.backend {
            Backend::Dir(dir) => match std::fs::read(dir.join(hash)) {
                Ok(raw) => raw,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Err(InkformError::NotFound(format!("document {hash}")));
                }
                Err(err) => return Err(err.into()),
            },
            Backend::Memory(map) => map
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(hash)
                .cloned()
                .ok_or_else(|| InkformError::NotFound(format!("document {hash}")))?,
        };

        let plain = if is_age_encrypted(&raw) {
            match &self.cipher {
                Some(cipher) => cipher.decrypt(&raw)?,
                None => {
                    return Err(InkformError::Decryption(
                        "document is encrypted but no passphrase was given".into(),
                    ));
                }
            }
        } else {
            if self.cipher.is_some() {
                warn!(%hash, "plaintext document in an encrypted vault");
            }
            raw
        };

        verify_hash(&plain, hash)?;
        Ok(plain)
    }

    pub fn contains(&self, hash: &str) -> bool {
        if !is_hex_digest(hash) {
            return false;
        }
        match &self.backend {
            Backend::Dir(dir) => dir.join(hash).is_file(),
            Backend::Memory(map) => map
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(hash),
        }
    }

    /// Delete a document. Returns whether anything was removed.
    pub fn remove(&self, hash: &str) -> Result<bool> {
        if !is_hex_digest(hash) {
            return Ok(false);
        }
        match &self.backend {
            Backend::Dir(dir) => match std::fs::remove_file(dir.join(hash)) {
                Ok(()) => Ok(true),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(err) => Err(err.into()),
            },
            Backend::Memory(map) => Ok(map
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(hash)
                .is_some()),
        }
    }
}
