//! RSA key pair provisioning.
//!
//! The pair lives in two DER files under the configured directory:
//! PKCS#8 for the private half, SubjectPublicKeyInfo for the public half.
//! Provisioning happens at most once, on first use: if both files exist
//! they are loaded, otherwise a pair is generated and both halves are
//! persisted before the first cipher operation runs. Generation at
//! production modulus sizes takes a long time, which is acceptable exactly
//! because it cannot happen twice.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::info;

use crate::error::CryptoError;

/// File name of the private half, relative to the key directory.
pub const PRIVATE_KEY_FILE: &str = "private.key";
/// File name of the public half, relative to the key directory.
pub const PUBLIC_KEY_FILE: &str = "public.key";
/// Default modulus size in bits.
pub const DEFAULT_KEY_BITS: usize = 4096;

/// A loaded RSA key pair.
pub struct KeyPair {
    /// The private half, used to seal.
    pub private: RsaPrivateKey,
    /// The public half, used to open.
    pub public: RsaPublicKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("KeyPair").finish_non_exhaustive()
    }
}

/// Owns the key directory and the lazily provisioned pair.
///
/// Construct one per process and share it (`Arc`). The mutex guards the
/// provision-or-load step so two concurrent first calls cannot both
/// generate and overwrite each other's files; afterwards it only guards a
/// cache read.
#[derive(Debug)]
pub struct KeyManager {
    key_dir: PathBuf,
    key_bits: usize,
    cached: Mutex<Option<Arc<KeyPair>>>,
}

impl KeyManager {
    /// A manager over `key_dir` with the default modulus size.
    pub fn new(key_dir: impl Into<PathBuf>) -> Self {
        Self::with_key_bits(key_dir, DEFAULT_KEY_BITS)
    }

    /// A manager over `key_dir` with an explicit modulus size. The size
    /// only matters when generating; loading accepts whatever the files
    /// hold.
    pub fn with_key_bits(key_dir: impl Into<PathBuf>, key_bits: usize) -> Self {
        Self {
            key_dir: key_dir.into(),
            key_bits,
            cached: Mutex::new(None),
        }
    }

    /// The directory holding the two key files.
    pub fn key_dir(&self) -> &PathBuf {
        &self.key_dir
    }

    /// The key pair, provisioning it on first call.
    ///
    /// # Errors
    ///
    /// `CryptoError` when the files are unreadable, hold invalid key
    /// material, or generation fails.
    pub fn key_pair(&self) -> Result<Arc<KeyPair>, CryptoError> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| CryptoError::KeyMaterial("key cache lock poisoned".into()))?;

        if let Some(pair) = cached.as_ref() {
            return Ok(Arc::clone(pair));
        }

        let pair = Arc::new(self.load_or_generate()?);
        *cached = Some(Arc::clone(&pair));
        Ok(pair)
    }

    fn load_or_generate(&self) -> Result<KeyPair, CryptoError> {
        let private_path = self.key_dir.join(PRIVATE_KEY_FILE);
        let public_path = self.key_dir.join(PUBLIC_KEY_FILE);

        if private_path.exists() && public_path.exists() {
            let private = RsaPrivateKey::from_pkcs8_der(&fs::read(&private_path)?)
                .map_err(|e| CryptoError::KeyMaterial(format!("{}: {e}", private_path.display())))?;
            let public = RsaPublicKey::from_public_key_der(&fs::read(&public_path)?)
                .map_err(|e| CryptoError::KeyMaterial(format!("{}: {e}", public_path.display())))?;
            return Ok(KeyPair { private, public });
        }

        info!(
            key_dir = %self.key_dir.display(),
            key_bits = self.key_bits,
            "generating first-time encryption keys, this will take a while"
        );

        let mut rng = rand::rngs::OsRng;
        let private = RsaPrivateKey::new(&mut rng, self.key_bits)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = private.to_public_key();

        fs::create_dir_all(&self.key_dir)?;
        let private_der = private
            .to_pkcs8_der()
            .map_err(|e| CryptoError::KeyMaterial(e.to_string()))?;
        let public_der = public
            .to_public_key_der()
            .map_err(|e| CryptoError::KeyMaterial(e.to_string()))?;
        fs::write(&private_path, private_der.as_bytes())?;
        fs::write(&public_path, public_der.as_bytes())?;

        info!(key_dir = %self.key_dir.display(), "encryption keys persisted");

        Ok(KeyPair { private, public })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::traits::PublicKeyParts;

    // Small modulus keeps generation fast; cipher behavior is identical.
    const TEST_BITS: usize = 512;

    #[test]
    fn generates_and_persists_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let manager = KeyManager::with_key_bits(dir.path(), TEST_BITS);

        let pair = manager.key_pair().unwrap();
        assert_eq!(pair.public.size() * 8, TEST_BITS);
        assert!(dir.path().join(PRIVATE_KEY_FILE).exists());
        assert!(dir.path().join(PUBLIC_KEY_FILE).exists());
    }

    #[test]
    fn second_manager_loads_the_same_pair() {
        let dir = tempfile::tempdir().unwrap();
        let first = KeyManager::with_key_bits(dir.path(), TEST_BITS);
        let generated = first.key_pair().unwrap();

        let second = KeyManager::with_key_bits(dir.path(), TEST_BITS);
        let loaded = second.key_pair().unwrap();

        assert_eq!(generated.public.n(), loaded.public.n());
        assert_eq!(generated.public.e(), loaded.public.e());
    }

    #[test]
    fn repeated_calls_reuse_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let manager = KeyManager::with_key_bits(dir.path(), TEST_BITS);
        let a = manager.key_pair().unwrap();
        let b = manager.key_pair().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn corrupt_private_key_file_is_a_key_material_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PRIVATE_KEY_FILE), b"not a key").unwrap();
        std::fs::write(dir.path().join(PUBLIC_KEY_FILE), b"not a key").unwrap();

        let manager = KeyManager::with_key_bits(dir.path(), TEST_BITS);
        assert!(matches!(
            manager.key_pair().unwrap_err(),
            CryptoError::KeyMaterial(_)
        ));
    }
}
