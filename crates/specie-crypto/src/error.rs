//! Cryptographic error types.

use thiserror::Error;

/// Error in key provisioning or cipher operations. Always terminal for the
/// operation that hit it; callers abort and surface it.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key files exist but could not be parsed as valid key material.
    #[error("invalid key material: {0}")]
    KeyMaterial(String),

    /// Generating a fresh key pair failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Reading or writing the key files failed.
    #[error("key file io error: {0}")]
    Io(#[from] std::io::Error),

    /// The ciphertext is not valid base64.
    #[error("ciphertext is not valid base64: {0}")]
    CiphertextEncoding(#[from] base64::DecodeError),

    /// A cipher block did not have the expected size or padding structure.
    /// Wrong key, truncated ciphertext, and corruption all land here.
    #[error("cipher block mismatch: {0}")]
    BlockStructure(String),

    /// The underlying RSA operation failed.
    #[error("cipher operation failed: {0}")]
    Cipher(String),
}
