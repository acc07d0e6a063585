//! Sealing and opening payloads.
//!
//! `seal` applies the RSA private key to the plaintext, `open` applies the
//! public key to the ciphertext. This is the reverse of the conventional
//! confidentiality direction and is kept deliberately: a record opened
//! with the published public half is thereby proven to have been sealed by
//! the key holder. Both halves stay private in deployment, so the payloads
//! remain confidential in practice. The trade-off and the decision are
//! recorded in DESIGN.md.
//!
//! Payloads are longer than one modulus, so the plaintext is processed in
//! blocks: each chunk of `modulus_len - 11` bytes is padded to PKCS#1 v1.5
//! block type 1 (`00 01 FF.. 00 data`, the deterministic padding defined
//! for private-key operations), run through the raw RSA exponentiation,
//! and emitted as one `modulus_len`-wide block. The concatenated blocks
//! are base64-encoded. `open` reverses each step and verifies the padding
//! structure, so a wrong key or corrupt ciphertext fails loudly instead of
//! yielding garbage plaintext.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rsa::hazmat::{rsa_decrypt_and_check, rsa_encrypt};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

use crate::error::CryptoError;
use crate::keys::KeyManager;
use std::sync::Arc;

/// Bytes of each block consumed by padding: two marker bytes, the
/// separator, and the eight-byte minimum padding string.
const PADDING_OVERHEAD: usize = 11;

/// Seal plaintext with the private key, returning base64 ciphertext.
///
/// # Errors
///
/// `CryptoError::Cipher` if the RSA operation fails,
/// `CryptoError::BlockStructure` if the key's modulus is too small to hold
/// a padded block.
pub fn seal(plaintext: &[u8], key: &RsaPrivateKey) -> Result<String, CryptoError> {
    let width = key.size();
    if width <= PADDING_OVERHEAD {
        return Err(CryptoError::BlockStructure(format!(
            "modulus of {width} bytes cannot hold a padded block"
        )));
    }

    let chunk_len = width - PADDING_OVERHEAD;
    let mut rng = rand::rngs::OsRng;
    let mut sealed = Vec::with_capacity(plaintext.len().div_ceil(chunk_len).max(1) * width);

    // An empty payload still seals to one block of pure padding.
    let chunks: Vec<&[u8]> = if plaintext.is_empty() {
        vec![plaintext]
    } else {
        plaintext.chunks(chunk_len).collect()
    };

    for chunk in chunks {
        let padded = pad_block(chunk, width);
        let m = BigUint::from_bytes_be(&padded);
        let c = rsa_decrypt_and_check(key, Some(&mut rng), &m)
            .map_err(|e| CryptoError::Cipher(e.to_string()))?;
        sealed.extend_from_slice(&to_fixed_width(&c, width)?);
    }

    Ok(STANDARD.encode(sealed))
}

/// Open base64 ciphertext with the public key, returning the plaintext.
///
/// # Errors
///
/// `CryptoError::CiphertextEncoding` for invalid base64,
/// `CryptoError::BlockStructure` when the decoded length is not a multiple
/// of the modulus width or a block's padding does not verify (wrong key,
/// truncation, corruption), `CryptoError::Cipher` if the RSA operation
/// fails.
pub fn open(ciphertext: &str, key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
    let sealed = STANDARD.decode(ciphertext.trim())?;
    let width = key.size();

    if sealed.is_empty() || sealed.len() % width != 0 {
        return Err(CryptoError::BlockStructure(format!(
            "ciphertext of {} bytes is not a multiple of the {width}-byte block size",
            sealed.len()
        )));
    }

    let mut plaintext = Vec::new();
    for block in sealed.chunks(width) {
        let c = BigUint::from_bytes_be(block);
        let m = rsa_encrypt(key, &c).map_err(|e| CryptoError::Cipher(e.to_string()))?;
        let padded = to_fixed_width(&m, width)?;
        plaintext.extend_from_slice(unpad_block(&padded)?);
    }

    Ok(plaintext)
}

/// The seal/open pair bound to a [`KeyManager`].
///
/// This is what the minting pipeline holds: it fetches the provisioned
/// pair on each call and applies the appropriate half.
#[derive(Debug, Clone)]
pub struct CryptoBox {
    key_manager: Arc<KeyManager>,
}

impl CryptoBox {
    /// A box over the given key manager.
    pub fn new(key_manager: Arc<KeyManager>) -> Self {
        Self { key_manager }
    }

    /// Seal plaintext with the managed private key.
    pub fn seal(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        let pair = self.key_manager.key_pair()?;
        seal(plaintext, &pair.private)
    }

    /// Open ciphertext with the managed public key.
    pub fn open(&self, ciphertext: &str) -> Result<Vec<u8>, CryptoError> {
        let pair = self.key_manager.key_pair()?;
        open(ciphertext, &pair.public)
    }
}

/// PKCS#1 v1.5 block type 1: `00 01 FF..FF 00 data`, `width` bytes total.
fn pad_block(data: &[u8], width: usize) -> Vec<u8> {
    let mut block = Vec::with_capacity(width);
    block.push(0x00);
    block.push(0x01);
    block.resize(width - data.len() - 1, 0xFF);
    block.push(0x00);
    block.extend_from_slice(data);
    block
}

/// Strip and verify block type 1 padding.
fn unpad_block(block: &[u8]) -> Result<&[u8], CryptoError> {
    if block.len() < PADDING_OVERHEAD || block[0] != 0x00 || block[1] != 0x01 {
        return Err(CryptoError::BlockStructure(
            "block does not start with a type 1 header".into(),
        ));
    }

    let separator = block[2..]
        .iter()
        .position(|&b| b == 0x00)
        .ok_or_else(|| CryptoError::BlockStructure("padding separator not found".into()))?;

    // At least eight padding bytes, all 0xFF.
    if separator < 8 || block[2..2 + separator].iter().any(|&b| b != 0xFF) {
        return Err(CryptoError::BlockStructure("malformed padding string".into()));
    }

    Ok(&block[2 + separator + 1..])
}

/// Left-pad a big-endian integer to the modulus width.
fn to_fixed_width(n: &BigUint, width: usize) -> Result<Vec<u8>, CryptoError> {
    let bytes = n.to_bytes_be();
    if bytes.len() > width {
        return Err(CryptoError::BlockStructure(format!(
            "cipher value of {} bytes exceeds the {width}-byte block size",
            bytes.len()
        )));
    }
    let mut out = vec![0u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}
