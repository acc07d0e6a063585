//! Content fingerprints.
//!
//! A minted record is addressed by a fingerprint of its validated content:
//! the jurisdiction's static identity plus the validated field set are
//! serialized canonically, the text `"<countryName>.<canonicalJson>"` is
//! base64-encoded, hashed with SHA3-512, and the digest base64-encoded
//! again. Both encodings use the standard alphabet without padding.
//!
//! Identical validated input for the same jurisdiction therefore always
//! lands on the same storage key, which is what makes minting idempotent
//! and retry-safe.
//!
//! Field ordering: the caller-facing input is an unordered map, so
//! `fingerprint()` sorts the field list by field name before
//! canonicalization and JCS sorts all object keys. No map iteration order
//! can reach the digest.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_512};

use crate::canonical::CanonicalBytes;
use crate::error::CanonicalizationError;
use crate::identity::JurisdictionIdentity;

/// The deterministic lookup key of a minted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wrap an externally supplied key, e.g. one a caller got back from a
    /// previous mint.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty key, which can never address a record.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One validated field as it enters the fingerprint: name, label and the
/// accepted value. Validity flags and messages are ephemeral and excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintField {
    /// Field machine name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// The validated raw value.
    pub value: String,
}

impl FingerprintField {
    /// Build a fingerprint field.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The canonical document the fingerprint is computed over.
#[derive(Serialize)]
struct FingerprintDoc<'a> {
    jurisdiction: &'a JurisdictionIdentity,
    fields: &'a [FingerprintField],
}

/// Compute the storage key for a validated field set under a jurisdiction.
///
/// # Errors
///
/// Returns `CanonicalizationError` if the document cannot be serialized
/// canonically. With string-only field data this does not happen in
/// practice; the error is surfaced rather than swallowed so a future
/// payload change cannot silently produce unstable keys.
pub fn fingerprint(
    jurisdiction: &JurisdictionIdentity,
    fields: &[FingerprintField],
) -> Result<StorageKey, CanonicalizationError> {
    let mut sorted: Vec<FingerprintField> = fields.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let doc = FingerprintDoc {
        jurisdiction,
        fields: &sorted,
    };
    let canonical = CanonicalBytes::new(&doc)?;

    let preimage = format!("{}.{}", jurisdiction.country_name, canonical.as_str()?);
    let encoded = STANDARD_NO_PAD.encode(preimage.as_bytes());
    let digest = Sha3_512::digest(encoded.as_bytes());

    Ok(StorageKey(STANDARD_NO_PAD.encode(digest)))
}
