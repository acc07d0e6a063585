//! The pipeline itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use specie_core::{fingerprint, CanonicalBytes, FingerprintField, StorageKey};
use specie_crypto::{CryptoBox, KeyManager};
use specie_schema::{bind, validate, JurisdictionRegistry, ValidationReport};
use specie_store::CoinStore;

use crate::coin::StoredCoin;
use crate::config::MintConfig;
use crate::error::MintError;

/// The result of a mint attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintOutcome {
    /// Every field validated; the coin is sealed and stored.
    Minted {
        /// The key the coin can be shown under.
        storage_key: StorageKey,
    },
    /// Binding or validation failed; nothing was stored. The report holds
    /// the complete per-field picture for rendering to the caller.
    Rejected(ValidationReport),
}

impl MintOutcome {
    /// The storage key, if the mint succeeded.
    pub fn storage_key(&self) -> Option<&StorageKey> {
        match self {
            Self::Minted { storage_key } => Some(storage_key),
            Self::Rejected(_) => None,
        }
    }
}

/// The assembled pipeline: jurisdiction registry, crypto, and store.
///
/// Construct once and share; each call is synchronous and acquires its own
/// storage connection.
#[derive(Debug)]
pub struct Mint {
    registry: JurisdictionRegistry,
    crypto: CryptoBox,
    store: CoinStore,
}

impl Mint {
    /// Wire a pipeline from explicit components.
    pub fn new(registry: JurisdictionRegistry, crypto: CryptoBox, store: CoinStore) -> Self {
        Self {
            registry,
            crypto,
            store,
        }
    }

    /// Open a pipeline over a data directory: built-in jurisdictions, keys
    /// under `keys/`, records under `silo/coins.db`.
    pub fn open(config: MintConfig) -> Result<Self, MintError> {
        let registry = JurisdictionRegistry::with_builtins()?;
        let key_manager = Arc::new(KeyManager::with_key_bits(config.key_dir(), config.key_bits));
        Ok(Self::new(
            registry,
            CryptoBox::new(key_manager),
            CoinStore::new(config.db_path()),
        ))
    }

    /// The registered jurisdiction identifiers.
    pub fn supported_jurisdictions(&self) -> Vec<String> {
        self.registry.supported()
    }

    /// Mint a coin from raw field values.
    ///
    /// Runs Bind → Validate → Fingerprint → Seal → Store in that order.
    /// Binding and validation failures come back as
    /// [`MintOutcome::Rejected`] with the full report; nothing is written
    /// unless every stage succeeds.
    ///
    /// Minting is idempotent: the storage key is a fingerprint of the
    /// validated content, and the store treats a duplicate key as success
    /// without touching the existing row, so an identical resubmission
    /// returns the same key and leaves exactly one record.
    ///
    /// # Errors
    ///
    /// [`MintError`] for unknown jurisdictions and for crypto, storage,
    /// canonicalization, or structural schema failures.
    pub fn mint(
        &self,
        jurisdiction: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<MintOutcome, MintError> {
        let profile = self.registry.get(jurisdiction).ok_or_else(|| {
            MintError::UnknownJurisdiction {
                jurisdiction: jurisdiction.to_string(),
                supported: self.registry.supported(),
            }
        })?;

        let bound = match bind(profile, values) {
            Ok(bound) => bound,
            Err(errors) => {
                return Ok(MintOutcome::Rejected(ValidationReport::from_bind_errors(
                    jurisdiction,
                    errors,
                )));
            }
        };

        let fields = validate(profile, &bound)?;
        let report = ValidationReport::from_fields(jurisdiction, fields);
        if !report.is_ok() {
            return Ok(MintOutcome::Rejected(report));
        }

        for field in &report.fields {
            if let Some(warning) = &field.warning_message {
                warn!(jurisdiction, field = %field.name, warning = %warning, "validator warning");
            }
        }

        let fingerprint_fields: Vec<FingerprintField> = report
            .fields
            .iter()
            .map(|f| FingerprintField::new(f.name.as_str(), f.label.as_str(), f.raw_input.as_str()))
            .collect();
        let storage_key = fingerprint(profile.identity(), &fingerprint_fields)?;

        let coin = StoredCoin::new(
            storage_key.clone(),
            profile.identity().clone(),
            &report.fields,
        );
        // Canonical plaintext: identical input seals identical bytes, so
        // the idempotent insert always shadows a byte-equal payload.
        let payload = CanonicalBytes::new(&coin)?;
        let ciphertext = self.crypto.seal(payload.as_bytes())?;

        self.store.put(
            storage_key.as_str(),
            &profile.identity().country_code,
            &ciphertext,
        )?;

        info!(jurisdiction, storage_key = %storage_key, "minted coin");
        Ok(MintOutcome::Minted { storage_key })
    }

    /// Fetch and open a previously minted coin.
    ///
    /// Returns the validated field set as stored. Unknown, invalidated,
    /// and empty keys read as absent; so does a record whose ciphertext no
    /// longer opens, which is logged and never silently replaced with
    /// fabricated content.
    ///
    /// # Errors
    ///
    /// [`MintError::Store`] when the backing store itself fails.
    pub fn show(&self, storage_key: &str) -> Result<Option<StoredCoin>, MintError> {
        if storage_key.is_empty() {
            return Ok(None);
        }

        let Some(ciphertext) = self.store.get(storage_key)? else {
            return Ok(None);
        };

        let plaintext = match self.crypto.open(&ciphertext) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                error!(storage_key, error = %e, "stored record failed to open");
                return Ok(None);
            }
        };

        match serde_json::from_slice::<StoredCoin>(&plaintext) {
            Ok(coin) => Ok(Some(coin)),
            Err(e) => {
                error!(storage_key, error = %e, "stored record failed to parse");
                Ok(None)
            }
        }
    }

    /// Soft-invalidate a minted coin so `show` stops returning it. The
    /// row itself is kept.
    pub fn invalidate(&self, storage_key: &str) -> Result<bool, MintError> {
        Ok(self.store.invalidate(storage_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small keys keep per-test generation fast; the cipher path is the same.
    const TEST_BITS: usize = 512;

    fn mint_fixture() -> (tempfile::TempDir, Mint) {
        let dir = tempfile::tempdir().unwrap();
        let config = MintConfig::new(dir.path()).with_key_bits(TEST_BITS);
        let mint = Mint::open(config).unwrap();
        (dir, mint)
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn kenya_submission() -> BTreeMap<String, String> {
        values(&[
            ("accountHolderName", "Arthur Buliva"),
            ("accountNumber", "12345678900987654321"),
            ("accountHolderAddress", "Hello world"),
            ("BIC", "SCBKENLXXXX"),
        ])
    }

    #[test]
    fn unknown_jurisdiction_is_an_error() {
        let (_dir, mint) = mint_fixture();
        let err = mint.mint("Atlantis", &kenya_submission()).unwrap_err();
        assert!(matches!(err, MintError::UnknownJurisdiction { .. }));
    }

    #[test]
    fn supported_jurisdictions_lists_builtins() {
        let (_dir, mint) = mint_fixture();
        assert_eq!(mint.supported_jurisdictions(), vec!["Kenya".to_string()]);
    }

    #[test]
    fn rejected_mint_reports_and_does_not_store() {
        let (_dir, mint) = mint_fixture();
        let submission = values(&[("accountHolderName", "Arthur Buliva")]);

        let outcome = mint.mint("Kenya", &submission).unwrap();
        let MintOutcome::Rejected(report) = outcome else {
            panic!("expected rejection");
        };
        assert!(!report.is_ok());
        assert!(!report.bind_errors.is_empty());
    }

    #[test]
    fn show_with_empty_key_is_absent() {
        let (_dir, mint) = mint_fixture();
        assert!(mint.show("").unwrap().is_none());
    }

    #[test]
    fn show_with_unknown_key_is_absent() {
        let (_dir, mint) = mint_fixture();
        assert!(mint.show("no-such-key").unwrap().is_none());
    }

    #[test]
    fn mint_then_invalidate_hides_the_coin() {
        let (_dir, mint) = mint_fixture();
        let outcome = mint.mint("Kenya", &kenya_submission()).unwrap();
        let key = outcome.storage_key().expect("should mint").clone();

        assert!(mint.show(key.as_str()).unwrap().is_some());
        assert!(mint.invalidate(key.as_str()).unwrap());
        assert!(mint.show(key.as_str()).unwrap().is_none());
    }
}
