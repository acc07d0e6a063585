//! Pipeline error type.

use thiserror::Error;

use specie_core::CanonicalizationError;
use specie_crypto::CryptoError;
use specie_schema::SchemaError;
use specie_store::StoreError;

/// A terminal pipeline failure.
///
/// Validation outcomes are not errors; they come back inside
/// [`crate::MintOutcome::Rejected`] so callers can render the report.
/// Everything here aborts the request with no partial state left behind.
#[derive(Error, Debug)]
pub enum MintError {
    /// The requested jurisdiction is not registered.
    #[error("'{jurisdiction}' is unsupported; supported jurisdictions are {supported:?}")]
    UnknownJurisdiction {
        /// What the caller asked for.
        jurisdiction: String,
        /// What is actually registered.
        supported: Vec<String>,
    },

    /// Structural schema misconfiguration surfaced at request time.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Canonical serialization of the payload or fingerprint failed.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// Sealing or opening failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
