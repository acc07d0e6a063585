//! Error types for canonical serialization.
//!
//! Crates further up the stack define their own error enums and convert at
//! the seams with `#[from]`. Field validation outcomes are not errors and
//! never appear here; they travel as report values.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Field values and derived attributes are strings; amounts that reach
    /// the fingerprint as floats would have non-deterministic text forms.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// The canonical byte sequence was not valid UTF-8.
    ///
    /// Cannot happen for output produced by `serde_jcs`; kept as a typed
    /// error so the conversion to text never needs to panic.
    #[error("canonical bytes are not valid UTF-8")]
    NotUtf8,
}
