//! Jurisdiction identity.
//!
//! The four static attributes of a jurisdiction. They are part of every
//! fingerprint, so a deployed jurisdiction must never change them: editing
//! any of the four re-keys the content space and strands previously minted
//! records under their old storage keys.

use serde::{Deserialize, Serialize};

/// Static identity attributes of a jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionIdentity {
    /// Human-readable country name, also the jurisdiction identifier
    /// callers pass to `mint` (e.g. "Kenya").
    pub country_name: String,
    /// ISO 3166-1 alpha-2 code (e.g. "KE").
    pub country_code: String,
    /// Currency name (e.g. "Kenya Shilling").
    pub currency_name: String,
    /// ISO 4217 code (e.g. "KES").
    pub currency_code: String,
}

impl JurisdictionIdentity {
    /// Build an identity from the four static attributes.
    pub fn new(
        country_name: impl Into<String>,
        country_code: impl Into<String>,
        currency_name: impl Into<String>,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            country_name: country_name.into(),
            country_code: country_code.into(),
            currency_name: currency_name.into(),
            currency_code: currency_code.into(),
        }
    }
}

impl std::fmt::Display for JurisdictionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.country_name, self.currency_code)
    }
}
