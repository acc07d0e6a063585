//! The stored payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use specie_core::{FieldValue, JurisdictionIdentity, StorageKey};

/// One field as it is persisted: the accepted value with its metadata.
///
/// Validity flags and error messages are ephemeral request state; a coin
/// only ever holds fields that passed, so persisting `valid: true` on each
/// row would say nothing. Warnings and derived attributes are kept because
/// they carry information the input alone does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredField {
    /// Field machine name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// The validated value.
    pub value: String,
    /// Advisory message attached by the validator, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning_message: Option<String>,
    /// Attributes the validator derived from the input.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub derived: BTreeMap<String, String>,
}

impl From<&FieldValue> for StoredField {
    fn from(field: &FieldValue) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            value: field.raw_input.clone(),
            warning_message: field.warning_message.clone(),
            derived: field.derived.clone(),
        }
    }
}

/// A minted coin as sealed into the store: the storage key it lives under,
/// the identity of the jurisdiction that minted it, and the validated
/// field set. Logically immutable from the moment it is sealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCoin {
    /// The fingerprint the coin is addressed by.
    pub storage_key: StorageKey,
    /// Static identity of the minting jurisdiction.
    pub jurisdiction: JurisdictionIdentity,
    /// The validated fields, in bound order.
    pub fields: Vec<StoredField>,
}

impl StoredCoin {
    /// Assemble a coin from validated field results.
    pub fn new(
        storage_key: StorageKey,
        jurisdiction: JurisdictionIdentity,
        fields: &[FieldValue],
    ) -> Self {
        Self {
            storage_key,
            jurisdiction,
            fields: fields.iter().map(StoredField::from).collect(),
        }
    }

    /// The stored value of a field, if present.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
