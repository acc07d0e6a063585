//! Field schema and validation result types.
//!
//! A jurisdiction declares its fields as `FieldDefinition`s; validators
//! produce `FieldValue`s. The `FieldValue` carries its optional attributes
//! explicitly, so consumers match on data instead of probing a map and
//! casting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whether a field must be supplied or is merely accepted when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRole {
    /// Must have a value at bind time.
    Essential,
    /// Bound only when supplied; a validator must still exist for it.
    Optional,
}

/// A declared field of a jurisdiction schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Machine name, unique within the jurisdiction (e.g. "accountNumber").
    pub name: String,
    /// Human-readable label (e.g. "Account Number").
    pub label: String,
    /// Essential or optional.
    pub role: FieldRole,
}

impl FieldDefinition {
    /// Declare an essential field.
    pub fn essential(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            role: FieldRole::Essential,
        }
    }

    /// Declare an optional field.
    pub fn optional(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            role: FieldRole::Optional,
        }
    }
}

/// The validation result for one field. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Field machine name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// The raw input the validator saw.
    pub raw_input: String,
    /// Whether the input passed validation.
    pub valid: bool,
    /// Present iff `valid` is false.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
    /// Advisory only; a warning never fails a mint.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning_message: Option<String>,
    /// Attributes the validator derived from the input
    /// (e.g. an institution prefix cut from an account number).
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub derived: BTreeMap<String, String>,
}

impl FieldValue {
    /// A passing result.
    pub fn valid(name: impl Into<String>, label: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            raw_input: raw.into(),
            valid: true,
            error_message: None,
            warning_message: None,
            derived: BTreeMap::new(),
        }
    }

    /// A failing result with its error message.
    pub fn invalid(
        name: impl Into<String>,
        label: impl Into<String>,
        raw: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            raw_input: raw.into(),
            valid: false,
            error_message: Some(error.into()),
            warning_message: None,
            derived: BTreeMap::new(),
        }
    }

    /// Attach a warning to this result.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning_message = Some(warning.into());
        self
    }

    /// Attach a derived attribute to this result.
    pub fn with_derived(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.derived.insert(key.into(), value.into());
        self
    }
}
