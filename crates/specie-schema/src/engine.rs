//! The validation engine.
//!
//! Runs each bound field through its registered validator and aggregates
//! the results into a [`ValidationReport`]. Per-field failures are data in
//! the report; the engine returns `Err` only for structural
//! misconfiguration (a bound field with no validator), which registration
//! makes unreachable for registered profiles.

use serde::{Deserialize, Serialize};

use specie_core::FieldValue;

use crate::binder::{BindError, BoundFields};
use crate::profile::JurisdictionProfile;
use crate::registry::SchemaError;

/// What a validator sees: its field's metadata and raw input, plus read
/// access to the sibling bound values for cross-field checks.
pub struct FieldInput<'a> {
    /// Field machine name.
    pub name: &'a str,
    /// Human-readable label.
    pub label: &'a str,
    /// The supplied value.
    pub raw: &'a str,
    /// All bound fields of this submission.
    pub siblings: &'a BoundFields,
}

/// The aggregate outcome of binding and validating one submission.
///
/// Serializable as-is so transport layers can render it to callers
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The jurisdiction the submission was checked against.
    pub jurisdiction: String,
    /// Binding problems; non-empty means validation never ran.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub bind_errors: Vec<BindError>,
    /// Per-field validation results, in bound order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<FieldValue>,
}

impl ValidationReport {
    /// A report for a failed bind.
    pub fn from_bind_errors(jurisdiction: impl Into<String>, errors: Vec<BindError>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            bind_errors: errors,
            fields: Vec::new(),
        }
    }

    /// A report for a completed validation run.
    pub fn from_fields(jurisdiction: impl Into<String>, fields: Vec<FieldValue>) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            bind_errors: Vec::new(),
            fields,
        }
    }

    /// True when binding succeeded and every field is valid.
    pub fn is_ok(&self) -> bool {
        self.bind_errors.is_empty() && self.fields.iter().all(|f| f.valid)
    }

    /// The failing fields, if any.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter().filter(|f| !f.valid)
    }
}

/// Validate a bound field set against its profile's validator table.
///
/// A bound field with an empty raw input is marked invalid without
/// invoking its validator; everything else is dispatched.
///
/// # Errors
///
/// `SchemaError::MissingValidator` if a bound field has no validator in
/// the table. This is a programmer error, not a report entry.
pub fn validate(
    profile: &JurisdictionProfile,
    bound: &BoundFields,
) -> Result<Vec<FieldValue>, SchemaError> {
    let mut results = Vec::with_capacity(bound.len());

    for field in bound.iter() {
        if field.raw_input.is_empty() {
            results.push(FieldValue::invalid(
                field.name.as_str(),
                field.label.as_str(),
                field.raw_input.as_str(),
                "No value provided",
            ));
            continue;
        }

        let validator = profile.validators().get(&field.name).ok_or_else(|| {
            SchemaError::MissingValidator {
                jurisdiction: profile.identity().country_name.clone(),
                field: field.name.clone(),
            }
        })?;

        results.push(validator(&FieldInput {
            name: &field.name,
            label: &field.label,
            raw: &field.raw_input,
            siblings: bound,
        }));
    }

    Ok(results)
}
