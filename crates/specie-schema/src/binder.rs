//! Input binding.
//!
//! Merges a caller-supplied value map with a jurisdiction schema. Binding
//! either produces the full ordered field set or the full list of binding
//! problems; it never half-binds, and validation never runs on a failed
//! bind.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use specie_core::FieldRole;

use crate::profile::JurisdictionProfile;

/// A problem found while binding input to the schema. Binder errors are
/// report data: they are collected as a batch and returned to the caller,
/// not thrown one at a time.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name")]
pub enum BindError {
    /// An essential field has no supplied value.
    #[error("essential field '{0}' must have a value")]
    MissingEssentialField(String),

    /// A supplied field has no validator and cannot be accepted.
    #[error("'{0}' is not a valid input parameter for this jurisdiction")]
    UnknownField(String),
}

/// One bound field: the schema metadata joined with the supplied value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    /// Field machine name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// The supplied value.
    pub raw_input: String,
    /// Essential or optional.
    pub role: FieldRole,
}

/// The ordered bound field set: essentials in schema order, then accepted
/// optionals in input order.
#[derive(Debug, Clone, Default)]
pub struct BoundFields(Vec<BoundField>);

impl BoundFields {
    /// Iterate the bound fields in order.
    pub fn iter(&self) -> impl Iterator<Item = &BoundField> {
        self.0.iter()
    }

    /// The bound value of a sibling field, if that field was bound.
    /// Validators use this for cross-field checks and derivations.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.raw_input.as_str())
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing was bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Bind supplied values against a jurisdiction profile.
///
/// 1. Every essential field must have a supplied value; all absences are
///    collected.
/// 2. Every remaining supplied key is accepted as an optional field iff a
///    validator exists for it; unknown keys are collected and fail the
///    bind as a whole.
///
/// # Errors
///
/// The complete batch of [`BindError`]s, in schema order for missing
/// essentials followed by input order for unknown fields.
pub fn bind(
    profile: &JurisdictionProfile,
    values: &BTreeMap<String, String>,
) -> Result<BoundFields, Vec<BindError>> {
    let mut errors = Vec::new();
    let mut bound = Vec::new();
    let mut consumed = BTreeSet::new();

    for definition in profile.essential_fields() {
        match values.get(&definition.name) {
            Some(value) => {
                consumed.insert(definition.name.clone());
                bound.push(BoundField {
                    name: definition.name.clone(),
                    label: definition.label.clone(),
                    raw_input: value.clone(),
                    role: FieldRole::Essential,
                });
            }
            None => {
                errors.push(BindError::MissingEssentialField(definition.name.clone()));
            }
        }
    }

    for (name, value) in values {
        if consumed.contains(name) {
            continue;
        }
        if profile.validators().contains(name) {
            bound.push(BoundField {
                name: name.clone(),
                label: profile.label_for(name).to_string(),
                raw_input: value.clone(),
                role: FieldRole::Optional,
            });
        } else {
            errors.push(BindError::UnknownField(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(BoundFields(bound))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FieldInput;
    use crate::registry::ValidatorRegistry;
    use specie_core::{FieldDefinition, FieldValue, JurisdictionIdentity};

    fn accept_anything(input: &FieldInput<'_>) -> FieldValue {
        FieldValue::valid(input.name, input.label, input.raw)
    }

    fn profile() -> JurisdictionProfile {
        JurisdictionProfile::new(
            JurisdictionIdentity::new("Testland", "TL", "Test Dollar", "TLD"),
            vec![
                FieldDefinition::essential("accountNumber", "Account Number"),
                FieldDefinition::essential("accountHolderName", "Account Holder Name"),
            ],
            vec![FieldDefinition::optional("BIC", "BIC")],
            ValidatorRegistry::new()
                .register("accountNumber", accept_anything)
                .register("accountHolderName", accept_anything)
                .register("BIC", accept_anything),
        )
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn binds_essentials_in_schema_order_then_optionals() {
        let bound = bind(
            &profile(),
            &values(&[
                ("BIC", "SCBKENLXXXX"),
                ("accountHolderName", "Arthur Buliva"),
                ("accountNumber", "12345678900987654321"),
            ]),
        )
        .unwrap();

        let names: Vec<_> = bound.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["accountNumber", "accountHolderName", "BIC"]);
        assert_eq!(bound.iter().next().unwrap().role, FieldRole::Essential);
        assert_eq!(bound.iter().last().unwrap().role, FieldRole::Optional);
    }

    #[test]
    fn collects_all_missing_essentials() {
        let err = bind(&profile(), &values(&[("BIC", "SCBKENLXXXX")])).unwrap_err();
        assert_eq!(
            err,
            vec![
                BindError::MissingEssentialField("accountNumber".into()),
                BindError::MissingEssentialField("accountHolderName".into()),
            ]
        );
    }

    #[test]
    fn missing_essential_reported_by_name() {
        let err = bind(&profile(), &values(&[("accountHolderName", "Arthur Buliva")]))
            .unwrap_err();
        assert!(err.contains(&BindError::MissingEssentialField("accountNumber".into())));
    }

    #[test]
    fn unknown_field_fails_the_whole_bind() {
        let err = bind(
            &profile(),
            &values(&[
                ("accountNumber", "12345678900987654321"),
                ("accountHolderName", "Arthur Buliva"),
                ("randomField", "x"),
            ]),
        )
        .unwrap_err();
        assert_eq!(err, vec![BindError::UnknownField("randomField".into())]);
    }

    #[test]
    fn sibling_lookup_works_on_bound_set() {
        let bound = bind(
            &profile(),
            &values(&[
                ("accountNumber", "12345678900987654321"),
                ("accountHolderName", "Arthur Buliva"),
            ]),
        )
        .unwrap();
        assert_eq!(bound.value_of("accountNumber"), Some("12345678900987654321"));
        assert_eq!(bound.value_of("BIC"), None);
    }

    #[test]
    fn bind_error_serializes_for_reports() {
        let err = BindError::MissingEssentialField("accountNumber".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "MissingEssentialField");
        assert_eq!(json["name"], "accountNumber");
    }
}
