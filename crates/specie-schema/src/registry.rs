//! Validator and jurisdiction registries.
//!
//! Both registries are explicit tables. A validator is bound to a field
//! name with [`ValidatorRegistry::register`]; a jurisdiction becomes
//! available for minting only through [`JurisdictionRegistry::register`],
//! which checks the profile exhaustively. Operators fix a rejected
//! profile; requests never see a half-defined jurisdiction.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::engine::FieldInput;
use crate::profile::JurisdictionProfile;
use specie_core::FieldValue;

/// A field validator: pure function of the raw input plus read access to
/// sibling bound values.
pub type ValidatorFn = fn(&FieldInput<'_>) -> FieldValue;

/// Structural schema errors. These indicate misconfiguration and are fixed
/// by operators; they are never produced by bad request data.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A declared field has no validator bound for it. Fatal at
    /// registration, so this can never surface at request time.
    #[error("jurisdiction '{jurisdiction}' declares field '{field}' without a validator")]
    IncompleteSchema {
        /// The jurisdiction being registered.
        jurisdiction: String,
        /// The field name lacking a validator.
        field: String,
    },

    /// The same field name is declared twice within one jurisdiction.
    #[error("jurisdiction '{jurisdiction}' declares field '{field}' more than once")]
    FieldClash {
        /// The jurisdiction being registered.
        jurisdiction: String,
        /// The duplicated field name.
        field: String,
    },

    /// A jurisdiction with this identifier is already registered.
    #[error("jurisdiction '{jurisdiction}' is already registered")]
    DuplicateJurisdiction {
        /// The duplicated identifier.
        jurisdiction: String,
    },

    /// A bound field reached dispatch with no validator in the table.
    /// Registration checks make this unreachable for registered profiles;
    /// it is surfaced as a typed error rather than a panic.
    #[error("no validator bound for field '{field}' of jurisdiction '{jurisdiction}'")]
    MissingValidator {
        /// The jurisdiction being validated.
        jurisdiction: String,
        /// The field name lacking a validator.
        field: String,
    },
}

/// Table binding field names to validator functions.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<String, ValidatorFn>,
}

impl ValidatorRegistry {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a validator to a field name. Rebinding a name replaces the
    /// previous validator; profiles are checked for clashes separately.
    pub fn register(mut self, name: impl Into<String>, validator: ValidatorFn) -> Self {
        self.validators.insert(name.into(), validator);
        self
    }

    /// Whether a validator is bound for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Look up the validator bound for `name`.
    pub fn get(&self, name: &str) -> Option<ValidatorFn> {
        self.validators.get(name).copied()
    }

    /// The bound field names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.validators.keys().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("fields", &self.names())
            .finish()
    }
}

/// The process-wide table of mintable jurisdictions.
///
/// Built once at startup and injected wherever needed. Profiles inside it
/// are immutable: changing a registered profile's fields or identity would
/// re-key the content space and strand existing records, so the registry
/// hands out shared references only.
#[derive(Debug, Default)]
pub struct JurisdictionRegistry {
    profiles: BTreeMap<String, JurisdictionProfile>,
}

impl JurisdictionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in jurisdiction installed.
    pub fn with_builtins() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.register(crate::kenya::kenya())?;
        Ok(registry)
    }

    /// Install a jurisdiction, verifying its schema invariants:
    /// unique field names, and a validator bound for every declared field.
    ///
    /// # Errors
    ///
    /// `SchemaError::FieldClash`, `SchemaError::IncompleteSchema`, or
    /// `SchemaError::DuplicateJurisdiction`. A rejected profile is not
    /// installed and the jurisdiction stays unavailable for minting.
    pub fn register(&mut self, profile: JurisdictionProfile) -> Result<(), SchemaError> {
        let jurisdiction = profile.identity().country_name.clone();

        if self.profiles.contains_key(&jurisdiction) {
            return Err(SchemaError::DuplicateJurisdiction { jurisdiction });
        }

        let mut seen = std::collections::BTreeSet::new();
        for definition in profile.declared_fields() {
            if !seen.insert(definition.name.clone()) {
                return Err(SchemaError::FieldClash {
                    jurisdiction,
                    field: definition.name.clone(),
                });
            }
            if !profile.validators().contains(&definition.name) {
                return Err(SchemaError::IncompleteSchema {
                    jurisdiction,
                    field: definition.name.clone(),
                });
            }
        }

        self.profiles.insert(jurisdiction, profile);
        Ok(())
    }

    /// Look up a jurisdiction by its identifier (the country name).
    pub fn get(&self, jurisdiction: &str) -> Option<&JurisdictionProfile> {
        self.profiles.get(jurisdiction)
    }

    /// The registered jurisdiction identifiers, sorted.
    pub fn supported(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specie_core::{FieldDefinition, JurisdictionIdentity};

    fn accept_anything(input: &FieldInput<'_>) -> FieldValue {
        FieldValue::valid(input.name, input.label, input.raw)
    }

    fn identity() -> JurisdictionIdentity {
        JurisdictionIdentity::new("Testland", "TL", "Test Dollar", "TLD")
    }

    #[test]
    fn registers_a_complete_profile() {
        let profile = JurisdictionProfile::new(
            identity(),
            vec![FieldDefinition::essential("accountNumber", "Account Number")],
            vec![],
            ValidatorRegistry::new().register("accountNumber", accept_anything),
        );
        let mut registry = JurisdictionRegistry::new();
        registry.register(profile).unwrap();
        assert_eq!(registry.supported(), vec!["Testland"]);
        assert!(registry.get("Testland").is_some());
    }

    #[test]
    fn rejects_missing_validator_at_registration() {
        let profile = JurisdictionProfile::new(
            identity(),
            vec![FieldDefinition::essential("accountNumber", "Account Number")],
            vec![],
            ValidatorRegistry::new(),
        );
        let mut registry = JurisdictionRegistry::new();
        let err = registry.register(profile).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::IncompleteSchema { ref field, .. } if field == "accountNumber"
        ));
        // The rejected jurisdiction must not be mintable.
        assert!(registry.get("Testland").is_none());
    }

    #[test]
    fn rejects_optional_field_without_validator() {
        let profile = JurisdictionProfile::new(
            identity(),
            vec![],
            vec![FieldDefinition::optional("BIC", "BIC")],
            ValidatorRegistry::new(),
        );
        let mut registry = JurisdictionRegistry::new();
        assert!(matches!(
            registry.register(profile).unwrap_err(),
            SchemaError::IncompleteSchema { ref field, .. } if field == "BIC"
        ));
    }

    #[test]
    fn rejects_field_clash() {
        let profile = JurisdictionProfile::new(
            identity(),
            vec![FieldDefinition::essential("accountNumber", "Account Number")],
            vec![FieldDefinition::optional("accountNumber", "Account No.")],
            ValidatorRegistry::new().register("accountNumber", accept_anything),
        );
        let mut registry = JurisdictionRegistry::new();
        assert!(matches!(
            registry.register(profile).unwrap_err(),
            SchemaError::FieldClash { ref field, .. } if field == "accountNumber"
        ));
    }

    #[test]
    fn rejects_duplicate_jurisdiction() {
        let make = || {
            JurisdictionProfile::new(
                identity(),
                vec![],
                vec![],
                ValidatorRegistry::new(),
            )
        };
        let mut registry = JurisdictionRegistry::new();
        registry.register(make()).unwrap();
        assert!(matches!(
            registry.register(make()).unwrap_err(),
            SchemaError::DuplicateJurisdiction { .. }
        ));
    }

    #[test]
    fn builtins_include_kenya() {
        let registry = JurisdictionRegistry::with_builtins().unwrap();
        assert!(registry.supported().contains(&"Kenya".to_string()));
    }
}
