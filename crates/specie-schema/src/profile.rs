//! Jurisdiction profiles.

use specie_core::{FieldDefinition, JurisdictionIdentity};

use crate::registry::ValidatorRegistry;

/// The per-jurisdiction schema: static identity, declared fields, and the
/// validator table.
///
/// A profile is created once, installed into the
/// [`crate::JurisdictionRegistry`], and never mutated afterwards. Its
/// fields are private because every attribute here participates in
/// fingerprints; in-place edits would invalidate previously minted keys.
#[derive(Debug, Clone)]
pub struct JurisdictionProfile {
    identity: JurisdictionIdentity,
    essential_fields: Vec<FieldDefinition>,
    optional_fields: Vec<FieldDefinition>,
    validators: ValidatorRegistry,
}

impl JurisdictionProfile {
    /// Assemble a profile. Invariants (unique names, full validator
    /// coverage) are checked at registration, not here, so that the
    /// registration error is the single place operators look.
    pub fn new(
        identity: JurisdictionIdentity,
        essential_fields: Vec<FieldDefinition>,
        optional_fields: Vec<FieldDefinition>,
        validators: ValidatorRegistry,
    ) -> Self {
        Self {
            identity,
            essential_fields,
            optional_fields,
            validators,
        }
    }

    /// The four static identity attributes.
    pub fn identity(&self) -> &JurisdictionIdentity {
        &self.identity
    }

    /// The fields a submission must supply, in schema order.
    pub fn essential_fields(&self) -> &[FieldDefinition] {
        &self.essential_fields
    }

    /// The declared optional fields.
    pub fn optional_fields(&self) -> &[FieldDefinition] {
        &self.optional_fields
    }

    /// All declared fields, essentials first.
    pub fn declared_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.essential_fields.iter().chain(self.optional_fields.iter())
    }

    /// The validator table.
    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// The human label for a field name: the declared label if the field
    /// is declared, otherwise the name itself (covers validator-only
    /// optional fields).
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.declared_fields()
            .find(|d| d.name == name)
            .map(|d| d.label.as_str())
            .unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FieldInput;
    use specie_core::FieldValue;

    fn accept_anything(input: &FieldInput<'_>) -> FieldValue {
        FieldValue::valid(input.name, input.label, input.raw)
    }

    fn profile() -> JurisdictionProfile {
        JurisdictionProfile::new(
            JurisdictionIdentity::new("Testland", "TL", "Test Dollar", "TLD"),
            vec![FieldDefinition::essential("accountNumber", "Account Number")],
            vec![FieldDefinition::optional("BIC", "Bank Identifier Code")],
            ValidatorRegistry::new()
                .register("accountNumber", accept_anything)
                .register("BIC", accept_anything)
                .register("reference", accept_anything),
        )
    }

    #[test]
    fn label_for_declared_fields() {
        let p = profile();
        assert_eq!(p.label_for("accountNumber"), "Account Number");
        assert_eq!(p.label_for("BIC"), "Bank Identifier Code");
    }

    #[test]
    fn label_falls_back_to_name_for_validator_only_fields() {
        assert_eq!(profile().label_for("reference"), "reference");
    }

    #[test]
    fn declared_fields_order_essentials_first() {
        let p = profile();
        let names: Vec<_> = p.declared_fields().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["accountNumber", "BIC"]);
    }
}
