//! The Kenya jurisdiction.
//!
//! The worked example profile: Kenya Shilling accounts with three
//! essential fields and two optional ones. Other jurisdictions follow the
//! same pattern: declare the fields, write one validator function per
//! field, bind them by name, and register the profile at startup.

use specie_core::{is_trivial, FieldDefinition, FieldValue, JurisdictionIdentity};

use crate::engine::FieldInput;
use crate::profile::JurisdictionProfile;
use crate::registry::ValidatorRegistry;

/// Build the Kenya profile.
pub fn kenya() -> JurisdictionProfile {
    JurisdictionProfile::new(
        JurisdictionIdentity::new("Kenya", "KE", "Kenya Shilling", "KES"),
        vec![
            FieldDefinition::essential("accountNumber", "Account Number"),
            FieldDefinition::essential("accountHolderName", "Account Holder Name"),
            FieldDefinition::essential("accountHolderAddress", "Account Holder Address"),
        ],
        vec![
            FieldDefinition::optional("BIC", "BIC"),
            FieldDefinition::optional("taxCertificate", "KRA PIN Certificate"),
        ],
        ValidatorRegistry::new()
            .register("accountNumber", validate_account_number)
            .register("accountHolderName", validate_account_holder_name)
            .register("accountHolderAddress", validate_account_holder_address)
            .register("BIC", validate_bic)
            .register("taxCertificate", validate_tax_certificate),
    )
}

fn validate_account_holder_name(input: &FieldInput<'_>) -> FieldValue {
    if input.raw.len() < 3 {
        FieldValue::invalid(
            input.name,
            input.label,
            input.raw,
            "Must be at least 3 characters long",
        )
    } else if is_trivial(input.raw) {
        FieldValue::invalid(input.name, input.label, input.raw, "Trivial value detected")
    } else {
        FieldValue::valid(input.name, input.label, input.raw)
    }
}

fn validate_account_number(input: &FieldInput<'_>) -> FieldValue {
    if !input.raw.chars().all(|c| c.is_ascii_digit()) {
        FieldValue::invalid(
            input.name,
            input.label,
            input.raw,
            "Enter a valid account number",
        )
    } else if is_trivial(input.raw) {
        FieldValue::invalid(input.name, input.label, input.raw, "Trivial value detected")
    } else {
        // The leading four digits identify the issuing institution.
        let code: String = input.raw.chars().take(4).collect();
        FieldValue::valid(input.name, input.label, input.raw)
            .with_derived("accountNumberCode", code)
    }
}

fn validate_account_holder_address(input: &FieldInput<'_>) -> FieldValue {
    FieldValue::valid(input.name, input.label, input.raw)
}

fn validate_bic(input: &FieldInput<'_>) -> FieldValue {
    // The BIC is supplied today but could be looked up from the account
    // number prefix; flag it so downstream consumers treat it as advisory.
    FieldValue::valid(input.name, input.label, input.raw).with_warning("Should be derived!")
}

fn validate_tax_certificate(input: &FieldInput<'_>) -> FieldValue {
    FieldValue::valid(input.name, input.label, input.raw)
        .with_warning("Will be verified by the tax authorities")
}
