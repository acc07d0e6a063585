//! # specie-schema: Jurisdiction Schemas and Validation
//!
//! Declares what a jurisdiction requires of a submission and checks
//! submissions against it:
//!
//! - [`JurisdictionProfile`]: the per-jurisdiction data value holding the
//!   four static identity attributes, the declared fields, and the
//!   validator table.
//! - [`JurisdictionRegistry`]: the explicit process-wide registry profiles
//!   are installed into at startup. Registration is the trust gate: a
//!   profile with a declared field but no validator is rejected there,
//!   never at request time.
//! - [`binder`]: merges caller-supplied values with the schema, collecting
//!   all binding errors as a batch.
//! - [`engine`]: dispatches bound fields to their validators and produces
//!   a [`ValidationReport`] value. Per-field failures are report data;
//!   only structural misconfiguration is an `Err`.
//!
//! Validators are plain functions registered by field name. There is no
//! reflection and no naming convention to get wrong: if the table does not
//! hold a validator for a name, registration fails and the jurisdiction
//! never becomes mintable.

pub mod binder;
pub mod engine;
pub mod kenya;
pub mod profile;
pub mod registry;

pub use binder::{bind, BindError, BoundField, BoundFields};
pub use engine::{validate, FieldInput, ValidationReport};
pub use profile::JurisdictionProfile;
pub use registry::{JurisdictionRegistry, SchemaError, ValidatorFn, ValidatorRegistry};
